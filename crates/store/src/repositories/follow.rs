//! Follow repository.

use cinelog_common::AppResult;

use crate::records::FollowRecord;
use crate::repositories::paginate;
use crate::storage::Collection;

/// Follow repository for store operations.
#[derive(Clone)]
pub struct FollowRepository {
    follows: Collection<FollowRecord>,
}

impl FollowRepository {
    /// Create a new follow repository.
    #[must_use]
    pub const fn new(follows: Collection<FollowRecord>) -> Self {
        Self { follows }
    }

    /// Whether `follower_id` follows `followee_id`.
    pub async fn is_following(&self, follower_id: &str, followee_id: &str) -> bool {
        self.find_pair(follower_id, followee_id).await.is_some()
    }

    /// The follow edge from `follower_id` to `followee_id`, if any.
    pub async fn find_pair(&self, follower_id: &str, followee_id: &str) -> Option<FollowRecord> {
        self.follows
            .find(|f| f.follower_id == follower_id && f.followee_id == followee_id)
            .await
            .into_iter()
            .next()
    }

    /// Create a follow edge.
    pub async fn create(&self, follow: FollowRecord) -> AppResult<FollowRecord> {
        self.follows.insert(follow).await
    }

    /// Remove the follow edge from `follower_id` to `followee_id`.
    pub async fn delete_pair(&self, follower_id: &str, followee_id: &str) -> AppResult<bool> {
        let removed = self
            .follows
            .remove_where(|f| f.follower_id == follower_id && f.followee_id == followee_id)
            .await?;
        Ok(removed > 0)
    }

    /// Edges pointing at `user_id` (their followers), newest first.
    pub async fn followers_of(
        &self,
        user_id: &str,
        limit: usize,
        offset: usize,
    ) -> Vec<FollowRecord> {
        let mut follows = self.follows.find(|f| f.followee_id == user_id).await;
        follows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        paginate(follows, limit, offset)
    }

    /// Edges starting at `user_id` (who they follow), newest first.
    pub async fn following_of(
        &self,
        user_id: &str,
        limit: usize,
        offset: usize,
    ) -> Vec<FollowRecord> {
        let mut follows = self.follows.find(|f| f.follower_id == user_id).await;
        follows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        paginate(follows, limit, offset)
    }

    /// Remove every edge touching `user_id`, either side. Returns the count.
    pub async fn delete_all_for_user(&self, user_id: &str) -> AppResult<usize> {
        self.follows
            .remove_where(|f| f.follower_id == user_id || f.followee_id == user_id)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn follow(id: &str, follower: &str, followee: &str) -> FollowRecord {
        FollowRecord {
            id: id.to_string(),
            follower_id: follower.to_string(),
            followee_id: followee.to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_is_following_is_directional() {
        let repo = FollowRepository::new(Collection::in_memory());
        repo.create(follow("f1", "a", "b")).await.unwrap();

        assert!(repo.is_following("a", "b").await);
        assert!(!repo.is_following("b", "a").await);
    }

    #[tokio::test]
    async fn test_delete_all_for_user_removes_both_sides() {
        let repo = FollowRepository::new(Collection::in_memory());
        repo.create(follow("f1", "a", "b")).await.unwrap();
        repo.create(follow("f2", "c", "a")).await.unwrap();
        repo.create(follow("f3", "b", "c")).await.unwrap();

        assert_eq!(repo.delete_all_for_user("a").await.unwrap(), 2);
        assert!(repo.is_following("b", "c").await);
    }
}
