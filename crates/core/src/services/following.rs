//! Following service.

use chrono::Utc;

use cinelog_common::{AppError, AppResult, IdGenerator};
use cinelog_store::records::{FollowRecord, UserRecord};
use cinelog_store::repositories::{BlockRepository, FollowRepository, UserRepository};

use crate::services::notification::NotificationService;

/// Following service for business logic.
#[derive(Clone)]
pub struct FollowService {
    follow_repo: FollowRepository,
    block_repo: BlockRepository,
    user_repo: UserRepository,
    notifications: NotificationService,
    id_gen: IdGenerator,
}

impl FollowService {
    /// Create a new following service.
    #[must_use]
    pub const fn new(
        follow_repo: FollowRepository,
        block_repo: BlockRepository,
        user_repo: UserRepository,
        notifications: NotificationService,
    ) -> Self {
        Self {
            follow_repo,
            block_repo,
            user_repo,
            notifications,
            id_gen: IdGenerator::new(),
        }
    }

    /// Follow a user.
    pub async fn follow(&self, follower_id: &str, followee_id: &str) -> AppResult<FollowRecord> {
        // Cannot follow yourself
        if follower_id == followee_id {
            return Err(AppError::Validation("Cannot follow yourself".to_string()));
        }

        let follower = self.user_repo.get_by_id(follower_id).await?;
        self.user_repo.get_by_id(followee_id).await?;

        if self.follow_repo.is_following(follower_id, followee_id).await {
            return Err(AppError::Conflict(
                "Already following this user".to_string(),
            ));
        }

        // A block in either direction prevents following
        if self
            .block_repo
            .is_blocked_between(follower_id, followee_id)
            .await
        {
            return Err(AppError::BadRequest(
                "Cannot follow a user you have blocked or who has blocked you".to_string(),
            ));
        }

        let follow = FollowRecord {
            id: self.id_gen.generate(),
            follower_id: follower_id.to_string(),
            followee_id: followee_id.to_string(),
            created_at: Utc::now(),
        };
        let follow = self.follow_repo.create(follow).await?;

        if let Err(e) = self
            .notifications
            .notify_follow(followee_id, follower_id, &follower.username)
            .await
        {
            tracing::warn!(error = %e, "Failed to create follow notification");
        }

        tracing::info!(follower_id = %follower_id, followee_id = %followee_id, "User followed");
        Ok(follow)
    }

    /// Unfollow a user.
    pub async fn unfollow(&self, follower_id: &str, followee_id: &str) -> AppResult<()> {
        self.user_repo.get_by_id(followee_id).await?;

        if !self.follow_repo.delete_pair(follower_id, followee_id).await? {
            return Err(AppError::NotFound("Not following this user".to_string()));
        }

        tracing::info!(follower_id = %follower_id, followee_id = %followee_id, "User unfollowed");
        Ok(())
    }

    /// Users following `user_id` (paginated).
    pub async fn followers(
        &self,
        user_id: &str,
        limit: usize,
        offset: usize,
    ) -> AppResult<Vec<UserRecord>> {
        self.user_repo.get_by_id(user_id).await?;
        let edges = self.follow_repo.followers_of(user_id, limit, offset).await;
        Ok(self.resolve_users(edges.iter().map(|e| e.follower_id.as_str())).await)
    }

    /// Users that `user_id` follows (paginated).
    pub async fn following(
        &self,
        user_id: &str,
        limit: usize,
        offset: usize,
    ) -> AppResult<Vec<UserRecord>> {
        self.user_repo.get_by_id(user_id).await?;
        let edges = self.follow_repo.following_of(user_id, limit, offset).await;
        Ok(self.resolve_users(edges.iter().map(|e| e.followee_id.as_str())).await)
    }

    /// Whether `follower_id` follows `followee_id`.
    pub async fn is_following(&self, follower_id: &str, followee_id: &str) -> bool {
        self.follow_repo.is_following(follower_id, followee_id).await
    }

    /// Resolve edge endpoints to users, dropping any that no longer exist.
    async fn resolve_users(&self, ids: impl Iterator<Item = &str>) -> Vec<UserRecord> {
        let mut users = Vec::new();
        for id in ids {
            if let Some(user) = self.user_repo.find_by_id(id).await {
                users.push(user);
            }
        }
        users
    }
}
