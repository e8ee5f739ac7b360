//! User repository.

use cinelog_common::{AppError, AppResult};

use crate::records::UserRecord;
use crate::repositories::paginate;
use crate::storage::Collection;

/// User repository for store operations.
#[derive(Clone)]
pub struct UserRepository {
    users: Collection<UserRecord>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(users: Collection<UserRecord>) -> Self {
        Self { users }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: &str) -> Option<UserRecord> {
        self.users.get(id).await
    }

    /// Find a user by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<UserRecord> {
        self.find_by_id(id)
            .await
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))
    }

    /// Find a user by username (case-insensitive).
    pub async fn find_by_username(&self, username: &str) -> Option<UserRecord> {
        let needle = username.to_lowercase();
        self.users
            .find(|u| u.username_lower() == needle)
            .await
            .into_iter()
            .next()
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> Option<UserRecord> {
        let needle = email.to_lowercase();
        self.users
            .find(|u| u.email_lower() == needle)
            .await
            .into_iter()
            .next()
    }

    /// Create a new user.
    pub async fn create(&self, user: UserRecord) -> AppResult<UserRecord> {
        self.users.insert(user).await
    }

    /// Update a user.
    pub async fn update(&self, user: UserRecord) -> AppResult<UserRecord> {
        self.users.replace(user).await
    }

    /// Delete a user.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if self.users.remove(id).await? {
            Ok(())
        } else {
            Err(AppError::UserNotFound(id.to_string()))
        }
    }

    /// List users, newest first (paginated).
    pub async fn list(&self, limit: usize, offset: usize) -> Vec<UserRecord> {
        let mut users = self.users.list().await;
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        paginate(users, limit, offset)
    }

    /// Search users by username substring (case-insensitive, paginated).
    pub async fn search(&self, query: &str, limit: usize, offset: usize) -> Vec<UserRecord> {
        let needle = query.to_lowercase();
        let mut users = self
            .users
            .find(|u| u.username_lower().contains(&needle))
            .await;
        users.sort_by(|a, b| a.username_lower().cmp(&b.username_lower()));
        paginate(users, limit, offset)
    }

    /// Count all users.
    pub async fn count(&self) -> usize {
        self.users.count().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(id: &str, username: &str, email: &str) -> UserRecord {
        UserRecord {
            id: id.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            is_admin: false,
            is_suspended: false,
            reputation: 3,
            favorite_movie_ids: Vec::new(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_username_is_case_insensitive() {
        let repo = UserRepository::new(Collection::in_memory());
        repo.create(user("u1", "ReviewerBob", "bob@example.com"))
            .await
            .unwrap();

        assert!(repo.find_by_username("reviewerbob").await.is_some());
        assert!(repo.find_by_username("REVIEWERBOB").await.is_some());
        assert!(repo.find_by_username("alice").await.is_none());
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_returns_error() {
        let repo = UserRepository::new(Collection::in_memory());
        let result = repo.get_by_id("nonexistent").await;

        assert!(matches!(result, Err(AppError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_search_matches_substring() {
        let repo = UserRepository::new(Collection::in_memory());
        repo.create(user("u1", "reviewer_bob", "bob@example.com"))
            .await
            .unwrap();
        repo.create(user("u2", "bobby", "bobby@example.com"))
            .await
            .unwrap();
        repo.create(user("u3", "carol", "carol@example.com"))
            .await
            .unwrap();

        let hits = repo.search("bob", 10, 0).await;
        assert_eq!(hits.len(), 2);

        let paged = repo.search("bob", 1, 1).await;
        assert_eq!(paged.len(), 1);
    }
}
