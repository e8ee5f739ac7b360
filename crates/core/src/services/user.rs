//! User service.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use serde::Deserialize;
use validator::Validate;

use cinelog_common::{AppError, AppResult, IdGenerator};
use cinelog_store::records::UserRecord;
use cinelog_store::repositories::{
    BlockRepository, FollowRepository, MovieRepository, NotificationRepository, PenaltyRepository,
    ReportRepository, ReviewRepository, UserRepository,
};

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    movie_repo: MovieRepository,
    review_repo: ReviewRepository,
    penalty_repo: PenaltyRepository,
    report_repo: ReportRepository,
    follow_repo: FollowRepository,
    block_repo: BlockRepository,
    notification_repo: NotificationRepository,
    id_gen: IdGenerator,
}

/// Input for registering a new user.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserInput {
    #[validate(length(min = 1, max = 64))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Input for a user updating their own profile.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileInput {
    #[validate(length(min = 1, max = 64))]
    pub username: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(min = 8, max = 128))]
    pub password: Option<String>,
}

/// Input for an admin updating another user's account.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateUserInput {
    pub reputation: Option<i32>,
    pub is_admin: Option<bool>,
}

/// A user together with read-time derived counts.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub user: UserRecord,
    pub total_reviews: usize,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        movie_repo: MovieRepository,
        review_repo: ReviewRepository,
        penalty_repo: PenaltyRepository,
        report_repo: ReportRepository,
        follow_repo: FollowRepository,
        block_repo: BlockRepository,
        notification_repo: NotificationRepository,
    ) -> Self {
        Self {
            user_repo,
            movie_repo,
            review_repo,
            penalty_repo,
            report_repo,
            follow_repo,
            block_repo,
            notification_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a new user account.
    pub async fn register(&self, input: RegisterUserInput) -> AppResult<UserRecord> {
        input.validate()?;
        check_password_strength(&input.password)?;

        if self
            .user_repo
            .find_by_username(&input.username)
            .await
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "Username '{}' already taken",
                input.username
            )));
        }
        if self.user_repo.find_by_email(&input.email).await.is_some() {
            return Err(AppError::Conflict(format!(
                "Email '{}' already registered",
                input.email
            )));
        }

        let user = UserRecord {
            id: self.id_gen.generate(),
            username: input.username,
            email: input.email,
            password_hash: hash_password(&input.password)?,
            is_admin: false,
            is_suspended: false,
            reputation: 3,
            favorite_movie_ids: Vec::new(),
            created_at: Utc::now(),
            updated_at: None,
        };

        let user = self.user_repo.create(user).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Authenticate a user by username and password.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<UserRecord> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        Ok(user)
    }

    /// Get a user by ID.
    pub async fn get(&self, id: &str) -> AppResult<UserRecord> {
        self.user_repo.get_by_id(id).await
    }

    /// Get a user's profile with derived counts.
    pub async fn profile(&self, id: &str) -> AppResult<UserProfile> {
        let user = self.user_repo.get_by_id(id).await?;
        let total_reviews = self.review_repo.ids_for_author(id).await.len();
        Ok(UserProfile {
            user,
            total_reviews,
        })
    }

    /// Update the caller's own profile.
    pub async fn update_profile(
        &self,
        user_id: &str,
        input: UpdateProfileInput,
    ) -> AppResult<UserRecord> {
        input.validate()?;
        let mut user = self.user_repo.get_by_id(user_id).await?;

        if let Some(username) = input.username {
            if self
                .user_repo
                .find_by_username(&username)
                .await
                .is_some_and(|other| other.id != user_id)
            {
                return Err(AppError::Conflict(format!(
                    "Username '{username}' already taken"
                )));
            }
            user.username = username;
        }
        if let Some(email) = input.email {
            if self
                .user_repo
                .find_by_email(&email)
                .await
                .is_some_and(|other| other.id != user_id)
            {
                return Err(AppError::Conflict(format!(
                    "Email '{email}' already registered"
                )));
            }
            user.email = email;
        }
        if let Some(password) = input.password {
            check_password_strength(&password)?;
            user.password_hash = hash_password(&password)?;
        }

        user.updated_at = Some(Utc::now());
        self.user_repo.update(user).await
    }

    /// Admin update of another user's account fields.
    pub async fn admin_update(
        &self,
        user_id: &str,
        input: AdminUpdateUserInput,
    ) -> AppResult<UserRecord> {
        let mut user = self.user_repo.get_by_id(user_id).await?;

        if let Some(reputation) = input.reputation {
            user.reputation = reputation;
        }
        if let Some(is_admin) = input.is_admin {
            user.is_admin = is_admin;
        }

        user.updated_at = Some(Utc::now());
        let user = self.user_repo.update(user).await?;
        tracing::info!(user_id = %user.id, "User updated by admin");
        Ok(user)
    }

    /// Suspend a user account.
    pub async fn suspend(&self, user_id: &str) -> AppResult<UserRecord> {
        let mut user = self.user_repo.get_by_id(user_id).await?;
        if user.is_admin {
            return Err(AppError::Forbidden("Cannot suspend an admin".to_string()));
        }

        user.is_suspended = true;
        user.updated_at = Some(Utc::now());
        let user = self.user_repo.update(user).await?;
        tracing::info!(user_id = %user.id, "User suspended");
        Ok(user)
    }

    /// Reactivate a suspended user account.
    pub async fn reactivate(&self, user_id: &str) -> AppResult<UserRecord> {
        let mut user = self.user_repo.get_by_id(user_id).await?;
        user.is_suspended = false;
        user.updated_at = Some(Utc::now());
        let user = self.user_repo.update(user).await?;
        tracing::info!(user_id = %user.id, "User reactivated");
        Ok(user)
    }

    /// Toggle a movie in the user's favorites. Returns true when added.
    pub async fn toggle_favorite(&self, user_id: &str, movie_id: &str) -> AppResult<bool> {
        self.movie_repo.get_by_id(movie_id).await?;
        let mut user = self.user_repo.get_by_id(user_id).await?;

        let added = if let Some(pos) = user.favorite_movie_ids.iter().position(|m| m == movie_id) {
            user.favorite_movie_ids.remove(pos);
            false
        } else {
            user.favorite_movie_ids.push(movie_id.to_string());
            true
        };

        user.updated_at = Some(Utc::now());
        self.user_repo.update(user).await?;
        tracing::debug!(user_id = %user_id, movie_id = %movie_id, added, "Favorite toggled");
        Ok(added)
    }

    /// Search users by username substring (paginated).
    pub async fn search(&self, query: &str, limit: usize, offset: usize) -> Vec<UserRecord> {
        self.user_repo.search(query, limit, offset).await
    }

    /// List users, newest first (paginated).
    pub async fn list(&self, limit: usize, offset: usize) -> Vec<UserRecord> {
        self.user_repo.list(limit, offset).await
    }

    /// Total user count.
    pub async fn count(&self) -> usize {
        self.user_repo.count().await
    }

    /// Delete a user account and everything attached to it.
    ///
    /// The cascade is sequenced, not atomic: the user's reviews (with their
    /// reports), penalties, follow/block edges and notifications go first,
    /// the account record last.
    pub async fn delete_account(&self, user_id: &str) -> AppResult<()> {
        let user = self.user_repo.get_by_id(user_id).await?;

        for review_id in self.review_repo.ids_for_author(user_id).await {
            self.report_repo.delete_by_review(&review_id).await?;
        }
        let reviews = self.review_repo.delete_by_author(user_id).await?;
        self.report_repo.delete_by_reporter(user_id).await?;
        let penalties = self.penalty_repo.delete_by_user(user_id).await?;
        self.follow_repo.delete_all_for_user(user_id).await?;
        self.block_repo.delete_all_for_user(user_id).await?;
        self.notification_repo.delete_all_for_user(user_id).await?;
        self.user_repo.delete(user_id).await?;

        tracing::info!(
            user_id = %user_id,
            username = %user.username,
            reviews,
            penalties,
            "User account deleted"
        );
        Ok(())
    }
}

/// Hash a password with argon2.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against an argon2 hash.
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Invalid password hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Password complexity rules: at least one digit, one uppercase letter, one
/// lowercase letter and one special character.
fn check_password_strength(password: &str) -> AppResult<()> {
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(
            "Password must contain at least one digit".to_string(),
        ));
    }
    if !password.chars().any(char::is_uppercase) {
        return Err(AppError::Validation(
            "Password must contain at least one uppercase letter".to_string(),
        ));
    }
    if !password.chars().any(char::is_lowercase) {
        return Err(AppError::Validation(
            "Password must contain at least one lowercase letter".to_string(),
        ));
    }
    if !password.chars().any(|c| !c.is_alphanumeric()) {
        return Err(AppError::Validation(
            "Password must contain at least one special character".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cinelog_store::Store;

    fn service(store: &Store) -> UserService {
        UserService::new(
            UserRepository::new(store.users.clone()),
            MovieRepository::new(store.movies.clone()),
            ReviewRepository::new(store.reviews.clone()),
            PenaltyRepository::new(store.penalties.clone()),
            ReportRepository::new(store.reports.clone()),
            FollowRepository::new(store.follows.clone()),
            BlockRepository::new(store.blocks.clone()),
            NotificationRepository::new(store.notifications.clone()),
        )
    }

    fn register_input(username: &str, email: &str) -> RegisterUserInput {
        RegisterUserInput {
            username: username.to_string(),
            email: email.to_string(),
            password: "securePass123@".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_and_authenticate() {
        let store = Store::in_memory();
        let users = service(&store);

        let user = users
            .register(register_input("bob", "bob@example.com"))
            .await
            .unwrap();
        assert!(!user.is_admin);
        assert_eq!(user.reputation, 3);
        assert_ne!(user.password_hash, "securePass123@");

        let authed = users.authenticate("bob", "securePass123@").await.unwrap();
        assert_eq!(authed.id, user.id);

        let wrong = users.authenticate("bob", "wrongPass123@").await;
        assert!(matches!(wrong, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_register_duplicate_username_conflicts() {
        let store = Store::in_memory();
        let users = service(&store);

        users
            .register(register_input("bob", "bob@example.com"))
            .await
            .unwrap();
        let result = users
            .register(register_input("BOB", "other@example.com"))
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let store = Store::in_memory();
        let users = service(&store);

        users
            .register(register_input("bob", "bob@example.com"))
            .await
            .unwrap();
        let result = users.register(register_input("carol", "BOB@example.com")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_weak_password_rejected() {
        let store = Store::in_memory();
        let users = service(&store);

        let mut input = register_input("bob", "bob@example.com");
        input.password = "alllowercase1!".to_string();
        assert!(matches!(
            users.register(input).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_suspend_and_reactivate() {
        let store = Store::in_memory();
        let users = service(&store);

        let user = users
            .register(register_input("bob", "bob@example.com"))
            .await
            .unwrap();

        let suspended = users.suspend(&user.id).await.unwrap();
        assert!(suspended.is_suspended);

        let reactivated = users.reactivate(&user.id).await.unwrap();
        assert!(!reactivated.is_suspended);
    }

    #[tokio::test]
    async fn test_suspending_admin_is_forbidden() {
        let store = Store::in_memory();
        let users = service(&store);

        let mut admin = users
            .register(register_input("root", "root@example.com"))
            .await
            .unwrap();
        admin.is_admin = true;
        UserRepository::new(store.users.clone())
            .update(admin.clone())
            .await
            .unwrap();

        assert!(matches!(
            users.suspend(&admin.id).await,
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_toggle_favorite_round_trip() {
        let store = Store::in_memory();
        let users = service(&store);

        let bob = users
            .register(register_input("bob", "bob@example.com"))
            .await
            .unwrap();

        // Unknown movies cannot be favorited
        let missing = users.toggle_favorite(&bob.id, "42").await;
        assert!(matches!(missing, Err(AppError::MovieNotFound(_))));

        MovieRepository::new(store.movies.clone())
            .create(cinelog_store::records::MovieRecord {
                id: "42".to_string(),
                title: "Heat".to_string(),
                year: 1995,
                genre: "Crime".to_string(),
                director: String::new(),
                description: String::new(),
                created_at: chrono::Utc::now(),
            })
            .await
            .unwrap();

        assert!(users.toggle_favorite(&bob.id, "42").await.unwrap());
        let bob = users.get(&bob.id).await.unwrap();
        assert_eq!(bob.favorite_movie_ids, vec!["42"]);

        assert!(!users.toggle_favorite(&bob.id, "42").await.unwrap());
        let bob = users.get(&bob.id).await.unwrap();
        assert!(bob.favorite_movie_ids.is_empty());
    }

    #[tokio::test]
    async fn test_update_profile_uniqueness() {
        let store = Store::in_memory();
        let users = service(&store);

        users
            .register(register_input("bob", "bob@example.com"))
            .await
            .unwrap();
        let carol = users
            .register(register_input("carol", "carol@example.com"))
            .await
            .unwrap();

        let result = users
            .update_profile(
                &carol.id,
                UpdateProfileInput {
                    username: Some("bob".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));

        // Keeping your own name is not a conflict.
        let ok = users
            .update_profile(
                &carol.id,
                UpdateProfileInput {
                    username: Some("carol".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(ok.is_ok());
    }
}
