//! Shared fixtures for service tests.

#![allow(clippy::unwrap_used)]

use cinelog_store::Store;
use cinelog_store::records::UserRecord;
use cinelog_store::repositories::{
    BlockRepository, FollowRepository, MovieRepository, NotificationRepository, PenaltyRepository,
    ReportRepository, ReviewRepository, UserRepository,
};

use crate::services::blocking::BlockService;
use crate::services::following::FollowService;
use crate::services::movie::{CreateMovieInput, MovieService};
use crate::services::notification::NotificationService;
use crate::services::penalty::PenaltyService;
use crate::services::review::ReviewService;
use crate::services::user::{RegisterUserInput, UserService};

/// The full service graph over one in-memory store.
pub(crate) struct Fixture {
    pub store: Store,
    pub users: UserService,
    pub follows: FollowService,
    pub blocks: BlockService,
    pub movies: MovieService,
    pub reviews: ReviewService,
    pub penalties: PenaltyService,
    pub notifications: NotificationService,
}

impl Fixture {
    pub fn new() -> Self {
        let store = Store::in_memory();

        let user_repo = UserRepository::new(store.users.clone());
        let movie_repo = MovieRepository::new(store.movies.clone());
        let review_repo = ReviewRepository::new(store.reviews.clone());
        let penalty_repo = PenaltyRepository::new(store.penalties.clone());
        let report_repo = ReportRepository::new(store.reports.clone());
        let follow_repo = FollowRepository::new(store.follows.clone());
        let block_repo = BlockRepository::new(store.blocks.clone());
        let notification_repo = NotificationRepository::new(store.notifications.clone());

        let notifications = NotificationService::new(notification_repo.clone());

        Self {
            users: UserService::new(
                user_repo.clone(),
                movie_repo.clone(),
                review_repo.clone(),
                penalty_repo.clone(),
                report_repo.clone(),
                follow_repo.clone(),
                block_repo.clone(),
                notification_repo,
            ),
            follows: FollowService::new(
                follow_repo.clone(),
                block_repo.clone(),
                user_repo.clone(),
                notifications.clone(),
            ),
            blocks: BlockService::new(block_repo, follow_repo, user_repo.clone()),
            movies: MovieService::new(movie_repo.clone(), review_repo.clone(), report_repo.clone()),
            reviews: ReviewService::new(
                review_repo,
                movie_repo,
                user_repo.clone(),
                report_repo,
                notifications.clone(),
            ),
            penalties: PenaltyService::new(penalty_repo, user_repo, notifications.clone()),
            notifications,
            store,
        }
    }

    /// Register a regular user.
    pub async fn user(&self, username: &str) -> UserRecord {
        self.users
            .register(RegisterUserInput {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password: "securePass123@".to_string(),
            })
            .await
            .unwrap()
    }

    /// Register a user and promote them to admin.
    pub async fn admin(&self, username: &str) -> UserRecord {
        let mut user = self.user(username).await;
        user.is_admin = true;
        UserRepository::new(self.store.users.clone())
            .update(user)
            .await
            .unwrap()
    }

    /// Minimal movie creation input.
    pub fn movie_input(&self, title: &str) -> CreateMovieInput {
        CreateMovieInput {
            title: title.to_string(),
            year: 1995,
            genre: "Crime".to_string(),
            director: String::new(),
            description: String::new(),
        }
    }

    /// Fill the catalog up to `count` movies so later ids are not seeds.
    pub async fn seed_catalog(&self, count: usize) {
        for i in 0..count {
            self.movies
                .create(self.movie_input(&format!("Seed Movie {i}")))
                .await
                .unwrap();
        }
    }
}
