//! Business logic services.

#![allow(missing_docs)]

pub mod blocking;
pub mod catalog;
pub mod following;
pub mod movie;
pub mod notification;
pub mod penalty;
pub mod review;
pub mod session;
pub mod user;

#[cfg(test)]
pub(crate) mod test_support;

pub use blocking::BlockService;
pub use catalog::{CatalogService, ExternalMovie};
pub use following::FollowService;
pub use movie::{CreateMovieInput, MovieService, MovieSort, RatedMovie, UpdateMovieInput};
pub use notification::NotificationService;
pub use penalty::{
    CreatePenaltyInput, PenaltyHistory, PenaltyService, PenaltyStatus, UpdatePenaltyInput,
};
pub use review::{CreateReviewInput, ReviewService, UpdateReviewInput};
pub use session::SessionService;
pub use user::{
    AdminUpdateUserInput, RegisterUserInput, UpdateProfileInput, UserProfile, UserService,
};
