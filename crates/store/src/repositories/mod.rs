//! Typed repositories over the record collections.

pub mod block;
pub mod follow;
pub mod movie;
pub mod notification;
pub mod penalty;
pub mod report;
pub mod review;
pub mod user;

pub use block::BlockRepository;
pub use follow::FollowRepository;
pub use movie::MovieRepository;
pub use notification::NotificationRepository;
pub use penalty::PenaltyRepository;
pub use report::ReportRepository;
pub use review::ReviewRepository;
pub use user::UserRepository;

/// Apply offset/limit pagination to an already-sorted list.
pub(crate) fn paginate<T>(items: Vec<T>, limit: usize, offset: usize) -> Vec<T> {
    items.into_iter().skip(offset).take(limit).collect()
}
