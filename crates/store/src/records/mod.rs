//! Typed records persisted by the store.

pub mod block;
pub mod follow;
pub mod movie;
pub mod notification;
pub mod penalty;
pub mod report;
pub mod review;
pub mod user;

pub use block::BlockRecord;
pub use follow::FollowRecord;
pub use movie::MovieRecord;
pub use notification::{NotificationKind, NotificationRecord};
pub use penalty::PenaltyRecord;
pub use report::ReportRecord;
pub use review::ReviewRecord;
pub use user::UserRecord;
