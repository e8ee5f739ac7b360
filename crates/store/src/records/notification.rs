//! Notification record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Record;

/// What a notification is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Someone started following the notifiee.
    Follow,
    /// An admin issued a penalty against the notifiee.
    PenaltyIssued,
    /// An admin removed one of the notifiee's reviews.
    ReviewRemoved,
}

/// A per-user notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: String,

    /// Who receives the notification.
    pub notifiee_id: String,

    /// Who triggered it, when attributable.
    #[serde(default)]
    pub notifier_id: Option<String>,

    pub kind: NotificationKind,

    /// Human-readable message.
    pub body: String,

    #[serde(default)]
    pub is_read: bool,

    pub created_at: DateTime<Utc>,
}

impl Record for NotificationRecord {
    fn id(&self) -> &str {
        &self.id
    }
}
