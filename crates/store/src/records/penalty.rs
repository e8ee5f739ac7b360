//! Penalty record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Record;

/// An admin-issued penalty against a user.
///
/// Whether a penalty is active is a read-time computation; expiry never
/// mutates the record or the target user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyRecord {
    pub id: String,

    /// The penalized user.
    pub user_id: String,

    /// The admin who issued the penalty.
    pub issued_by: String,

    pub reason: String,

    /// Severity in `1..=5`.
    pub severity: u8,

    pub start_date: DateTime<Utc>,

    /// `None` means permanent.
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

impl PenaltyRecord {
    /// Whether the penalty is active at `now`.
    #[must_use]
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        if now < self.start_date {
            return false;
        }
        self.end_date.is_none_or(|end| now <= end)
    }

    /// Whether the penalty is currently active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active_at(Utc::now())
    }
}

impl Record for PenaltyRecord {
    fn id(&self) -> &str {
        &self.id
    }
}
