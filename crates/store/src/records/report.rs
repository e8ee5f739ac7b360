//! Review report record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Record;

/// A user's report against a review, queued for admin moderation.
///
/// Duplicate reports from the same user for the same review are accepted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub id: String,

    pub review_id: String,

    pub reporter_id: String,

    #[serde(default)]
    pub reason: String,

    #[serde(default)]
    pub admin_viewed: bool,

    pub created_at: DateTime<Utc>,
}

impl Record for ReportRecord {
    fn id(&self) -> &str {
        &self.id
    }
}
