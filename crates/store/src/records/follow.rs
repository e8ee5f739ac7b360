//! Follow edge record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Record;

/// A directed follow edge between two users.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowRecord {
    pub id: String,

    pub follower_id: String,

    pub followee_id: String,

    pub created_at: DateTime<Utc>,
}

impl Record for FollowRecord {
    fn id(&self) -> &str {
        &self.id
    }
}
