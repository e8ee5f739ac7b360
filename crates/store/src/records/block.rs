//! Block edge record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Record;

/// A directed block edge between two users.
///
/// Creating one removes any follow edge in either direction between the
/// pair; interaction checks treat a block in either direction as blocking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub id: String,

    pub blocker_id: String,

    pub blockee_id: String,

    pub created_at: DateTime<Utc>,
}

impl Record for BlockRecord {
    fn id(&self) -> &str {
        &self.id
    }
}
