//! Review record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Record;

/// A star rating plus free text, one per (author, movie) pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub id: String,

    pub movie_id: String,

    pub author_id: String,

    /// Integer stars in `1..=5`.
    pub rating: u8,

    #[serde(default)]
    pub text: String,

    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for ReviewRecord {
    fn id(&self) -> &str {
        &self.id
    }
}
