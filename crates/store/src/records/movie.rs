//! Movie record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Record;

/// Movie ids `1..=10` are seed catalog entries and cannot be deleted.
pub const SEED_MOVIE_MAX_ID: u64 = 10;

/// A catalog movie.
///
/// The average rating is never stored; it is derived from reviews on read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    /// Decimal string id, assigned sequentially.
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub year: i32,

    #[serde(default)]
    pub genre: String,

    #[serde(default)]
    pub director: String,

    #[serde(default)]
    pub description: String,

    pub created_at: DateTime<Utc>,
}

impl MovieRecord {
    /// Whether this movie is one of the protected seed records.
    #[must_use]
    pub fn is_seed(&self) -> bool {
        is_seed_movie_id(&self.id)
    }
}

/// Whether `id` names one of the protected seed movies.
#[must_use]
pub fn is_seed_movie_id(id: &str) -> bool {
    id.parse::<u64>()
        .is_ok_and(|n| (1..=SEED_MOVIE_MAX_ID).contains(&n))
}

impl Record for MovieRecord {
    fn id(&self) -> &str {
        &self.id
    }
}
