//! User record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Record;

/// A user account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,

    /// Unique, compared case-insensitively.
    pub username: String,

    /// Unique, compared case-insensitively.
    pub email: String,

    /// Argon2 hash; never the plain password.
    pub password_hash: String,

    #[serde(default)]
    pub is_admin: bool,

    #[serde(default)]
    pub is_suspended: bool,

    /// Reputation score, starts at 3.
    #[serde(default = "default_reputation")]
    pub reputation: i32,

    /// Movie ids this user has marked as favorites.
    #[serde(default)]
    pub favorite_movie_ids: Vec<String>,

    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

const fn default_reputation() -> i32 {
    3
}

impl UserRecord {
    /// Lowercased username, the uniqueness key.
    #[must_use]
    pub fn username_lower(&self) -> String {
        self.username.to_lowercase()
    }

    /// Lowercased email, the uniqueness key.
    #[must_use]
    pub fn email_lower(&self) -> String {
        self.email.to_lowercase()
    }
}

impl Record for UserRecord {
    fn id(&self) -> &str {
        &self.id
    }
}
