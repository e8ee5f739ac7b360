//! Cookie session service.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use cinelog_common::IdGenerator;

/// An issued session.
#[derive(Debug, Clone)]
struct Session {
    user_id: String,
    expires_at: DateTime<Utc>,
}

/// In-process session store backing the `session_token` cookie.
///
/// Sessions are process-local; restarting the server signs everyone out.
#[derive(Clone)]
pub struct SessionService {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
    id_gen: IdGenerator,
}

impl SessionService {
    /// Create a new session service with the given lifetime in minutes.
    #[must_use]
    pub fn new(ttl_minutes: i64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl: Duration::minutes(ttl_minutes),
            id_gen: IdGenerator::new(),
        }
    }

    /// Issue a session for a user and return its token.
    pub async fn create(&self, user_id: &str) -> String {
        let token = self.id_gen.generate_token();
        let session = Session {
            user_id: user_id.to_string(),
            expires_at: Utc::now() + self.ttl,
        };
        self.sessions.write().await.insert(token.clone(), session);
        tracing::info!(user_id = %user_id, "Session created");
        token
    }

    /// Resolve a token to its user id. Expired sessions are dropped.
    pub async fn resolve(&self, token: &str) -> Option<String> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        match sessions.get(token) {
            Some(session) if session.expires_at > now => Some(session.user_id.clone()),
            Some(_) => {
                sessions.remove(token);
                tracing::debug!("Expired session dropped");
                None
            }
            None => None,
        }
    }

    /// Delete a session. Returns whether it existed.
    pub async fn revoke(&self, token: &str) -> bool {
        let removed = self.sessions.write().await.remove(token);
        if let Some(session) = &removed {
            tracing::info!(user_id = %session.user_id, "Session deleted");
        }
        removed.is_some()
    }

    /// Drop every expired session. Returns the removed count.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.expires_at > now);
        before - sessions.len()
    }
}
