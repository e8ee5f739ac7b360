//! Penalty repository.

use cinelog_common::{AppError, AppResult};

use crate::records::PenaltyRecord;
use crate::storage::Collection;

/// Penalty repository for store operations.
#[derive(Clone)]
pub struct PenaltyRepository {
    penalties: Collection<PenaltyRecord>,
}

impl PenaltyRepository {
    /// Create a new penalty repository.
    #[must_use]
    pub const fn new(penalties: Collection<PenaltyRecord>) -> Self {
        Self { penalties }
    }

    /// Find a penalty by ID.
    pub async fn find_by_id(&self, id: &str) -> Option<PenaltyRecord> {
        self.penalties.get(id).await
    }

    /// Find a penalty by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<PenaltyRecord> {
        self.find_by_id(id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Penalty '{id}' not found")))
    }

    /// Penalties issued against a user, most recent start first.
    pub async fn find_by_user(&self, user_id: &str) -> Vec<PenaltyRecord> {
        let mut penalties = self.penalties.find(|p| p.user_id == user_id).await;
        penalties.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        penalties
    }

    /// All penalties, newest first.
    pub async fn list_all(&self) -> Vec<PenaltyRecord> {
        let mut penalties = self.penalties.list().await;
        penalties.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        penalties
    }

    /// Create a new penalty.
    pub async fn create(&self, penalty: PenaltyRecord) -> AppResult<PenaltyRecord> {
        self.penalties.insert(penalty).await
    }

    /// Update a penalty.
    pub async fn update(&self, penalty: PenaltyRecord) -> AppResult<PenaltyRecord> {
        self.penalties.replace(penalty).await
    }

    /// Delete a penalty.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if self.penalties.remove(id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Penalty '{id}' not found")))
        }
    }

    /// Delete every penalty against a user. Returns the removed count.
    pub async fn delete_by_user(&self, user_id: &str) -> AppResult<usize> {
        self.penalties.remove_where(|p| p.user_id == user_id).await
    }
}
