//! Blocking service.

use chrono::Utc;

use cinelog_common::{AppError, AppResult, IdGenerator};
use cinelog_store::records::{BlockRecord, UserRecord};
use cinelog_store::repositories::{BlockRepository, FollowRepository, UserRepository};

/// Blocking service for business logic.
#[derive(Clone)]
pub struct BlockService {
    block_repo: BlockRepository,
    follow_repo: FollowRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl BlockService {
    /// Create a new blocking service.
    #[must_use]
    pub const fn new(
        block_repo: BlockRepository,
        follow_repo: FollowRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            block_repo,
            follow_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Block a user.
    pub async fn block(&self, blocker_id: &str, blockee_id: &str) -> AppResult<BlockRecord> {
        // Cannot block yourself
        if blocker_id == blockee_id {
            return Err(AppError::Validation("Cannot block yourself".to_string()));
        }

        self.user_repo.get_by_id(blocker_id).await?;
        self.user_repo.get_by_id(blockee_id).await?;

        if self.block_repo.is_blocking(blocker_id, blockee_id).await {
            return Err(AppError::Conflict("Already blocking this user".to_string()));
        }

        // Blocking severs any follow relationship, in both directions
        self.follow_repo.delete_pair(blocker_id, blockee_id).await?;
        self.follow_repo.delete_pair(blockee_id, blocker_id).await?;

        let block = BlockRecord {
            id: self.id_gen.generate(),
            blocker_id: blocker_id.to_string(),
            blockee_id: blockee_id.to_string(),
            created_at: Utc::now(),
        };
        let block = self.block_repo.create(block).await?;

        tracing::info!(blocker_id = %blocker_id, blockee_id = %blockee_id, "User blocked");
        Ok(block)
    }

    /// Unblock a user. Only removes the caller's own block edge.
    pub async fn unblock(&self, blocker_id: &str, blockee_id: &str) -> AppResult<()> {
        self.user_repo.get_by_id(blockee_id).await?;

        if !self.block_repo.delete_pair(blocker_id, blockee_id).await? {
            return Err(AppError::NotFound("Not blocking this user".to_string()));
        }

        tracing::info!(blocker_id = %blocker_id, blockee_id = %blockee_id, "User unblocked");
        Ok(())
    }

    /// Whether either user blocks the other.
    pub async fn is_blocked_between(&self, user_a: &str, user_b: &str) -> bool {
        self.block_repo.is_blocked_between(user_a, user_b).await
    }

    /// Users blocked by `user_id` (paginated).
    pub async fn blocked_users(
        &self,
        user_id: &str,
        limit: usize,
        offset: usize,
    ) -> Vec<UserRecord> {
        let edges = self.block_repo.blocks_by(user_id, limit, offset).await;
        let mut users = Vec::new();
        for edge in edges {
            if let Some(user) = self.user_repo.find_by_id(&edge.blockee_id).await {
                users.push(user);
            }
        }
        users
    }

    /// Remove every block the user created. Returns the removed count.
    pub async fn clear_blocked(&self, user_id: &str) -> AppResult<usize> {
        let cleared = self.block_repo.clear_blocks_by(user_id).await?;
        tracing::info!(user_id = %user_id, cleared, "Block list cleared");
        Ok(cleared)
    }
}
