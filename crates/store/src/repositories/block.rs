//! Block repository.

use cinelog_common::AppResult;

use crate::records::BlockRecord;
use crate::repositories::paginate;
use crate::storage::Collection;

/// Block repository for store operations.
#[derive(Clone)]
pub struct BlockRepository {
    blocks: Collection<BlockRecord>,
}

impl BlockRepository {
    /// Create a new block repository.
    #[must_use]
    pub const fn new(blocks: Collection<BlockRecord>) -> Self {
        Self { blocks }
    }

    /// Whether `blocker_id` has a block against `blockee_id`.
    pub async fn is_blocking(&self, blocker_id: &str, blockee_id: &str) -> bool {
        self.find_pair(blocker_id, blockee_id).await.is_some()
    }

    /// Whether either user blocks the other.
    pub async fn is_blocked_between(&self, user_a: &str, user_b: &str) -> bool {
        self.is_blocking(user_a, user_b).await || self.is_blocking(user_b, user_a).await
    }

    /// The block edge from `blocker_id` to `blockee_id`, if any.
    pub async fn find_pair(&self, blocker_id: &str, blockee_id: &str) -> Option<BlockRecord> {
        self.blocks
            .find(|b| b.blocker_id == blocker_id && b.blockee_id == blockee_id)
            .await
            .into_iter()
            .next()
    }

    /// Create a block edge.
    pub async fn create(&self, block: BlockRecord) -> AppResult<BlockRecord> {
        self.blocks.insert(block).await
    }

    /// Remove the block edge from `blocker_id` to `blockee_id`.
    pub async fn delete_pair(&self, blocker_id: &str, blockee_id: &str) -> AppResult<bool> {
        let removed = self
            .blocks
            .remove_where(|b| b.blocker_id == blocker_id && b.blockee_id == blockee_id)
            .await?;
        Ok(removed > 0)
    }

    /// Blocks created by `user_id`, newest first.
    pub async fn blocks_by(&self, user_id: &str, limit: usize, offset: usize) -> Vec<BlockRecord> {
        let mut blocks = self.blocks.find(|b| b.blocker_id == user_id).await;
        blocks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        paginate(blocks, limit, offset)
    }

    /// Remove every block created by `user_id`. Returns the count.
    pub async fn clear_blocks_by(&self, user_id: &str) -> AppResult<usize> {
        self.blocks.remove_where(|b| b.blocker_id == user_id).await
    }

    /// Remove every block touching `user_id`, either side. Returns the count.
    pub async fn delete_all_for_user(&self, user_id: &str) -> AppResult<usize> {
        self.blocks
            .remove_where(|b| b.blocker_id == user_id || b.blockee_id == user_id)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn block(id: &str, blocker: &str, blockee: &str) -> BlockRecord {
        BlockRecord {
            id: id.to_string(),
            blocker_id: blocker.to_string(),
            blockee_id: blockee.to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_is_blocked_between_is_symmetric() {
        let repo = BlockRepository::new(Collection::in_memory());
        repo.create(block("b1", "a", "b")).await.unwrap();

        assert!(repo.is_blocking("a", "b").await);
        assert!(!repo.is_blocking("b", "a").await);
        assert!(repo.is_blocked_between("a", "b").await);
        assert!(repo.is_blocked_between("b", "a").await);
    }

    #[tokio::test]
    async fn test_clear_blocks_by_leaves_other_side() {
        let repo = BlockRepository::new(Collection::in_memory());
        repo.create(block("b1", "a", "b")).await.unwrap();
        repo.create(block("b2", "c", "a")).await.unwrap();

        assert_eq!(repo.clear_blocks_by("a").await.unwrap(), 1);
        assert!(repo.is_blocking("c", "a").await);
    }
}
