//! Generic file-backed record collections.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::RwLock;

use cinelog_common::{AppError, AppResult};

use crate::records::{
    BlockRecord, FollowRecord, MovieRecord, NotificationRecord, PenaltyRecord, ReportRecord,
    ReviewRecord, UserRecord,
};

/// A persistable record keyed by a string identifier.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The record's unique identifier.
    fn id(&self) -> &str;
}

/// A typed record collection.
///
/// Records live in memory behind an `RwLock`; when the collection is bound
/// to a file, every mutation rewrites that file before returning. The
/// on-disk format is one JSON object per line.
#[derive(Clone)]
pub struct Collection<R: Record> {
    records: Arc<RwLock<HashMap<String, R>>>,
    path: Option<Arc<PathBuf>>,
}

impl<R: Record> Collection<R> {
    /// Create an unbound, in-memory collection.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            path: None,
        }
    }

    /// Open a collection bound to `path`, loading any existing records.
    ///
    /// A missing file is an empty collection; it is created on first write.
    pub async fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        let mut records = HashMap::new();

        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => {
                for line in contents.lines().filter(|l| !l.trim().is_empty()) {
                    let record: R = serde_json::from_str(line)?;
                    records.insert(record.id().to_string(), record);
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        tracing::debug!(path = %path.display(), count = records.len(), "Opened collection");

        Ok(Self {
            records: Arc::new(RwLock::new(records)),
            path: Some(Arc::new(path)),
        })
    }

    /// Insert a new record. Fails if the id is already taken.
    pub async fn insert(&self, record: R) -> AppResult<R> {
        let mut records = self.records.write().await;
        if records.contains_key(record.id()) {
            return Err(AppError::Storage(format!(
                "duplicate record id: {}",
                record.id()
            )));
        }
        records.insert(record.id().to_string(), record.clone());
        self.persist(&records).await?;
        Ok(record)
    }

    /// Get a record by id.
    pub async fn get(&self, id: &str) -> Option<R> {
        self.records.read().await.get(id).cloned()
    }

    /// List all records, in no particular order.
    pub async fn list(&self) -> Vec<R> {
        self.records.read().await.values().cloned().collect()
    }

    /// List all records matching a predicate.
    pub async fn find<F>(&self, mut pred: F) -> Vec<R>
    where
        F: FnMut(&R) -> bool,
    {
        self.records
            .read()
            .await
            .values()
            .filter(|r| pred(r))
            .cloned()
            .collect()
    }

    /// Replace an existing record. Fails if the id is unknown.
    pub async fn replace(&self, record: R) -> AppResult<R> {
        let mut records = self.records.write().await;
        if !records.contains_key(record.id()) {
            return Err(AppError::NotFound(format!(
                "no record with id: {}",
                record.id()
            )));
        }
        records.insert(record.id().to_string(), record.clone());
        self.persist(&records).await?;
        Ok(record)
    }

    /// Remove a record by id. Returns whether a record was removed.
    pub async fn remove(&self, id: &str) -> AppResult<bool> {
        let mut records = self.records.write().await;
        let removed = records.remove(id).is_some();
        if removed {
            self.persist(&records).await?;
        }
        Ok(removed)
    }

    /// Apply a mutation to every record matching a predicate, under one
    /// lock and one file rewrite. Returns the updated count.
    pub async fn update_where<P, F>(&self, mut pred: P, mut apply: F) -> AppResult<usize>
    where
        P: FnMut(&R) -> bool,
        F: FnMut(&mut R),
    {
        let mut records = self.records.write().await;
        let mut updated = 0;
        for record in records.values_mut() {
            if pred(record) {
                apply(record);
                updated += 1;
            }
        }
        if updated > 0 {
            self.persist(&records).await?;
        }
        Ok(updated)
    }

    /// Remove every record matching a predicate. Returns the removed count.
    pub async fn remove_where<F>(&self, mut pred: F) -> AppResult<usize>
    where
        F: FnMut(&R) -> bool,
    {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, r| !pred(r));
        let removed = before - records.len();
        if removed > 0 {
            self.persist(&records).await?;
        }
        Ok(removed)
    }

    /// Number of records in the collection.
    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }

    /// Rewrite the collection file. Called with the write lock held so the
    /// file always reflects the latest mutation.
    async fn persist(&self, records: &HashMap<String, R>) -> AppResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let mut out = String::new();
        for record in records.values() {
            out.push_str(&serde_json::to_string(record)?);
            out.push('\n');
        }

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path.as_ref(), out).await?;
        Ok(())
    }
}

/// All record collections, one per entity type.
#[derive(Clone)]
pub struct Store {
    /// User accounts.
    pub users: Collection<UserRecord>,
    /// Movie catalog.
    pub movies: Collection<MovieRecord>,
    /// Reviews.
    pub reviews: Collection<ReviewRecord>,
    /// Penalties.
    pub penalties: Collection<PenaltyRecord>,
    /// Review reports.
    pub reports: Collection<ReportRecord>,
    /// Follow edges.
    pub follows: Collection<FollowRecord>,
    /// Block edges.
    pub blocks: Collection<BlockRecord>,
    /// Notifications.
    pub notifications: Collection<NotificationRecord>,
}

impl Store {
    /// Open all collections under `data_dir`.
    pub async fn open(data_dir: impl AsRef<Path>) -> AppResult<Self> {
        let dir = data_dir.as_ref();
        Ok(Self {
            users: Collection::open(dir.join("users.jsonl")).await?,
            movies: Collection::open(dir.join("movies.jsonl")).await?,
            reviews: Collection::open(dir.join("reviews.jsonl")).await?,
            penalties: Collection::open(dir.join("penalties.jsonl")).await?,
            reports: Collection::open(dir.join("reports.jsonl")).await?,
            follows: Collection::open(dir.join("follows.jsonl")).await?,
            blocks: Collection::open(dir.join("blocks.jsonl")).await?,
            notifications: Collection::open(dir.join("notifications.jsonl")).await?,
        })
    }

    /// Create a store with unbound, in-memory collections.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            users: Collection::in_memory(),
            movies: Collection::in_memory(),
            reviews: Collection::in_memory(),
            penalties: Collection::in_memory(),
            reports: Collection::in_memory(),
            follows: Collection::in_memory(),
            blocks: Collection::in_memory(),
            notifications: Collection::in_memory(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::records::MovieRecord;
    use chrono::Utc;

    fn movie(id: &str, title: &str) -> MovieRecord {
        MovieRecord {
            id: id.to_string(),
            title: title.to_string(),
            year: 1999,
            genre: "Drama".to_string(),
            director: String::new(),
            description: String::new(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let collection = Collection::in_memory();
        collection.insert(movie("1", "Heat")).await.unwrap();

        let found = collection.get("1").await.unwrap();
        assert_eq!(found.title, "Heat");
        assert!(collection.get("2").await.is_none());
    }

    #[tokio::test]
    async fn test_insert_duplicate_id_fails() {
        let collection = Collection::in_memory();
        collection.insert(movie("1", "Heat")).await.unwrap();

        let result = collection.insert(movie("1", "Ronin")).await;
        assert!(matches!(result, Err(AppError::Storage(_))));
    }

    #[tokio::test]
    async fn test_replace_unknown_id_fails() {
        let collection = Collection::in_memory();
        let result = collection.replace(movie("9", "Nobody")).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_remove() {
        let collection = Collection::in_memory();
        collection.insert(movie("1", "Heat")).await.unwrap();

        assert!(collection.remove("1").await.unwrap());
        assert!(!collection.remove("1").await.unwrap());
        assert_eq!(collection.count().await, 0);
    }

    #[tokio::test]
    async fn test_remove_where() {
        let collection = Collection::in_memory();
        collection.insert(movie("1", "Heat")).await.unwrap();
        collection.insert(movie("2", "Ronin")).await.unwrap();
        collection.insert(movie("3", "Hanna")).await.unwrap();

        let removed = collection.remove_where(|m| m.title.starts_with('H')).await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(collection.count().await, 1);
    }

    #[tokio::test]
    async fn test_persistence_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "cinelog-store-test-{}.jsonl",
            unique_suffix()
        ));

        {
            let collection: Collection<MovieRecord> =
                Collection::open(path.clone()).await.unwrap();
            collection.insert(movie("1", "Heat")).await.unwrap();
            collection.insert(movie("2", "Ronin")).await.unwrap();
            collection.remove("2").await.unwrap();
        }

        let reopened: Collection<MovieRecord> = Collection::open(path.clone()).await.unwrap();
        assert_eq!(reopened.count().await, 1);
        assert_eq!(reopened.get("1").await.unwrap().title, "Heat");

        tokio::fs::remove_file(&path).await.unwrap();
    }

    fn unique_suffix() -> String {
        use std::time::{SystemTime, UNIX_EPOCH};
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        format!("{nanos}-{}", std::process::id())
    }
}
