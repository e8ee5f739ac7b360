//! Movie repository.

use cinelog_common::{AppError, AppResult};

use crate::records::MovieRecord;
use crate::repositories::paginate;
use crate::storage::Collection;

/// Movie repository for store operations.
#[derive(Clone)]
pub struct MovieRepository {
    movies: Collection<MovieRecord>,
}

impl MovieRepository {
    /// Create a new movie repository.
    #[must_use]
    pub const fn new(movies: Collection<MovieRecord>) -> Self {
        Self { movies }
    }

    /// Find a movie by ID.
    pub async fn find_by_id(&self, id: &str) -> Option<MovieRecord> {
        self.movies.get(id).await
    }

    /// Find a movie by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<MovieRecord> {
        self.find_by_id(id)
            .await
            .ok_or_else(|| AppError::MovieNotFound(id.to_string()))
    }

    /// Find a movie by exact title (case-insensitive).
    pub async fn find_by_title(&self, title: &str) -> Option<MovieRecord> {
        let needle = title.to_lowercase();
        self.movies
            .find(|m| m.title.to_lowercase() == needle)
            .await
            .into_iter()
            .next()
    }

    /// Next sequential decimal id (`"1"` for an empty catalog).
    pub async fn next_id(&self) -> String {
        let max = self
            .movies
            .list()
            .await
            .iter()
            .filter_map(|m| m.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        (max + 1).to_string()
    }

    /// Create a new movie.
    pub async fn create(&self, movie: MovieRecord) -> AppResult<MovieRecord> {
        self.movies.insert(movie).await
    }

    /// Update a movie.
    pub async fn update(&self, movie: MovieRecord) -> AppResult<MovieRecord> {
        self.movies.replace(movie).await
    }

    /// Delete a movie.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if self.movies.remove(id).await? {
            Ok(())
        } else {
            Err(AppError::MovieNotFound(id.to_string()))
        }
    }

    /// All movies, in catalog (numeric id) order.
    pub async fn list_all(&self) -> Vec<MovieRecord> {
        let mut movies = self.movies.list().await;
        movies.sort_by_key(|m| m.id.parse::<u64>().unwrap_or(u64::MAX));
        movies
    }

    /// Movies in catalog order (paginated).
    pub async fn list(&self, limit: usize, offset: usize) -> Vec<MovieRecord> {
        paginate(self.list_all().await, limit, offset)
    }

    /// Count all movies.
    pub async fn count(&self) -> usize {
        self.movies.count().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn movie(id: &str, title: &str) -> MovieRecord {
        MovieRecord {
            id: id.to_string(),
            title: title.to_string(),
            year: 1995,
            genre: "Crime".to_string(),
            director: String::new(),
            description: String::new(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_next_id_starts_at_one() {
        let repo = MovieRepository::new(Collection::in_memory());
        assert_eq!(repo.next_id().await, "1");
    }

    #[tokio::test]
    async fn test_next_id_follows_max() {
        let repo = MovieRepository::new(Collection::in_memory());
        repo.create(movie("1", "Heat")).await.unwrap();
        repo.create(movie("7", "Ronin")).await.unwrap();

        assert_eq!(repo.next_id().await, "8");
    }

    #[tokio::test]
    async fn test_find_by_title_is_case_insensitive() {
        let repo = MovieRepository::new(Collection::in_memory());
        repo.create(movie("1", "Heat")).await.unwrap();

        assert!(repo.find_by_title("heat").await.is_some());
        assert!(repo.find_by_title("HEAT").await.is_some());
        assert!(repo.find_by_title("Ronin").await.is_none());
    }

    #[tokio::test]
    async fn test_list_is_in_catalog_order() {
        let repo = MovieRepository::new(Collection::in_memory());
        repo.create(movie("10", "Tenth")).await.unwrap();
        repo.create(movie("2", "Second")).await.unwrap();
        repo.create(movie("1", "First")).await.unwrap();

        let all: Vec<String> = repo.list_all().await.into_iter().map(|m| m.id).collect();
        assert_eq!(all, vec!["1", "2", "10"]);
    }
}
