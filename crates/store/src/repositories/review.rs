//! Review repository.

use cinelog_common::{AppError, AppResult};

use crate::records::ReviewRecord;
use crate::repositories::paginate;
use crate::storage::Collection;

/// Review repository for store operations.
#[derive(Clone)]
pub struct ReviewRepository {
    reviews: Collection<ReviewRecord>,
}

impl ReviewRepository {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(reviews: Collection<ReviewRecord>) -> Self {
        Self { reviews }
    }

    /// Find a review by ID.
    pub async fn find_by_id(&self, id: &str) -> Option<ReviewRecord> {
        self.reviews.get(id).await
    }

    /// Find a review by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<ReviewRecord> {
        self.find_by_id(id)
            .await
            .ok_or_else(|| AppError::ReviewNotFound(id.to_string()))
    }

    /// Find the review a user wrote for a movie, if any.
    pub async fn find_by_author_and_movie(
        &self,
        author_id: &str,
        movie_id: &str,
    ) -> Option<ReviewRecord> {
        self.reviews
            .find(|r| r.author_id == author_id && r.movie_id == movie_id)
            .await
            .into_iter()
            .next()
    }

    /// Reviews for a movie, newest first (paginated).
    pub async fn find_by_movie(
        &self,
        movie_id: &str,
        limit: usize,
        offset: usize,
    ) -> Vec<ReviewRecord> {
        let mut reviews = self.reviews.find(|r| r.movie_id == movie_id).await;
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        paginate(reviews, limit, offset)
    }

    /// Reviews written by a user, newest first (paginated).
    pub async fn find_by_author(
        &self,
        author_id: &str,
        limit: usize,
        offset: usize,
    ) -> Vec<ReviewRecord> {
        let mut reviews = self.reviews.find(|r| r.author_id == author_id).await;
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        paginate(reviews, limit, offset)
    }

    /// All ratings for a movie. Used to derive the average on read.
    pub async fn ratings_for_movie(&self, movie_id: &str) -> Vec<u8> {
        self.reviews
            .find(|r| r.movie_id == movie_id)
            .await
            .into_iter()
            .map(|r| r.rating)
            .collect()
    }

    /// Ids of every review for a movie. Used for cascading deletes.
    pub async fn ids_for_movie(&self, movie_id: &str) -> Vec<String> {
        self.reviews
            .find(|r| r.movie_id == movie_id)
            .await
            .into_iter()
            .map(|r| r.id)
            .collect()
    }

    /// Ids of every review by an author. Used for cascading deletes.
    pub async fn ids_for_author(&self, author_id: &str) -> Vec<String> {
        self.reviews
            .find(|r| r.author_id == author_id)
            .await
            .into_iter()
            .map(|r| r.id)
            .collect()
    }

    /// Create a new review.
    pub async fn create(&self, review: ReviewRecord) -> AppResult<ReviewRecord> {
        self.reviews.insert(review).await
    }

    /// Update a review.
    pub async fn update(&self, review: ReviewRecord) -> AppResult<ReviewRecord> {
        self.reviews.replace(review).await
    }

    /// Delete a review.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if self.reviews.remove(id).await? {
            Ok(())
        } else {
            Err(AppError::ReviewNotFound(id.to_string()))
        }
    }

    /// Delete every review for a movie. Returns the removed count.
    pub async fn delete_by_movie(&self, movie_id: &str) -> AppResult<usize> {
        self.reviews.remove_where(|r| r.movie_id == movie_id).await
    }

    /// Delete every review by an author. Returns the removed count.
    pub async fn delete_by_author(&self, author_id: &str) -> AppResult<usize> {
        self.reviews
            .remove_where(|r| r.author_id == author_id)
            .await
    }

    /// Count all reviews.
    pub async fn count(&self) -> usize {
        self.reviews.count().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn review(id: &str, movie_id: &str, author_id: &str, age_mins: i64) -> ReviewRecord {
        ReviewRecord {
            id: id.to_string(),
            movie_id: movie_id.to_string(),
            author_id: author_id.to_string(),
            rating: 4,
            text: "fine".to_string(),
            created_at: Utc::now() - Duration::minutes(age_mins),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_movie_newest_first() {
        let repo = ReviewRepository::new(Collection::in_memory());
        repo.create(review("r1", "1", "u1", 30)).await.unwrap();
        repo.create(review("r2", "1", "u2", 10)).await.unwrap();
        repo.create(review("r3", "2", "u1", 5)).await.unwrap();

        let reviews = repo.find_by_movie("1", 10, 0).await;
        let ids: Vec<&str> = reviews.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r2", "r1"]);
    }

    #[tokio::test]
    async fn test_find_by_author_and_movie() {
        let repo = ReviewRepository::new(Collection::in_memory());
        repo.create(review("r1", "1", "u1", 0)).await.unwrap();

        assert!(repo.find_by_author_and_movie("u1", "1").await.is_some());
        assert!(repo.find_by_author_and_movie("u1", "2").await.is_none());
        assert!(repo.find_by_author_and_movie("u2", "1").await.is_none());
    }

    #[tokio::test]
    async fn test_delete_by_movie_removes_only_that_movie() {
        let repo = ReviewRepository::new(Collection::in_memory());
        repo.create(review("r1", "1", "u1", 0)).await.unwrap();
        repo.create(review("r2", "1", "u2", 0)).await.unwrap();
        repo.create(review("r3", "2", "u1", 0)).await.unwrap();

        let removed = repo.delete_by_movie("1").await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(repo.count().await, 1);
        assert!(repo.find_by_id("r3").await.is_some());
    }
}
