//! Movie catalog service.

use chrono::Utc;
use serde::Deserialize;
use validator::Validate;

use cinelog_common::{AppError, AppResult};
use cinelog_store::records::MovieRecord;
use cinelog_store::repositories::{MovieRepository, ReportRepository, ReviewRepository};

/// A movie with its read-time derived rating.
#[derive(Debug, Clone)]
pub struct RatedMovie {
    pub movie: MovieRecord,
    /// Arithmetic mean of review ratings; `None` when unreviewed.
    pub average_rating: Option<f64>,
    pub review_count: usize,
}

/// Sort order for catalog listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MovieSort {
    /// Alphabetical by title.
    Title,
    /// Newest release year first.
    YearDesc,
}

/// Input for creating a movie.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovieInput {
    #[validate(length(min = 1, max = 256))]
    pub title: String,

    #[serde(default)]
    pub year: i32,

    #[serde(default)]
    pub genre: String,

    #[serde(default)]
    pub director: String,

    #[serde(default)]
    pub description: String,
}

/// Input for updating a movie (all fields optional).
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMovieInput {
    #[validate(length(min = 1, max = 256))]
    pub title: Option<String>,
    pub year: Option<i32>,
    pub genre: Option<String>,
    pub director: Option<String>,
    pub description: Option<String>,
}

/// Movie service for business logic.
#[derive(Clone)]
pub struct MovieService {
    movie_repo: MovieRepository,
    review_repo: ReviewRepository,
    report_repo: ReportRepository,
}

impl MovieService {
    /// Create a new movie service.
    #[must_use]
    pub const fn new(
        movie_repo: MovieRepository,
        review_repo: ReviewRepository,
        report_repo: ReportRepository,
    ) -> Self {
        Self {
            movie_repo,
            review_repo,
            report_repo,
        }
    }

    /// Create a movie.
    pub async fn create(&self, input: CreateMovieInput) -> AppResult<MovieRecord> {
        input.validate()?;

        if self.movie_repo.find_by_title(&input.title).await.is_some() {
            return Err(AppError::Conflict(format!(
                "Movie with title '{}' already exists",
                input.title
            )));
        }

        let movie = MovieRecord {
            id: self.movie_repo.next_id().await,
            title: input.title,
            year: input.year,
            genre: input.genre,
            director: input.director,
            description: input.description,
            created_at: Utc::now(),
        };

        let movie = self.movie_repo.create(movie).await?;
        tracing::info!(movie_id = %movie.id, title = %movie.title, "Movie created");
        Ok(movie)
    }

    /// Update a movie.
    pub async fn update(&self, id: &str, input: UpdateMovieInput) -> AppResult<MovieRecord> {
        input.validate()?;
        let mut movie = self.movie_repo.get_by_id(id).await?;

        if let Some(title) = input.title {
            if self
                .movie_repo
                .find_by_title(&title)
                .await
                .is_some_and(|other| other.id != id)
            {
                return Err(AppError::Conflict(format!(
                    "Movie with title '{title}' already exists"
                )));
            }
            movie.title = title;
        }
        if let Some(year) = input.year {
            movie.year = year;
        }
        if let Some(genre) = input.genre {
            movie.genre = genre;
        }
        if let Some(director) = input.director {
            movie.director = director;
        }
        if let Some(description) = input.description {
            movie.description = description;
        }

        let movie = self.movie_repo.update(movie).await?;
        tracing::info!(movie_id = %movie.id, "Movie updated");
        Ok(movie)
    }

    /// Delete a movie, cascading its reviews and those reviews' reports.
    ///
    /// The ten seed catalog entries cannot be deleted.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let movie = self.movie_repo.get_by_id(id).await?;
        if movie.is_seed() {
            return Err(AppError::Validation(
                "Seed movies cannot be deleted".to_string(),
            ));
        }

        for review_id in self.review_repo.ids_for_movie(id).await {
            self.report_repo.delete_by_review(&review_id).await?;
        }
        let reviews = self.review_repo.delete_by_movie(id).await?;
        self.movie_repo.delete(id).await?;

        tracing::info!(movie_id = %id, title = %movie.title, reviews, "Movie deleted");
        Ok(())
    }

    /// Get a movie with its derived rating.
    pub async fn get(&self, id: &str) -> AppResult<RatedMovie> {
        let movie = self.movie_repo.get_by_id(id).await?;
        Ok(self.with_rating(movie).await)
    }

    /// Catalog listing in id order (paginated).
    pub async fn list(&self, limit: usize, offset: usize) -> Vec<RatedMovie> {
        let movies = self.movie_repo.list(limit, offset).await;
        self.with_ratings(movies).await
    }

    /// Free-text search with optional filters and sorting (paginated).
    ///
    /// The query matches title, director or description; genre is an exact
    /// case-insensitive match; year is exact.
    pub async fn search(
        &self,
        query: Option<&str>,
        genre: Option<&str>,
        year: Option<i32>,
        sort: Option<MovieSort>,
        limit: usize,
        offset: usize,
    ) -> Vec<RatedMovie> {
        let needle = query.map(str::to_lowercase);
        let genre_needle = genre.map(str::to_lowercase);

        let mut movies: Vec<MovieRecord> = self
            .movie_repo
            .list_all()
            .await
            .into_iter()
            .filter(|m| {
                needle.as_deref().is_none_or(|q| {
                    m.title.to_lowercase().contains(q)
                        || m.director.to_lowercase().contains(q)
                        || m.description.to_lowercase().contains(q)
                })
            })
            .filter(|m| {
                genre_needle
                    .as_deref()
                    .is_none_or(|g| m.genre.to_lowercase() == g)
            })
            .filter(|m| year.is_none_or(|y| m.year == y))
            .collect();

        match sort {
            Some(MovieSort::Title) => {
                movies.sort_by_key(|m| m.title.to_lowercase());
            }
            Some(MovieSort::YearDesc) => {
                movies.sort_by(|a, b| b.year.cmp(&a.year));
            }
            None => {}
        }

        let page: Vec<MovieRecord> = movies.into_iter().skip(offset).take(limit).collect();
        self.with_ratings(page).await
    }

    /// Total number of catalog entries.
    pub async fn count(&self) -> usize {
        self.movie_repo.count().await
    }

    async fn with_rating(&self, movie: MovieRecord) -> RatedMovie {
        let ratings = self.review_repo.ratings_for_movie(&movie.id).await;
        let review_count = ratings.len();
        let average_rating = if ratings.is_empty() {
            None
        } else {
            let sum: u32 = ratings.iter().map(|r| u32::from(*r)).sum();
            Some(f64::from(sum) / review_count as f64)
        };
        RatedMovie {
            movie,
            average_rating,
            review_count,
        }
    }

    async fn with_ratings(&self, movies: Vec<MovieRecord>) -> Vec<RatedMovie> {
        let mut rated = Vec::with_capacity(movies.len());
        for movie in movies {
            rated.push(self.with_rating(movie).await);
        }
        rated
    }
}
