//! External movie catalog client.
//!
//! Talks to a TMDB-shaped HTTP API so admins can search and import catalog
//! entries instead of typing them in by hand. Disabled unless an API key is
//! configured.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use cinelog_common::config::CatalogConfig;
use cinelog_common::{AppError, AppResult};

/// A movie as returned by the external catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalMovie {
    pub external_id: String,
    pub title: String,
    pub genre: String,
    pub year: i32,
    pub director: String,
    pub description: String,
    pub poster_url: Option<String>,
    pub rating: Option<f64>,
}

/// Client for the external movie catalog API.
#[derive(Clone)]
pub struct CatalogService {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    genre_cache: Arc<RwLock<Option<HashMap<i64, String>>>>,
}

#[derive(Deserialize)]
struct GenreListResponse {
    #[serde(default)]
    genres: Vec<Genre>,
}

#[derive(Deserialize)]
struct Genre {
    id: i64,
    name: String,
}

#[derive(Deserialize)]
struct CreditsResponse {
    #[serde(default)]
    crew: Vec<CrewMember>,
}

#[derive(Deserialize)]
struct CrewMember {
    name: String,
    #[serde(default)]
    job: Option<String>,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Deserialize)]
struct SearchResult {
    id: i64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    genre_ids: Vec<i64>,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    vote_average: Option<f64>,
}

#[derive(Deserialize)]
struct MovieDetail {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    genres: Vec<Genre>,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    vote_average: Option<f64>,
}

impl CatalogService {
    /// Build the service from configuration. Returns `None` when no API key
    /// is configured.
    #[must_use]
    pub fn from_config(config: &CatalogConfig) -> Option<Self> {
        let api_key = config.api_key.clone()?;
        Some(Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            genre_cache: Arc::new(RwLock::new(None)),
        })
    }

    /// Search the external catalog.
    pub async fn search(&self, query: &str, limit: usize) -> AppResult<Vec<ExternalMovie>> {
        let url = format!("{}/search/movie", self.base_url);
        let response: SearchResponse = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("query", query),
                ("language", "en-US"),
                ("page", "1"),
            ])
            .send()
            .await
            .map_err(external_error)?
            .error_for_status()
            .map_err(external_error)?
            .json()
            .await
            .map_err(external_error)?;

        let genre_map = self.genre_map().await;

        let mut movies = Vec::new();
        for result in response.results.into_iter().take(limit) {
            let director = self.director_of(result.id).await;
            let genre = join_genres(
                result
                    .genre_ids
                    .iter()
                    .filter_map(|id| genre_map.get(id).cloned()),
            );

            movies.push(ExternalMovie {
                external_id: result.id.to_string(),
                title: result.title.unwrap_or_else(|| "Unknown".to_string()),
                genre,
                year: year_of(result.release_date.as_deref()),
                director,
                description: result.overview.unwrap_or_default(),
                poster_url: result.poster_path.as_deref().map(poster_url),
                rating: result.vote_average,
            });
        }

        tracing::info!(query = %query, count = movies.len(), "External catalog search");
        Ok(movies)
    }

    /// Fetch a single movie from the external catalog.
    pub async fn fetch(&self, external_id: &str) -> AppResult<ExternalMovie> {
        let url = format!("{}/movie/{external_id}", self.base_url);
        let detail: MovieDetail = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", "en-US"),
            ])
            .send()
            .await
            .map_err(external_error)?
            .error_for_status()
            .map_err(|e| {
                if e.status() == Some(reqwest::StatusCode::NOT_FOUND) {
                    AppError::NotFound(format!(
                        "External movie '{external_id}' not found"
                    ))
                } else {
                    external_error(e)
                }
            })?
            .json()
            .await
            .map_err(external_error)?;

        let director = match external_id.parse::<i64>() {
            Ok(id) => self.director_of(id).await,
            Err(_) => "Unknown".to_string(),
        };

        Ok(ExternalMovie {
            external_id: external_id.to_string(),
            title: detail.title.unwrap_or_else(|| "Unknown".to_string()),
            genre: join_genres(detail.genres.into_iter().map(|g| g.name)),
            year: year_of(detail.release_date.as_deref()),
            director,
            description: detail.overview.unwrap_or_default(),
            poster_url: detail.poster_path.as_deref().map(poster_url),
            rating: detail.vote_average,
        })
    }

    /// Genre id to name mapping, fetched once and cached.
    async fn genre_map(&self) -> HashMap<i64, String> {
        if let Some(cached) = self.genre_cache.read().await.clone() {
            return cached;
        }

        let url = format!("{}/genre/movie/list", self.base_url);
        let fetched = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status);

        let map = match fetched {
            Ok(response) => match response.json::<GenreListResponse>().await {
                Ok(list) => list.genres.into_iter().map(|g| (g.id, g.name)).collect(),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to decode genre list");
                    HashMap::new()
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch genre list");
                HashMap::new()
            }
        };

        if !map.is_empty() {
            *self.genre_cache.write().await = Some(map.clone());
        }
        map
    }

    /// Director name from the credits endpoint; "Unknown" on any failure.
    async fn director_of(&self, movie_id: i64) -> String {
        let url = format!("{}/movie/{movie_id}/credits", self.base_url);
        let fetched = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status);

        match fetched {
            Ok(response) => match response.json::<CreditsResponse>().await {
                Ok(credits) => credits
                    .crew
                    .into_iter()
                    .find(|member| member.job.as_deref() == Some("Director"))
                    .map_or_else(|| "Unknown".to_string(), |member| member.name),
                Err(_) => "Unknown".to_string(),
            },
            Err(e) => {
                tracing::warn!(movie_id, error = %e, "Failed to fetch credits");
                "Unknown".to_string()
            }
        }
    }
}

fn external_error(e: reqwest::Error) -> AppError {
    AppError::ExternalService(format!("External catalog request failed: {e}"))
}

/// First two genres joined with a slash, "Unknown" when absent.
fn join_genres(genres: impl Iterator<Item = String>) -> String {
    let joined: Vec<String> = genres.take(2).collect();
    if joined.is_empty() {
        "Unknown".to_string()
    } else {
        joined.join("/")
    }
}

fn year_of(release_date: Option<&str>) -> i32 {
    release_date
        .and_then(|d| d.get(..4))
        .and_then(|y| y.parse().ok())
        .unwrap_or(0)
}

fn poster_url(poster_path: &str) -> String {
    format!("https://image.tmdb.org/t/p/w500{poster_path}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_of() {
        assert_eq!(year_of(Some("1995-12-15")), 1995);
        assert_eq!(year_of(Some("")), 0);
        assert_eq!(year_of(None), 0);
    }

    #[test]
    fn test_join_genres_takes_first_two() {
        let genres = ["Crime", "Thriller", "Drama"]
            .into_iter()
            .map(str::to_string);
        assert_eq!(join_genres(genres), "Crime/Thriller");
        assert_eq!(join_genres(std::iter::empty()), "Unknown");
    }

    #[test]
    fn test_disabled_without_api_key() {
        let config = CatalogConfig {
            base_url: "https://api.themoviedb.org/3".to_string(),
            api_key: None,
        };
        assert!(CatalogService::from_config(&config).is_none());
    }
}
