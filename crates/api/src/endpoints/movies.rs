//! Movie catalog endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use cinelog_common::{AppError, AppResult};
use cinelog_core::{CreateMovieInput, ExternalMovie, MovieSort, RatedMovie, UpdateMovieInput};
use cinelog_store::records::MovieRecord;

use crate::{
    endpoints::PageQuery,
    extractors::AdminUser,
    middleware::AppState,
    response::ApiResponse,
};

/// Movie response with its read-time derived rating.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieResponse {
    pub id: String,
    pub title: String,
    pub year: i32,
    pub genre: String,
    pub director: String,
    pub description: String,
    /// `null` when the movie has no reviews.
    pub average_rating: Option<f64>,
    pub review_count: usize,
    pub created_at: String,
}

impl From<RatedMovie> for MovieResponse {
    fn from(rated: RatedMovie) -> Self {
        let m = rated.movie;
        Self {
            id: m.id,
            title: m.title,
            year: m.year,
            genre: m.genre,
            director: m.director,
            description: m.description,
            average_rating: rated.average_rating,
            review_count: rated.review_count,
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

impl From<MovieRecord> for MovieResponse {
    fn from(m: MovieRecord) -> Self {
        RatedMovie {
            movie: m,
            average_rating: None,
            review_count: 0,
        }
        .into()
    }
}

/// Catalog listing/search query parameters.
#[derive(Debug, Deserialize)]
pub struct ListMoviesQuery {
    /// Free-text query over title, director and description.
    pub q: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub sort: Option<MovieSort>,
    #[serde(default = "super::default_page")]
    pub page: usize,
    #[serde(default = "super::default_limit")]
    pub limit: usize,
}

impl ListMoviesQuery {
    fn page(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// List or search the catalog.
async fn list_movies(
    State(state): State<AppState>,
    Query(query): Query<ListMoviesQuery>,
) -> AppResult<ApiResponse<Vec<MovieResponse>>> {
    let page = query.page();
    let (limit, offset) = (page.limit(), page.offset());

    let movies = if query.q.is_none()
        && query.genre.is_none()
        && query.year.is_none()
        && query.sort.is_none()
    {
        state.movie_service.list(limit, offset).await
    } else {
        state
            .movie_service
            .search(
                query.q.as_deref(),
                query.genre.as_deref(),
                query.year,
                query.sort,
                limit,
                offset,
            )
            .await
    };

    Ok(ApiResponse::ok(movies.into_iter().map(Into::into).collect()))
}

/// Get a movie with its derived rating.
async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<MovieResponse>> {
    let rated = state.movie_service.get(&id).await?;
    Ok(ApiResponse::ok(rated.into()))
}

/// Create a movie.
async fn create_movie(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Json(req): Json<CreateMovieInput>,
) -> AppResult<ApiResponse<MovieResponse>> {
    let movie = state.movie_service.create(req).await?;
    Ok(ApiResponse::ok(movie.into()))
}

/// Update a movie.
async fn update_movie(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateMovieInput>,
) -> AppResult<ApiResponse<MovieResponse>> {
    state.movie_service.update(&id, req).await?;
    let rated = state.movie_service.get(&id).await?;
    Ok(ApiResponse::ok(rated.into()))
}

/// Deletion response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse {
    pub deleted: bool,
}

/// Delete a movie, cascading its reviews and their reports.
async fn delete_movie(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<DeletedResponse>> {
    state.movie_service.delete(&id).await?;
    Ok(ApiResponse::ok(DeletedResponse { deleted: true }))
}

/// External catalog search query parameters.
#[derive(Debug, Deserialize)]
pub struct ExternalSearchQuery {
    pub q: String,
    #[serde(default = "default_external_limit")]
    pub limit: usize,
}

const fn default_external_limit() -> usize {
    10
}

/// Search the external catalog.
async fn search_external(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Query(query): Query<ExternalSearchQuery>,
) -> AppResult<ApiResponse<Vec<ExternalMovie>>> {
    let catalog = state
        .catalog_service
        .as_ref()
        .ok_or_else(catalog_disabled)?;

    let results = catalog.search(&query.q, query.limit.min(50)).await?;
    Ok(ApiResponse::ok(results))
}

/// Import request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportMovieRequest {
    pub external_id: String,
}

/// Import a movie from the external catalog.
async fn import_movie(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Json(req): Json<ImportMovieRequest>,
) -> AppResult<ApiResponse<MovieResponse>> {
    let catalog = state
        .catalog_service
        .as_ref()
        .ok_or_else(catalog_disabled)?;

    let external = catalog.fetch(&req.external_id).await?;
    let movie = state
        .movie_service
        .create(CreateMovieInput {
            title: external.title,
            year: external.year,
            genre: external.genre,
            director: external.director,
            description: external.description,
        })
        .await?;

    Ok(ApiResponse::ok(movie.into()))
}

fn catalog_disabled() -> AppError {
    AppError::ExternalService("External movie catalog is not configured".to_string())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_movies).post(create_movie))
        .route("/external/search", get(search_external))
        .route("/import", post(import_movie))
        .route(
            "/{id}",
            get(get_movie).put(update_movie).delete(delete_movie),
        )
}
