//! Service metadata endpoint.

use axum::{Router, extract::State, routing::get};
use serde::Serialize;

use cinelog_common::AppResult;

use crate::{middleware::AppState, response::ApiResponse};

/// Service metadata response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub total_users: usize,
    pub total_movies: usize,
    pub total_reviews: usize,
}

/// Service metadata and record counts.
async fn meta(State(state): State<AppState>) -> AppResult<ApiResponse<MetaResponse>> {
    Ok(ApiResponse::ok(MetaResponse {
        name: "cinelog",
        version: env!("CARGO_PKG_VERSION"),
        status: "online",
        total_users: state.user_service.count().await,
        total_movies: state.movie_service.count().await,
        total_reviews: state.review_service.count().await,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(meta))
}
