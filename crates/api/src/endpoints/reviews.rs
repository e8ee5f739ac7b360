//! Review endpoints, including report moderation.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use cinelog_common::AppResult;
use cinelog_core::{CreateReviewInput, UpdateReviewInput};
use cinelog_store::records::{ReportRecord, ReviewRecord};

use crate::{
    endpoints::PageQuery,
    extractors::{AdminUser, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Review response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: String,
    pub movie_id: String,
    pub author_id: String,
    pub rating: u8,
    pub text: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<ReviewRecord> for ReviewResponse {
    fn from(r: ReviewRecord) -> Self {
        Self {
            id: r.id,
            movie_id: r.movie_id,
            author_id: r.author_id,
            rating: r.rating,
            text: r.text,
            created_at: r.created_at.to_rfc3339(),
            updated_at: r.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Report response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub id: String,
    pub review_id: String,
    pub reporter_id: String,
    pub reason: String,
    pub admin_viewed: bool,
    pub created_at: String,
}

impl From<ReportRecord> for ReportResponse {
    fn from(r: ReportRecord) -> Self {
        Self {
            id: r.id,
            review_id: r.review_id,
            reporter_id: r.reporter_id,
            reason: r.reason,
            admin_viewed: r.admin_viewed,
            created_at: r.created_at.to_rfc3339(),
        }
    }
}

/// Create a review.
async fn create_review(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateReviewInput>,
) -> AppResult<ApiResponse<ReviewResponse>> {
    let review = state.review_service.create(&user.id, req).await?;
    Ok(ApiResponse::ok(review.into()))
}

/// Get a review.
async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ReviewResponse>> {
    let review = state.review_service.get(&id).await?;
    Ok(ApiResponse::ok(review.into()))
}

/// Update a review (author only).
async fn update_review(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateReviewInput>,
) -> AppResult<ApiResponse<ReviewResponse>> {
    let review = state.review_service.update(&id, &user.id, req).await?;
    Ok(ApiResponse::ok(review.into()))
}

/// Deletion response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse {
    pub deleted: bool,
}

/// Delete a review (author or admin).
async fn delete_review(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<DeletedResponse>> {
    state.review_service.delete(&id, &user).await?;
    Ok(ApiResponse::ok(DeletedResponse { deleted: true }))
}

/// Reviews for a movie, newest first (paginated).
async fn list_by_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
    Query(page): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<ReviewResponse>>> {
    let reviews = state
        .review_service
        .list_by_movie(&movie_id, page.limit(), page.offset())
        .await?;
    Ok(ApiResponse::ok(reviews.into_iter().map(Into::into).collect()))
}

/// Reviews by a user, newest first (paginated).
async fn list_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(page): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<ReviewResponse>>> {
    let reviews = state
        .review_service
        .list_by_user(&user_id, page.limit(), page.offset())
        .await?;
    Ok(ApiResponse::ok(reviews.into_iter().map(Into::into).collect()))
}

/// Report request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportReviewRequest {
    #[serde(default)]
    pub reason: String,
}

/// Report a review.
async fn report_review(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ReportReviewRequest>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let report = state
        .review_service
        .report(&user.id, &id, &req.reason)
        .await?;
    Ok(ApiResponse::ok(report.into()))
}

/// Report listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListReportsQuery {
    /// Filter by admin-viewed status.
    pub viewed: Option<bool>,
    #[serde(default = "super::default_page")]
    pub page: usize,
    #[serde(default = "super::default_limit")]
    pub limit: usize,
}

impl ListReportsQuery {
    fn page(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// List reports for moderation.
async fn list_reports(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Query(query): Query<ListReportsQuery>,
) -> AppResult<ApiResponse<Vec<ReportResponse>>> {
    let page = query.page();
    let reports = state
        .review_service
        .list_reports(query.viewed, page.limit(), page.offset())
        .await;
    Ok(ApiResponse::ok(reports.into_iter().map(Into::into).collect()))
}

/// Mark a report as viewed.
async fn mark_report_viewed(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let report = state.review_service.mark_report_viewed(&id).await?;
    Ok(ApiResponse::ok(report.into()))
}

/// Dismiss a report without touching the review.
async fn dismiss_report(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<DeletedResponse>> {
    state.review_service.dismiss_report(&id).await?;
    Ok(ApiResponse::ok(DeletedResponse { deleted: true }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_review))
        .route("/movie/{movie_id}", get(list_by_movie))
        .route("/user/{user_id}", get(list_by_user))
        .route("/reports", get(list_reports))
        .route("/reports/{id}/viewed", post(mark_report_viewed))
        .route("/reports/{id}", axum::routing::delete(dismiss_report))
        .route(
            "/{id}",
            get(get_review).put(update_review).delete(delete_review),
        )
        .route("/{id}/report", post(report_review))
}
