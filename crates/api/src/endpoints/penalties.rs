//! Penalty endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use cinelog_common::{AppError, AppResult};
use cinelog_core::{CreatePenaltyInput, PenaltyHistory, PenaltyStatus, UpdatePenaltyInput};
use cinelog_store::records::PenaltyRecord;

use crate::{
    extractors::{AdminUser, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Penalty response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PenaltyResponse {
    pub id: String,
    pub user_id: String,
    pub issued_by: String,
    pub reason: String,
    pub severity: u8,
    pub start_date: String,
    /// `null` means permanent.
    pub end_date: Option<String>,
    pub created_at: String,
    /// Read-time status.
    pub is_active: bool,
}

impl From<PenaltyRecord> for PenaltyResponse {
    fn from(p: PenaltyRecord) -> Self {
        let is_active = p.is_active();
        Self {
            id: p.id,
            user_id: p.user_id,
            issued_by: p.issued_by,
            reason: p.reason,
            severity: p.severity,
            start_date: p.start_date.to_rfc3339(),
            end_date: p.end_date.map(|t| t.to_rfc3339()),
            created_at: p.created_at.to_rfc3339(),
            is_active,
        }
    }
}

/// A user's penalties split by read-time status.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PenaltyHistoryResponse {
    pub active: Vec<PenaltyResponse>,
    pub historical: Vec<PenaltyResponse>,
}

impl From<PenaltyHistory> for PenaltyHistoryResponse {
    fn from(h: PenaltyHistory) -> Self {
        Self {
            active: h.active.into_iter().map(Into::into).collect(),
            historical: h.historical.into_iter().map(Into::into).collect(),
        }
    }
}

/// Penalty listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListPenaltiesQuery {
    /// `active` or `inactive`.
    pub status: Option<String>,
    pub user_id: Option<String>,
}

fn parse_status(status: Option<&str>) -> AppResult<Option<PenaltyStatus>> {
    match status {
        None => Ok(None),
        Some("active") => Ok(Some(PenaltyStatus::Active)),
        Some("inactive") => Ok(Some(PenaltyStatus::Inactive)),
        Some(_) => Err(AppError::Validation(
            "Invalid status. Must be 'active' or 'inactive'".to_string(),
        )),
    }
}

/// Issue a penalty.
async fn create_penalty(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Json(req): Json<CreatePenaltyInput>,
) -> AppResult<ApiResponse<PenaltyResponse>> {
    let penalty = state.penalty_service.create(&admin.id, req).await?;
    Ok(ApiResponse::ok(penalty.into()))
}

/// List penalties, optionally filtered by status and target user.
async fn list_penalties(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Query(query): Query<ListPenaltiesQuery>,
) -> AppResult<ApiResponse<Vec<PenaltyResponse>>> {
    let status = parse_status(query.status.as_deref())?;
    let penalties = state
        .penalty_service
        .list(status, query.user_id.as_deref())
        .await?;
    Ok(ApiResponse::ok(
        penalties.into_iter().map(Into::into).collect(),
    ))
}

/// The caller's own penalties, split into active and historical.
async fn my_penalties(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<PenaltyHistoryResponse>> {
    let history = state.penalty_service.history_for_user(&user.id).await?;
    Ok(ApiResponse::ok(history.into()))
}

/// Get a penalty.
async fn get_penalty(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<PenaltyResponse>> {
    let penalty = state.penalty_service.get(&id).await?;
    Ok(ApiResponse::ok(penalty.into()))
}

/// Update a penalty.
async fn update_penalty(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdatePenaltyInput>,
) -> AppResult<ApiResponse<PenaltyResponse>> {
    let penalty = state.penalty_service.update(&id, req).await?;
    Ok(ApiResponse::ok(penalty.into()))
}

/// Deletion response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse {
    pub deleted: bool,
}

/// Delete a penalty.
async fn delete_penalty(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<DeletedResponse>> {
    state.penalty_service.delete(&id).await?;
    Ok(ApiResponse::ok(DeletedResponse { deleted: true }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_penalty).get(list_penalties))
        .route("/my", get(my_penalties))
        .route(
            "/{id}",
            get(get_penalty).put(update_penalty).delete(delete_penalty),
        )
}
