//! Notification endpoints.

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use cinelog_common::AppResult;
use cinelog_store::records::{NotificationKind, NotificationRecord};

use crate::{
    endpoints::PageQuery,
    extractors::AuthUser,
    middleware::AppState,
    response::ApiResponse,
};

/// Notification response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: String,
    pub notifier_id: Option<String>,
    pub kind: NotificationKind,
    pub body: String,
    pub is_read: bool,
    pub created_at: String,
}

impl From<NotificationRecord> for NotificationResponse {
    fn from(n: NotificationRecord) -> Self {
        Self {
            id: n.id,
            notifier_id: n.notifier_id,
            kind: n.kind,
            body: n.body,
            is_read: n.is_read,
            created_at: n.created_at.to_rfc3339(),
        }
    }
}

/// Notification listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListNotificationsQuery {
    #[serde(default)]
    pub unread: bool,
    #[serde(default = "super::default_page")]
    pub page: usize,
    #[serde(default = "super::default_limit")]
    pub limit: usize,
}

impl ListNotificationsQuery {
    fn page(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// The caller's notifications, newest first (paginated).
async fn list_notifications(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListNotificationsQuery>,
) -> AppResult<ApiResponse<Vec<NotificationResponse>>> {
    let page = query.page();
    let notifications = state
        .notification_service
        .list(&user.id, page.limit(), page.offset(), query.unread)
        .await;
    Ok(ApiResponse::ok(
        notifications.into_iter().map(Into::into).collect(),
    ))
}

/// Unread-count response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountResponse {
    pub unread: usize,
}

/// Count the caller's unread notifications.
async fn unread_count(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<UnreadCountResponse>> {
    let unread = state.notification_service.count_unread(&user.id).await;
    Ok(ApiResponse::ok(UnreadCountResponse { unread }))
}

/// Mark one notification as read.
async fn mark_read(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state
        .notification_service
        .mark_as_read(&user.id, &id)
        .await?;
    Ok(ApiResponse::ok(()))
}

/// Read-count response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkedReadResponse {
    pub marked: usize,
}

/// Mark all notifications as read.
async fn mark_all_read(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<MarkedReadResponse>> {
    let marked = state.notification_service.mark_all_as_read(&user.id).await?;
    Ok(ApiResponse::ok(MarkedReadResponse { marked }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/unread-count", get(unread_count))
        .route("/read-all", post(mark_all_read))
        .route("/{id}/read", post(mark_read))
}
