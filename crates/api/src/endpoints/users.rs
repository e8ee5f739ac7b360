//! User endpoints: profiles, moderation, follows, blocks and favorites.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use cinelog_common::AppResult;
use cinelog_core::{AdminUpdateUserInput, UpdateProfileInput, UserProfile};
use cinelog_store::records::UserRecord;

use crate::{
    endpoints::PageQuery,
    extractors::{AdminUser, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// User response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub reputation: i32,
    pub is_admin: bool,
    pub is_suspended: bool,
    pub favorite_movie_ids: Vec<String>,
    pub created_at: String,
}

impl From<UserRecord> for UserResponse {
    fn from(u: UserRecord) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            reputation: u.reputation,
            is_admin: u.is_admin,
            is_suspended: u.is_suspended,
            favorite_movie_ids: u.favorite_movie_ids,
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

/// User profile response with derived counts.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub total_reviews: usize,
}

impl From<UserProfile> for ProfileResponse {
    fn from(p: UserProfile) -> Self {
        Self {
            user: p.user.into(),
            total_reviews: p.total_reviews,
        }
    }
}

/// List/search query parameters.
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    /// Username substring filter.
    pub username: Option<String>,
    #[serde(default = "super::default_page")]
    pub page: usize,
    #[serde(default = "super::default_limit")]
    pub limit: usize,
}

impl ListUsersQuery {
    fn page(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// List users, optionally filtered by username substring.
async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let page = query.page();
    let (limit, offset) = (page.limit(), page.offset());

    let users = match query.username.as_deref() {
        Some(q) => state.user_service.search(q, limit, offset).await,
        None => state.user_service.list(limit, offset).await,
    };

    Ok(ApiResponse::ok(users.into_iter().map(Into::into).collect()))
}

/// The caller's own profile.
async fn my_profile(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let profile = state.user_service.profile(&user.id).await?;
    Ok(ApiResponse::ok(profile.into()))
}

/// Update the caller's own profile.
async fn update_me(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileInput>,
) -> AppResult<ApiResponse<UserResponse>> {
    let updated = state.user_service.update_profile(&user.id, req).await?;
    Ok(ApiResponse::ok(updated.into()))
}

/// A user's public profile.
async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let profile = state.user_service.profile(&id).await?;
    Ok(ApiResponse::ok(profile.into()))
}

/// Admin update of a user's account fields.
async fn admin_update_user(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AdminUpdateUserInput>,
) -> AppResult<ApiResponse<UserResponse>> {
    let updated = state.user_service.admin_update(&id, req).await?;
    Ok(ApiResponse::ok(updated.into()))
}

/// Deletion response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse {
    pub deleted: bool,
}

/// Delete a user account and everything attached to it.
async fn delete_user(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<DeletedResponse>> {
    state.user_service.delete_account(&id).await?;
    Ok(ApiResponse::ok(DeletedResponse { deleted: true }))
}

/// Suspend a user account.
async fn suspend_user(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.suspend(&id).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Reactivate a suspended user account.
async fn reactivate_user(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.reactivate(&id).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Follow a user.
async fn follow_user(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.follow_service.follow(&user.id, &id).await?;
    Ok(ApiResponse::ok(()))
}

/// Unfollow a user.
async fn unfollow_user(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.follow_service.unfollow(&user.id, &id).await?;
    Ok(ApiResponse::ok(()))
}

/// A user's followers (paginated).
async fn list_followers(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(page): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let users = state
        .follow_service
        .followers(&id, page.limit(), page.offset())
        .await?;
    Ok(ApiResponse::ok(users.into_iter().map(Into::into).collect()))
}

/// Users a user follows (paginated).
async fn list_following(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(page): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let users = state
        .follow_service
        .following(&id, page.limit(), page.offset())
        .await?;
    Ok(ApiResponse::ok(users.into_iter().map(Into::into).collect()))
}

/// Block a user.
async fn block_user(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.block_service.block(&user.id, &id).await?;
    Ok(ApiResponse::ok(()))
}

/// Unblock a user.
async fn unblock_user(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.block_service.unblock(&user.id, &id).await?;
    Ok(ApiResponse::ok(()))
}

/// Users the caller has blocked (paginated).
async fn list_blocked(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let users = state
        .block_service
        .blocked_users(&user.id, page.limit(), page.offset())
        .await;
    Ok(ApiResponse::ok(users.into_iter().map(Into::into).collect()))
}

/// Cleared-count response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearedResponse {
    pub cleared: usize,
}

/// Clear the caller's block list.
async fn clear_blocked(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<ClearedResponse>> {
    let cleared = state.block_service.clear_blocked(&user.id).await?;
    Ok(ApiResponse::ok(ClearedResponse { cleared }))
}

/// Favorite-toggle response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteResponse {
    pub movie_id: String,
    /// True when the movie was added, false when removed.
    pub favorited: bool,
}

/// Toggle a movie in the caller's favorites.
async fn toggle_favorite(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
) -> AppResult<ApiResponse<FavoriteResponse>> {
    let favorited = state
        .user_service
        .toggle_favorite(&user.id, &movie_id)
        .await?;
    Ok(ApiResponse::ok(FavoriteResponse { movie_id, favorited }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/me", get(my_profile).put(update_me))
        .route("/me/blocked", get(list_blocked).delete(clear_blocked))
        .route("/me/favorites/{movie_id}", post(toggle_favorite))
        .route(
            "/{id}",
            get(get_user).put(admin_update_user).delete(delete_user),
        )
        .route("/{id}/suspend", post(suspend_user))
        .route("/{id}/reactivate", post(reactivate_user))
        .route("/{id}/follow", post(follow_user).delete(unfollow_user))
        .route("/{id}/followers", get(list_followers))
        .route("/{id}/following", get(list_following))
        .route("/{id}/block", post(block_user).delete(unblock_user))
}
