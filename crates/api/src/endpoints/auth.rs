//! Authentication endpoints.

use axum::{Json, Router, extract::State, routing::post};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};

use cinelog_common::AppResult;
use cinelog_core::RegisterUserInput;

use crate::{
    extractors::AuthUser,
    middleware::{AppState, SESSION_COOKIE},
    response::ApiResponse,
};

/// Signup request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Session-holder response for signup/signin.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: String,
    pub username: String,
    pub is_admin: bool,
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .build()
}

/// Create a new user account and sign in.
async fn signup(
    jar: CookieJar,
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> AppResult<(CookieJar, ApiResponse<SessionResponse>)> {
    let user = state
        .user_service
        .register(RegisterUserInput {
            username: req.username,
            email: req.email,
            password: req.password,
        })
        .await?;

    let token = state.session_service.create(&user.id).await;

    Ok((
        jar.add(session_cookie(token)),
        ApiResponse::ok(SessionResponse {
            id: user.id,
            username: user.username,
            is_admin: user.is_admin,
        }),
    ))
}

/// Signin request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigninRequest {
    pub username: String,
    pub password: String,
}

/// Sign in to an existing account.
async fn signin(
    jar: CookieJar,
    State(state): State<AppState>,
    Json(req): Json<SigninRequest>,
) -> AppResult<(CookieJar, ApiResponse<SessionResponse>)> {
    let user = state
        .user_service
        .authenticate(&req.username, &req.password)
        .await?;

    let token = state.session_service.create(&user.id).await;

    Ok((
        jar.add(session_cookie(token)),
        ApiResponse::ok(SessionResponse {
            id: user.id,
            username: user.username,
            is_admin: user.is_admin,
        }),
    ))
}

/// Signout response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignoutResponse {
    pub ok: bool,
}

/// Sign out and drop the session.
async fn signout(
    AuthUser(_user): AuthUser,
    jar: CookieJar,
    State(state): State<AppState>,
) -> AppResult<(CookieJar, ApiResponse<SignoutResponse>)> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.session_service.revoke(cookie.value()).await;
    }

    let removal = Cookie::build(SESSION_COOKIE).path("/").build();
    Ok((
        jar.remove(removal),
        ApiResponse::ok(SignoutResponse { ok: true }),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
        .route("/signout", post(signout))
}
