//! API middleware.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::Response,
};

use cinelog_core::{
    BlockService, CatalogService, FollowService, MovieService, NotificationService,
    PenaltyService, ReviewService, SessionService, UserService,
};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session_token";

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub session_service: SessionService,
    pub follow_service: FollowService,
    pub block_service: BlockService,
    pub movie_service: MovieService,
    pub review_service: ReviewService,
    pub penalty_service: PenaltyService,
    pub notification_service: NotificationService,
    /// Absent when no external catalog API key is configured.
    pub catalog_service: Option<CatalogService>,
}

/// Authentication middleware.
///
/// Resolves the `session_token` cookie to a user and stores the user record
/// in request extensions for the extractors.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(token) = session_token(req.headers())
        && let Some(user_id) = state.session_service.resolve(&token).await
        && let Ok(user) = state.user_service.get(&user_id).await
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}

/// Extract the session token from the `Cookie` header.
fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_session_token_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session_token=abc123; lang=en"),
        );
        assert_eq!(session_token(&headers).as_deref(), Some("abc123"));

        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(session_token(&headers), None);
    }
}
