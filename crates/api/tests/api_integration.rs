//! API integration tests.
//!
//! These tests drive the full router, auth middleware included, over an
//! in-memory store.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    middleware,
};
use serde_json::{Value, json};
use tower::ServiceExt;

use cinelog_api::{AppState, auth_middleware, router as api_router};
use cinelog_core::{
    BlockService, FollowService, MovieService, NotificationService, PenaltyService, ReviewService,
    SessionService, UserService,
};
use cinelog_store::Store;
use cinelog_store::repositories::{
    BlockRepository, FollowRepository, MovieRepository, NotificationRepository, PenaltyRepository,
    ReportRepository, ReviewRepository, UserRepository,
};

/// Create test app state over an in-memory store.
fn create_test_state() -> (AppState, Store) {
    let store = Store::in_memory();

    let user_repo = UserRepository::new(store.users.clone());
    let movie_repo = MovieRepository::new(store.movies.clone());
    let review_repo = ReviewRepository::new(store.reviews.clone());
    let penalty_repo = PenaltyRepository::new(store.penalties.clone());
    let report_repo = ReportRepository::new(store.reports.clone());
    let follow_repo = FollowRepository::new(store.follows.clone());
    let block_repo = BlockRepository::new(store.blocks.clone());
    let notification_repo = NotificationRepository::new(store.notifications.clone());

    let notification_service = NotificationService::new(notification_repo.clone());

    let state = AppState {
        user_service: UserService::new(
            user_repo.clone(),
            movie_repo.clone(),
            review_repo.clone(),
            penalty_repo.clone(),
            report_repo.clone(),
            follow_repo.clone(),
            block_repo.clone(),
            notification_repo,
        ),
        session_service: SessionService::new(120),
        follow_service: FollowService::new(
            follow_repo.clone(),
            block_repo.clone(),
            user_repo.clone(),
            notification_service.clone(),
        ),
        block_service: BlockService::new(block_repo, follow_repo, user_repo.clone()),
        movie_service: MovieService::new(
            movie_repo.clone(),
            review_repo.clone(),
            report_repo.clone(),
        ),
        review_service: ReviewService::new(
            review_repo,
            movie_repo,
            user_repo.clone(),
            report_repo,
            notification_service.clone(),
        ),
        penalty_service: PenaltyService::new(penalty_repo, user_repo, notification_service.clone()),
        notification_service,
        catalog_service: None,
    };

    (state, store)
}

fn test_app(state: AppState) -> Router {
    Router::new()
        .merge(api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    cookie: Option<&str>,
) -> (StatusCode, Value, Option<String>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, body, set_cookie)
}

async fn signup(app: &Router, username: &str) -> String {
    let (status, _, cookie) = send(
        app,
        "POST",
        "/auth/signup",
        Some(json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "securePass123@",
        })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    cookie.expect("signup sets a session cookie")
}

/// Sign up a user, promote them to admin, and sign in again so the session
/// reflects the admin flag.
async fn signup_admin(app: &Router, store: &Store, username: &str) -> String {
    signup(app, username).await;

    let repo = UserRepository::new(store.users.clone());
    let mut user = repo.find_by_username(username).await.unwrap();
    user.is_admin = true;
    repo.update(user).await.unwrap();

    let (status, _, cookie) = send(
        app,
        "POST",
        "/auth/signin",
        Some(json!({"username": username, "password": "securePass123@"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    cookie.unwrap()
}

async fn create_movie(app: &Router, admin_cookie: &str, title: &str) -> String {
    let (status, body, _) = send(
        app,
        "POST",
        "/movies",
        Some(json!({"title": title, "year": 1995, "genre": "Crime"})),
        Some(admin_cookie),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_meta_endpoint() {
    let (state, _store) = create_test_state();
    let app = test_app(state);

    let (status, body, _) = send(&app, "GET", "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "online");
}

#[tokio::test]
async fn test_signup_signin_and_bad_password() {
    let (state, _store) = create_test_state();
    let app = test_app(state);

    signup(&app, "alice").await;

    // Duplicate username conflicts
    let (status, body, _) = send(
        &app,
        "POST",
        "/auth/signup",
        Some(json!({
            "username": "alice",
            "email": "other@example.com",
            "password": "securePass123@",
        })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");

    // Wrong password is unauthorized
    let (status, _, _) = send(
        &app,
        "POST",
        "/auth/signin",
        Some(json!({"username": "alice", "password": "wrongPass123@"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_review_flow_with_average_and_conflict() {
    let (state, store) = create_test_state();
    let app = test_app(state);

    let admin = signup_admin(&app, &store, "root").await;
    let alice = signup(&app, "alice").await;
    let movie_id = create_movie(&app, &admin, "Heat").await;

    // Unauthenticated review creation is rejected
    let (status, _, _) = send(
        &app,
        "POST",
        "/reviews",
        Some(json!({"movieId": movie_id, "rating": 4, "text": "fine"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Out-of-range rating is a validation error
    let (status, _, _) = send(
        &app,
        "POST",
        "/reviews",
        Some(json!({"movieId": movie_id, "rating": 6, "text": ""})),
        Some(&alice),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // A valid review lands and drives the average
    let (status, _, _) = send(
        &app,
        "POST",
        "/reviews",
        Some(json!({"movieId": movie_id, "rating": 4, "text": "fine"})),
        Some(&alice),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body, _) = send(&app, "GET", &format!("/movies/{movie_id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["averageRating"], 4.0);
    assert_eq!(body["data"]["reviewCount"], 1);

    // A second review for the same movie conflicts
    let (status, _, _) = send(
        &app,
        "POST",
        "/reviews",
        Some(json!({"movieId": movie_id, "rating": 5, "text": ""})),
        Some(&alice),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Reviewing an unknown movie is not found
    let (status, _, _) = send(
        &app,
        "POST",
        "/reviews",
        Some(json!({"movieId": "9999", "rating": 3, "text": ""})),
        Some(&alice),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_gating_on_movie_management() {
    let (state, store) = create_test_state();
    let app = test_app(state);

    let alice = signup(&app, "alice").await;

    // Non-admin creation is forbidden
    let (status, _, _) = send(
        &app,
        "POST",
        "/movies",
        Some(json!({"title": "Heat"})),
        Some(&alice),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Unauthenticated creation is unauthorized
    let (status, _, _) = send(&app, "POST", "/movies", Some(json!({"title": "Heat"})), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let admin = signup_admin(&app, &store, "root").await;

    // Seed movies (ids 1..=10) cannot be deleted
    let movie_id = create_movie(&app, &admin, "Seed One").await;
    assert_eq!(movie_id, "1");
    let (status, _, _) = send(
        &app,
        "DELETE",
        &format!("/movies/{movie_id}"),
        None,
        Some(&admin),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_suspension_gates_reviews_via_api() {
    let (state, store) = create_test_state();
    let app = test_app(state);

    let admin = signup_admin(&app, &store, "root").await;
    let bob = signup(&app, "bob").await;
    let movie_id = create_movie(&app, &admin, "Heat").await;

    let (_, body, _) = send(&app, "GET", "/users/me", None, Some(&bob)).await;
    let bob_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _, _) = send(
        &app,
        "POST",
        &format!("/users/{bob_id}/suspend"),
        None,
        Some(&admin),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, _) = send(
        &app,
        "POST",
        "/reviews",
        Some(json!({"movieId": movie_id, "rating": 4, "text": ""})),
        Some(&bob),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, _) = send(
        &app,
        "POST",
        &format!("/users/{bob_id}/reactivate"),
        None,
        Some(&admin),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, _) = send(
        &app,
        "POST",
        "/reviews",
        Some(json!({"movieId": movie_id, "rating": 4, "text": ""})),
        Some(&bob),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_follow_block_and_notifications() {
    let (state, _store) = create_test_state();
    let app = test_app(state);

    let alice = signup(&app, "alice").await;
    let bob = signup(&app, "bob").await;

    let (_, body, _) = send(&app, "GET", "/users/me", None, Some(&alice)).await;
    let alice_id = body["data"]["id"].as_str().unwrap().to_string();
    let (_, body, _) = send(&app, "GET", "/users/me", None, Some(&bob)).await;
    let bob_id = body["data"]["id"].as_str().unwrap().to_string();

    // Alice follows Bob; Bob gets a notification
    let (status, _, _) = send(
        &app,
        "POST",
        &format!("/users/{bob_id}/follow"),
        None,
        Some(&alice),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body, _) = send(&app, "GET", "/notifications", None, Some(&bob)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["kind"], "follow");

    // Self-follow is rejected
    let (status, _, _) = send(
        &app,
        "POST",
        &format!("/users/{alice_id}/follow"),
        None,
        Some(&alice),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Bob blocks Alice: the follow edge disappears
    let (status, _, _) = send(
        &app,
        "POST",
        &format!("/users/{alice_id}/block"),
        None,
        Some(&bob),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body, _) = send(
        &app,
        "GET",
        &format!("/users/{bob_id}/followers"),
        None,
        None,
    )
    .await;
    assert!(body["data"].as_array().unwrap().is_empty());

    // And Alice can no longer follow Bob
    let (status, _, _) = send(
        &app,
        "POST",
        &format!("/users/{bob_id}/follow"),
        None,
        Some(&alice),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_penalty_endpoints_and_status_filter() {
    let (state, store) = create_test_state();
    let app = test_app(state);

    let admin = signup_admin(&app, &store, "root").await;
    let bob = signup(&app, "bob").await;

    let (_, body, _) = send(&app, "GET", "/users/me", None, Some(&bob)).await;
    let bob_id = body["data"]["id"].as_str().unwrap().to_string();

    // Non-admin cannot list penalties
    let (status, _, _) = send(&app, "GET", "/penalties", None, Some(&bob)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body, _) = send(
        &app,
        "POST",
        "/penalties",
        Some(json!({
            "userId": bob_id,
            "reason": "Post does not follow community guidelines",
            "severity": 3,
        })),
        Some(&admin),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isActive"], true);

    // Invalid status filter is a validation error
    let (status, _, _) = send(&app, "GET", "/penalties?status=bogus", None, Some(&admin)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // The target sees it under /penalties/my, and was notified
    let (status, body, _) = send(&app, "GET", "/penalties/my", None, Some(&bob)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["active"].as_array().unwrap().len(), 1);
    assert!(body["data"]["historical"].as_array().unwrap().is_empty());

    let (_, body, _) = send(&app, "GET", "/notifications/unread-count", None, Some(&bob)).await;
    assert_eq!(body["data"]["unread"], 1);
}

#[tokio::test]
async fn test_report_moderation_flow() {
    let (state, store) = create_test_state();
    let app = test_app(state);

    let admin = signup_admin(&app, &store, "root").await;
    let alice = signup(&app, "alice").await;
    let bob = signup(&app, "bob").await;
    let movie_id = create_movie(&app, &admin, "Heat").await;

    let (_, body, _) = send(
        &app,
        "POST",
        "/reviews",
        Some(json!({"movieId": movie_id, "rating": 1, "text": "rubbish"})),
        Some(&alice),
    )
    .await;
    let review_id = body["data"]["id"].as_str().unwrap().to_string();

    // Bob reports it twice; duplicates are accepted
    for reason in ["rude", "still rude"] {
        let (status, _, _) = send(
            &app,
            "POST",
            &format!("/reviews/{review_id}/report"),
            Some(json!({"reason": reason})),
            Some(&bob),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    // Regular users cannot see the report queue
    let (status, _, _) = send(&app, "GET", "/reviews/reports", None, Some(&bob)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body, _) = send(&app, "GET", "/reviews/reports", None, Some(&admin)).await;
    let reports = body["data"].as_array().unwrap();
    assert_eq!(reports.len(), 2);
    let report_id = reports[0]["id"].as_str().unwrap().to_string();

    // Mark one viewed, then filter by viewed status
    let (status, _, _) = send(
        &app,
        "POST",
        &format!("/reviews/reports/{report_id}/viewed"),
        None,
        Some(&admin),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body, _) = send(
        &app,
        "GET",
        "/reviews/reports?viewed=false",
        None,
        Some(&admin),
    )
    .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // Admin deletes the review: remaining reports cascade, author notified
    let (status, _, _) = send(
        &app,
        "DELETE",
        &format!("/reviews/{review_id}"),
        None,
        Some(&admin),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body, _) = send(&app, "GET", "/reviews/reports", None, Some(&admin)).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (_, body, _) = send(&app, "GET", "/notifications", None, Some(&alice)).await;
    let kinds: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|n| n["kind"].as_str())
        .collect();
    assert!(kinds.contains(&"review_removed"));
}

#[tokio::test]
async fn test_signout_invalidates_session() {
    let (state, _store) = create_test_state();
    let app = test_app(state);

    let alice = signup(&app, "alice").await;

    let (status, _, _) = send(&app, "GET", "/users/me", None, Some(&alice)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, _) = send(&app, "POST", "/auth/signout", None, Some(&alice)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, _) = send(&app, "GET", "/users/me", None, Some(&alice)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
