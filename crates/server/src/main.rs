//! Cinelog server entry point.

use std::net::SocketAddr;

use axum::{Router, middleware};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinelog_api::{AppState, auth_middleware, router as api_router};
use cinelog_common::Config;
use cinelog_core::{
    BlockService, CatalogService, FollowService, MovieService, NotificationService,
    PenaltyService, ReviewService, SessionService, UserService,
};
use cinelog_store::Store;
use cinelog_store::repositories::{
    BlockRepository, FollowRepository, MovieRepository, NotificationRepository, PenaltyRepository,
    ReportRepository, ReviewRepository, UserRepository,
};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
#[allow(clippy::expect_used)]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinelog=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting cinelog server...");

    // Load configuration
    let config = Config::load()?;

    // Open the record store
    let store = Store::open(&config.storage.data_dir).await?;
    info!(data_dir = %config.storage.data_dir, "Record store opened");

    // Initialize repositories
    let user_repo = UserRepository::new(store.users.clone());
    let movie_repo = MovieRepository::new(store.movies.clone());
    let review_repo = ReviewRepository::new(store.reviews.clone());
    let penalty_repo = PenaltyRepository::new(store.penalties.clone());
    let report_repo = ReportRepository::new(store.reports.clone());
    let follow_repo = FollowRepository::new(store.follows.clone());
    let block_repo = BlockRepository::new(store.blocks.clone());
    let notification_repo = NotificationRepository::new(store.notifications.clone());

    // Initialize services
    let notification_service = NotificationService::new(notification_repo.clone());
    let session_service = SessionService::new(config.session.ttl_minutes);

    let user_service = UserService::new(
        user_repo.clone(),
        movie_repo.clone(),
        review_repo.clone(),
        penalty_repo.clone(),
        report_repo.clone(),
        follow_repo.clone(),
        block_repo.clone(),
        notification_repo,
    );
    let follow_service = FollowService::new(
        follow_repo.clone(),
        block_repo.clone(),
        user_repo.clone(),
        notification_service.clone(),
    );
    let block_service = BlockService::new(block_repo, follow_repo, user_repo.clone());
    let movie_service = MovieService::new(
        movie_repo.clone(),
        review_repo.clone(),
        report_repo.clone(),
    );
    let review_service = ReviewService::new(
        review_repo,
        movie_repo,
        user_repo.clone(),
        report_repo,
        notification_service.clone(),
    );
    let penalty_service = PenaltyService::new(penalty_repo, user_repo, notification_service.clone());

    let catalog_service = CatalogService::from_config(&config.catalog);
    if catalog_service.is_some() {
        info!("External movie catalog enabled");
    } else {
        info!("External movie catalog disabled (no API key configured)");
    }

    // Create app state
    let state = AppState {
        user_service,
        session_service,
        follow_service,
        block_service,
        movie_service,
        review_service,
        penalty_service,
        notification_service,
        catalog_service,
    };

    // Build router
    let app = Router::new()
        .merge(api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
