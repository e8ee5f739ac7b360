//! HTTP API layer for cinelog.
//!
//! This crate provides the JSON REST API:
//!
//! - **Endpoints**: resource-oriented routes under `/users`, `/movies`,
//!   `/reviews` and `/penalties`
//! - **Extractors**: cookie-session authentication, admin gating
//! - **Middleware**: session resolution
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, SESSION_COOKIE, auth_middleware};
