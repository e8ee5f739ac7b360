//! API endpoints.

mod auth;
mod meta;
mod movies;
mod notifications;
mod penalties;
mod reviews;
mod users;

use axum::Router;
use serde::Deserialize;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(meta::router())
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/movies", movies::router())
        .nest("/reviews", reviews::router())
        .nest("/penalties", penalties::router())
        .nest("/notifications", notifications::router())
}

/// Common pagination query parameters.
///
/// Query structs that mix pagination with other filters repeat these two
/// fields instead of `#[serde(flatten)]`-ing this struct: flattened structs
/// hit serde_urlencoded's string-only intermediate values and fail to parse
/// numbers.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

const MAX_PAGE_LIMIT: usize = 100;

pub(crate) const fn default_page() -> usize {
    1
}

pub(crate) const fn default_limit() -> usize {
    20
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl PageQuery {
    /// Page size, clamped to `1..=100`.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit.clamp(1, MAX_PAGE_LIMIT)
    }

    /// Offset of the first item on this page.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1) * self.limit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_clamps_limit() {
        let q = PageQuery { page: 2, limit: 500 };
        assert_eq!(q.limit(), 100);
        assert_eq!(q.offset(), 100);
    }

    #[test]
    fn test_page_query_first_page_offset() {
        let q = PageQuery::default();
        assert_eq!(q.offset(), 0);

        let zero = PageQuery { page: 0, limit: 20 };
        assert_eq!(zero.offset(), 0);
    }
}
