//! Request extractors.

use axum::{extract::FromRequestParts, http::request::Parts};

use cinelog_common::AppError;
use cinelog_store::records::UserRecord;

/// Authenticated user extractor.
#[derive(Debug, Clone)]
pub struct AuthUser(pub UserRecord);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by the auth middleware when the session cookie resolves
        parts
            .extensions
            .get::<UserRecord>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}

/// Optional authenticated user extractor.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<UserRecord>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<UserRecord>().cloned()))
    }
}

/// Authenticated admin extractor.
///
/// Yields 401 without a session and 403 for a non-admin caller.
#[derive(Debug, Clone)]
pub struct AdminUser(pub UserRecord);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<UserRecord>()
            .cloned()
            .ok_or(AppError::Unauthorized)?;

        if !user.is_admin {
            return Err(AppError::Forbidden("Admin privileges required".to_string()));
        }

        Ok(Self(user))
    }
}
