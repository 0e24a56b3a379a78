use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::User;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use super::db::get_session_user;
use super::Role;

/// Authenticated, enabled user resolved from the `Authorization: Bearer` header.
pub struct AuthUser(pub User);

/// Session that authenticated the current request. Inserted into the request
/// extensions by [`AuthUser`].
#[derive(Debug, Clone, Copy)]
pub struct CurrentSession(pub Uuid);

#[derive(Debug)]
pub enum AuthError {
    MissingHeader,
    InvalidHeader,
    InvalidFormat,
    InvalidToken,
    Database,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingHeader => (StatusCode::UNAUTHORIZED, "Missing Authorization header"),
            AuthError::InvalidHeader => (StatusCode::UNAUTHORIZED, "Invalid Authorization header"),
            AuthError::InvalidFormat => (
                StatusCode::UNAUTHORIZED,
                "Invalid Authorization header format",
            ),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid or expired token"),
            AuthError::Database => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };

        (
            status,
            Json(ErrorResponse {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}

/// Pull the bearer token out of the request headers.
fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let header = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?;
    let value = header.to_str().map_err(|_| AuthError::InvalidHeader)?;
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::InvalidFormat)
}

impl<S> FromRequestParts<S> for AuthUser
where
    Arc<DbPool>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Header checks come first so malformed requests never touch the pool
        let token = bearer_token(parts)?.to_string();

        let pool = Arc::<DbPool>::from_ref(state);
        let mut conn = pool.get().map_err(|e| {
            tracing::error!(error = %e, "Failed to get DB connection for auth");
            AuthError::Database
        })?;

        let (session_id, user) = get_session_user(&mut conn, &token)
            .map_err(|e| {
                tracing::error!(error = %e, "Session lookup failed");
                AuthError::Database
            })?
            .ok_or(AuthError::InvalidToken)?;

        parts.extensions.insert(CurrentSession(session_id));
        Ok(AuthUser(user))
    }
}

impl AuthUser {
    pub fn role(&self) -> Role {
        self.0.role()
    }

    /// Staff (moderators and admins) only.
    pub fn require_staff(&self) -> Result<(), ApiError> {
        if self.role().is_staff() {
            Ok(())
        } else {
            Err(ApiError::forbidden("Insufficient permissions"))
        }
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.role() == Role::Admin {
            Ok(())
        } else {
            Err(ApiError::forbidden("Insufficient permissions"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(auth: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/auth/profile");
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token_extracted() {
        let parts = parts_with(Some("Bearer abc123"));
        assert_eq!(bearer_token(&parts).unwrap(), "abc123");
    }

    #[test]
    fn test_missing_header() {
        let parts = parts_with(None);
        assert!(matches!(bearer_token(&parts), Err(AuthError::MissingHeader)));
    }

    #[test]
    fn test_wrong_scheme_and_empty_token() {
        let parts = parts_with(Some("Token abc123"));
        assert!(matches!(bearer_token(&parts), Err(AuthError::InvalidFormat)));

        let parts = parts_with(Some("Bearer   "));
        assert!(matches!(bearer_token(&parts), Err(AuthError::InvalidFormat)));
    }
}
