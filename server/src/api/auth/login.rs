use crate::api::ErrorResponse;
use crate::auth::{create_session, verify_password};
use crate::config::Config;
use crate::db::DbPool;
use crate::email_matches;
use crate::error::{ApiError, ApiResult};
use crate::models::User;
use crate::schema::users;
use axum::{extract::State, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
}

/// Only enabled, verified users with the right password may log in.
fn can_log_in(user: &User, password: &str) -> bool {
    user.is_enabled && user.is_verified && verify_password(password, &user.password_hash)
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body(content = LoginRequest, example = json!({"email": "guest@example.com", "password": "password"})),
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let mut conn = pool.get()?;

    let user: Option<User> = users::table
        .filter(email_matches!(req.email.trim()))
        .select(User::as_select())
        .first(&mut conn)
        .optional()?;

    let user = match user {
        Some(user) if can_log_in(&user, &req.password) => user,
        _ => return Err(ApiError::Unauthorized("Invalid credentials".to_string())),
    };

    let access_token = create_session(&mut conn, user.id, config.session_ttl_minutes)?;
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse { access_token }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::hash_password;
    use chrono::Utc;
    use uuid::Uuid;

    fn user(is_enabled: bool, is_verified: bool) -> User {
        User {
            id: Uuid::new_v4(),
            email: "guest@example.com".to_string(),
            password_hash: hash_password("secret").unwrap(),
            name: String::new(),
            about_me: String::new(),
            role: "USER".to_string(),
            is_enabled,
            is_verified,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_login_requires_enabled_verified_and_password() {
        assert!(can_log_in(&user(true, true), "secret"));
        assert!(!can_log_in(&user(true, true), "wrong"));
        assert!(!can_log_in(&user(false, true), "secret"));
        assert!(!can_log_in(&user(true, false), "secret"));
    }
}
