use super::find_user_by_email;
use crate::api::ErrorResponse;
use crate::auth::{revoke_sessions, AuthUser, Role};
use crate::db::DbPool;
use crate::error::{ApiError, ApiResult};
use crate::schema::users;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/user/disable/{email}",
    tag = "user",
    params(
        ("email" = String, Path, description = "Email of the account to disable")
    ),
    responses(
        (status = 204, description = "Account disabled"),
        (status = 400, description = "Cannot disable an admin account", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Staff only", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn disable_user(
    auth: AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(email): Path<String>,
) -> ApiResult<impl IntoResponse> {
    auth.require_staff()?;

    let mut conn = pool.get()?;
    let user = find_user_by_email(&mut conn, &email)?;
    if user.role() == Role::Admin {
        return Err(ApiError::bad_request("Cannot disable an admin account"));
    }

    conn.transaction(|conn| {
        diesel::update(users::table.find(user.id))
            .set(users::is_enabled.eq(false))
            .execute(conn)?;
        revoke_sessions(conn, user.id)
    })?;

    tracing::info!(user_id = %user.id, by = %auth.0.id, "Disabled user");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/user/enable/{email}",
    tag = "user",
    params(
        ("email" = String, Path, description = "Email of the account to enable")
    ),
    responses(
        (status = 204, description = "Account enabled"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admins only", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn enable_user(
    auth: AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(email): Path<String>,
) -> ApiResult<impl IntoResponse> {
    auth.require_admin()?;

    let mut conn = pool.get()?;
    let user = find_user_by_email(&mut conn, &email)?;

    diesel::update(users::table.find(user.id))
        .set(users::is_enabled.eq(true))
        .execute(&mut conn)?;

    tracing::info!(user_id = %user.id, by = %auth.0.id, "Enabled user");
    Ok(StatusCode::NO_CONTENT)
}
