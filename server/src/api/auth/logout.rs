use crate::api::ErrorResponse;
use crate::auth::{delete_session, AuthUser, CurrentSession};
use crate::db::DbPool;
use crate::error::ApiResult;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Extension,
};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    responses(
        (status = 204, description = "Session ended"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn logout(
    AuthUser(user): AuthUser,
    Extension(CurrentSession(session_id)): Extension<CurrentSession>,
    State(pool): State<Arc<DbPool>>,
) -> ApiResult<impl IntoResponse> {
    let mut conn = pool.get()?;
    delete_session(&mut conn, session_id)?;
    tracing::info!(user_id = %user.id, "User logged out");

    Ok(StatusCode::NO_CONTENT)
}
