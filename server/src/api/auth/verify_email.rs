use crate::api::{ErrorResponse, MessageResponse};
use crate::auth::{consume_email_token, TokenPurpose};
use crate::db::DbPool;
use crate::error::{ApiError, ApiResult};
use crate::schema::users;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
pub struct VerifyEmailParams {
    /// Token from the verification email
    pub token: Option<String>,
}

#[utoipa::path(
    get,
    path = "/auth/verify-email",
    tag = "auth",
    params(VerifyEmailParams),
    responses(
        (status = 200, description = "Email verified", body = MessageResponse),
        (status = 400, description = "Invalid or expired token", body = ErrorResponse)
    )
)]
pub async fn verify_email(
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<VerifyEmailParams>,
) -> ApiResult<impl IntoResponse> {
    let invalid = || ApiError::bad_request("Invalid or expired token");
    let token = params.token.filter(|t| !t.is_empty()).ok_or_else(invalid)?;

    let mut conn = pool.get()?;
    let user_id = conn.transaction(|conn| {
        let Some(user_id) = consume_email_token(conn, &token, TokenPurpose::VerifyEmail)? else {
            return Ok(None);
        };
        diesel::update(users::table.find(user_id))
            .set(users::is_verified.eq(true))
            .execute(conn)?;
        Ok::<_, diesel::result::Error>(Some(user_id))
    })?;

    let user_id = user_id.ok_or_else(invalid)?;
    tracing::info!(user_id = %user_id, "Email verified");

    Ok(Json(MessageResponse::new("Email verified successfully")))
}
