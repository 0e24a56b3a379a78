use crate::api::{ErrorResponse, MessageResponse};
use crate::auth::{consume_email_token, hash_password, issue_email_token, revoke_sessions, TokenPurpose};
use crate::config::Config;
use crate::db::DbPool;
use crate::email::{self, EmailAction, Mailer};
use crate::email_matches;
use crate::error::{ApiError, ApiResult};
use crate::models::User;
use crate::schema::users;
use axum::{extract::State, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

const FORGOT_PASSWORD_MESSAGE: &str = "If that email exists, a link has been sent";

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

#[utoipa::path(
    post,
    path = "/auth/forgot-password",
    tag = "auth",
    request_body(content = ForgotPasswordRequest, example = json!({"email": "guest@example.com"})),
    responses(
        (status = 200, description = "Reset link sent if the account exists", body = MessageResponse),
        (status = 400, description = "Reset requested again too soon", body = ErrorResponse)
    )
)]
pub async fn forgot_password(
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    State(mailer): State<Arc<dyn Mailer>>,
    Json(req): Json<ForgotPasswordRequest>,
) -> ApiResult<impl IntoResponse> {
    let mut conn = pool.get()?;

    let user: Option<User> = users::table
        .filter(email_matches!(req.email.trim()))
        .select(User::as_select())
        .first(&mut conn)
        .optional()?;

    if let Some(user) = user {
        // Rejected requests issue no token
        email::ensure_cooldown_elapsed(&mut conn, user.id, EmailAction::ResetPassword)?;
        let token = issue_email_token(&mut conn, user.id, TokenPurpose::ResetPassword)?;
        let reset_url = format!("{}/reset-password/{}", config.frontend_url, token);
        let mail = email::reset_password_mail(&config.mail.from, &user.email, &reset_url);

        email::send_with_cooldown(
            &mut conn,
            mailer.as_ref(),
            user.id,
            EmailAction::ResetPassword,
            mail,
        )
        .await?;
    } else {
        tracing::debug!("Password reset requested for unknown email");
    }

    Ok(Json(MessageResponse::new(FORGOT_PASSWORD_MESSAGE)))
}

#[utoipa::path(
    post,
    path = "/auth/reset-password",
    tag = "auth",
    request_body(content = ResetPasswordRequest, example = json!({"token": "…", "newPassword": "new-password"})),
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Invalid or expired token", body = ErrorResponse)
    )
)]
pub async fn reset_password(
    State(pool): State<Arc<DbPool>>,
    Json(req): Json<ResetPasswordRequest>,
) -> ApiResult<impl IntoResponse> {
    if req.new_password.is_empty() {
        return Err(ApiError::bad_request("newPassword must not be empty"));
    }
    let password_hash = hash_password(&req.new_password)?;

    let mut conn = pool.get()?;
    let user_id = conn.transaction(|conn| {
        let Some(user_id) = consume_email_token(conn, &req.token, TokenPurpose::ResetPassword)?
        else {
            return Ok(None);
        };
        diesel::update(users::table.find(user_id))
            .set(users::password_hash.eq(&password_hash))
            .execute(conn)?;
        revoke_sessions(conn, user_id)?;
        Ok::<_, diesel::result::Error>(Some(user_id))
    })?;

    let user_id = user_id.ok_or_else(|| ApiError::bad_request("Invalid or expired token"))?;
    tracing::info!(user_id = %user_id, "Password reset");

    Ok(Json(MessageResponse::new("Password updated successfully")))
}
