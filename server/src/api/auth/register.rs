use crate::api::{check_max_chars, ErrorResponse, MessageResponse};
use crate::auth::{hash_password, issue_email_token, Role, TokenPurpose};
use crate::config::Config;
use crate::db::DbPool;
use crate::email::{self, EmailAction, Mailer};
use crate::error::{conflict_on_unique, ApiError, ApiResult};
use crate::models::{NewUser, User};
use crate::schema::users;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

pub const MAX_EMAIL_LEN: usize = 80;
pub const MAX_NAME_LEN: usize = 15;
pub const MAX_ABOUT_ME_LEN: usize = 30;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub about_me: Option<String>,
}

/// Minimal shape check: one `@`, non-empty local part, dotted domain, no spaces.
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > MAX_EMAIL_LEN || email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

pub fn check_profile_lengths(name: Option<&str>, about_me: Option<&str>) -> Result<(), ApiError> {
    if let Some(name) = name {
        check_max_chars("name", name, MAX_NAME_LEN)?;
    }
    if let Some(about_me) = about_me {
        check_max_chars("about_me", about_me, MAX_ABOUT_ME_LEN)?;
    }
    Ok(())
}

fn validate(req: &RegisterRequest) -> Result<(), ApiError> {
    if !is_valid_email(req.email.trim()) {
        return Err(ApiError::bad_request("email must be a valid email address"));
    }
    if req.password.is_empty() {
        return Err(ApiError::bad_request("password must not be empty"));
    }
    check_profile_lengths(req.name.as_deref(), req.about_me.as_deref())
}

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body(content = RegisterRequest, example = json!({"email": "guest@example.com", "password": "password"})),
    responses(
        (status = 201, description = "Account created, verification email sent", body = MessageResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
pub async fn register(
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    State(mailer): State<Arc<dyn Mailer>>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    validate(&req)?;

    let email = req.email.trim();
    let password_hash = hash_password(&req.password)?;
    let mut conn = pool.get()?;

    let user: User = diesel::insert_into(users::table)
        .values(&NewUser {
            email,
            password_hash: &password_hash,
            name: req.name.as_deref().unwrap_or(""),
            about_me: req.about_me.as_deref().unwrap_or(""),
            role: Role::User.as_str(),
            is_verified: false,
        })
        .returning(User::as_returning())
        .get_result(&mut conn)
        .map_err(conflict_on_unique("User with this email already exists"))?;

    tracing::info!(user_id = %user.id, "Registered new user");

    let token = issue_email_token(&mut conn, user.id, TokenPurpose::VerifyEmail)?;
    let verify_url = format!("{}/auth/verify-email?token={}", config.frontend_url, token);
    let mail = email::verify_email_mail(&config.mail.from, &user.email, &verify_url);

    // Registration stands even when the mail cannot be delivered
    if let Err(e) =
        email::send_with_cooldown(&mut conn, mailer.as_ref(), user.id, EmailAction::VerifyEmail, mail)
            .await
    {
        tracing::error!(user_id = %user.id, error = %e, "Failed to send verification email");
    }

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(
            "The verification email has been sent to the provided email. Please check your mailbox",
        )),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            name: None,
            about_me: None,
        }
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("guest@example.com"));
        assert!(is_valid_email("first.last+bar@mail.example.org"));
        assert!(!is_valid_email("guest"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("guest@localhost"));
        assert!(!is_valid_email("guest@@example.com"));
        assert!(!is_valid_email("gu est@example.com"));
        assert!(!is_valid_email(&format!("{}@example.com", "a".repeat(80))));
    }

    #[test]
    fn test_validate_register_request() {
        assert!(validate(&request("guest@example.com", "secret")).is_ok());
        assert!(validate(&request("not-an-email", "secret")).is_err());
        assert!(validate(&request("guest@example.com", "")).is_err());

        let mut req = request("guest@example.com", "secret");
        req.name = Some("a name that is far too long".to_string());
        assert!(validate(&req).is_err());
    }

    #[test]
    fn test_profile_lengths_count_characters() {
        // 15 multi-byte characters are fine
        assert!(check_profile_lengths(Some("ąćęłńóśźżąćęłńó"), None).is_ok());
        assert!(check_profile_lengths(None, Some(&"x".repeat(31))).is_err());
    }
}
