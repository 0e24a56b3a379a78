pub mod login;
pub mod logout;
pub mod password;
pub mod profile;
pub mod register;
pub mod verify_email;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register::register))
        .route("/auth/login", post(login::login))
        .route("/auth/profile", get(profile::profile))
        .route("/auth/verify-email", get(verify_email::verify_email))
        .route("/auth/forgot-password", post(password::forgot_password))
        .route("/auth/reset-password", post(password::reset_password))
        .route("/auth/logout", post(logout::logout))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        register::register,
        login::login,
        profile::profile,
        verify_email::verify_email,
        password::forgot_password,
        password::reset_password,
        logout::logout,
    ),
    components(schemas(
        register::RegisterRequest,
        login::LoginRequest,
        login::LoginResponse,
        profile::ProfileResponse,
        password::ForgotPasswordRequest,
        password::ResetPasswordRequest,
    ))
)]
pub struct ApiDoc;
