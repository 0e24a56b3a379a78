pub mod me;
pub mod status;
pub mod update;

use crate::email_matches;
use crate::error::{ApiError, ApiResult};
use crate::models::User;
use crate::schema::users;
use crate::AppState;
use axum::routing::{get, patch, post};
use axum::Router;
use diesel::prelude::*;
use utoipa::OpenApi;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/user", patch(update::update_user))
        .route("/user/me", get(me::me))
        .route("/user/disable/{email}", post(status::disable_user))
        .route("/user/enable/{email}", post(status::enable_user))
}

/// Case-insensitive lookup by email, 404 when absent.
pub fn find_user_by_email(conn: &mut PgConnection, email: &str) -> ApiResult<User> {
    users::table
        .filter(email_matches!(email))
        .select(User::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| ApiError::not_found(format!("User with email {} not found", email)))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        update::update_user,
        me::me,
        status::disable_user,
        status::enable_user,
    ),
    components(schemas(
        update::UpdateUserRequest,
        update::UpdateUserResponse,
        me::MeResponse,
    ))
)]
pub struct ApiDoc;
