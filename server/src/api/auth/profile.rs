use crate::api::ErrorResponse;
use crate::auth::{AuthUser, Role};
use axum::{response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub email: String,
    pub role: Role,
}

#[utoipa::path(
    get,
    path = "/auth/profile",
    tag = "auth",
    responses(
        (status = 200, description = "Current user", body = ProfileResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn profile(auth: AuthUser) -> impl IntoResponse {
    Json(ProfileResponse {
        role: auth.role(),
        email: auth.0.email,
    })
}
