use crate::api::ErrorResponse;
use crate::auth::{AuthUser, Role};
use axum::{response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MeResponse {
    pub email: String,
    pub role: Role,
    pub name: String,
    pub about_me: String,
}

#[utoipa::path(
    get,
    path = "/user/me",
    tag = "user",
    responses(
        (status = 200, description = "Profile of the current user", body = MeResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn me(auth: AuthUser) -> impl IntoResponse {
    let role = auth.role();
    let user = auth.0;
    Json(MeResponse {
        email: user.email,
        role,
        name: user.name,
        about_me: user.about_me,
    })
}
