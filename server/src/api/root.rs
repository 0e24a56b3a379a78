use crate::AppState;
use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApiInfoResponse {
    pub title: String,
    pub authors: Vec<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(info))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "app",
    responses(
        (status = 418, description = "API name and authors", body = ApiInfoResponse)
    )
)]
pub async fn info() -> impl IntoResponse {
    (
        StatusCode::IM_A_TEAPOT,
        Json(ApiInfoResponse {
            title: "Cocktail API".to_string(),
            authors: vec!["Cocktail API contributors".to_string()],
        }),
    )
}

#[derive(OpenApi)]
#[openapi(paths(info), components(schemas(ApiInfoResponse)))]
pub struct ApiDoc;
