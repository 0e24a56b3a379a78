use super::{clamp_rating, RatingResponse};
use crate::api::cocktails::find_cocktail;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::{conflict_on_unique, ApiResult};
use crate::models::{NewRating, Rating};
use crate::schema::ratings;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RatingRequest {
    /// Clamped to 0..=5
    pub rating: f64,
}

#[utoipa::path(
    post,
    path = "/cocktails/{id}/ratings",
    tag = "ratings",
    params(
        ("id" = i32, Path, description = "Cocktail ID")
    ),
    request_body(content = RatingRequest, example = json!({"rating": 4.5})),
    responses(
        (status = 201, description = "Rating created", body = RatingResponse),
        (status = 400, description = "Invalid rating", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Cocktail not found", body = ErrorResponse),
        (status = 409, description = "Cocktail already rated by this user", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_rating(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(cocktail_id): Path<i32>,
    Json(req): Json<RatingRequest>,
) -> ApiResult<impl IntoResponse> {
    let value = clamp_rating(req.rating)?;

    let mut conn = pool.get()?;
    find_cocktail(&mut conn, cocktail_id)?;

    let rating: Rating = diesel::insert_into(ratings::table)
        .values(&NewRating {
            user_id: user.id,
            cocktail_id,
            rating: value,
        })
        .returning(Rating::as_returning())
        .get_result(&mut conn)
        .map_err(conflict_on_unique(format!(
            "Rating for cocktail with id {} by user {} already exists",
            cocktail_id, user.email
        )))?;

    Ok((StatusCode::CREATED, Json(RatingResponse::new(rating, user.email))))
}
