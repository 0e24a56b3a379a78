use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiResult;
use crate::schema::{ratings, users};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

/// One user's rating of the requested cocktail
#[derive(Debug, Clone, Queryable, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRating {
    pub user_email: String,
    pub rating: f64,
}

/// The caller's rating of one cocktail
#[derive(Debug, Clone, Queryable, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CocktailRating {
    pub cocktail_id: i32,
    pub rating: f64,
}

#[utoipa::path(
    get,
    path = "/cocktails/{id}/ratings",
    tag = "ratings",
    params(
        ("id" = i32, Path, description = "Cocktail ID")
    ),
    responses(
        (status = 200, description = "All ratings of the cocktail", body = Vec<UserRating>)
    )
)]
pub async fn list_ratings(
    State(pool): State<Arc<DbPool>>,
    Path(cocktail_id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    let mut conn = pool.get()?;
    let results: Vec<UserRating> = ratings::table
        .inner_join(users::table)
        .filter(ratings::cocktail_id.eq(cocktail_id))
        .order(ratings::created_at.asc())
        .select((users::email, ratings::rating))
        .load(&mut conn)?;

    Ok(Json(results))
}

#[utoipa::path(
    get,
    path = "/cocktails/ratings/me",
    tag = "ratings",
    responses(
        (status = 200, description = "Ratings given by the caller", body = Vec<CocktailRating>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn my_ratings(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> ApiResult<impl IntoResponse> {
    let mut conn = pool.get()?;
    let results: Vec<CocktailRating> = ratings::table
        .filter(ratings::user_id.eq(user.id))
        .order(ratings::cocktail_id.asc())
        .select((ratings::cocktail_id, ratings::rating))
        .load(&mut conn)?;

    Ok(Json(results))
}
