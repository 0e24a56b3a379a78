use super::{can_modify, clamp_rating, find_rating, RatingResponse};
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::{ApiError, ApiResult};
use crate::models::{Rating, User};
use crate::schema::ratings;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateRatingRequest {
    /// Clamped to 0..=5
    pub rating: Option<f64>,
}

impl UpdateRatingRequest {
    /// A PATCH without `rating` has nothing to change and is rejected.
    fn value(&self) -> ApiResult<f64> {
        self.rating
            .ok_or_else(|| ApiError::bad_request("rating is required"))
            .and_then(clamp_rating)
    }
}

fn ensure_can_modify(caller: &User, rating: &Rating) -> ApiResult<()> {
    if can_modify(caller, rating.user_id) {
        Ok(())
    } else {
        Err(ApiError::forbidden("You are not allowed to modify this rating"))
    }
}

#[utoipa::path(
    get,
    path = "/cocktails/{id}/ratings/{user_email}",
    tag = "ratings",
    params(
        ("id" = i32, Path, description = "Cocktail ID"),
        ("user_email" = String, Path, description = "Email of the rater")
    ),
    responses(
        (status = 200, description = "Rating", body = RatingResponse),
        (status = 404, description = "Rating not found", body = ErrorResponse)
    )
)]
pub async fn get_rating(
    State(pool): State<Arc<DbPool>>,
    Path((cocktail_id, user_email)): Path<(i32, String)>,
) -> ApiResult<impl IntoResponse> {
    let mut conn = pool.get()?;
    let (rating, email) = find_rating(&mut conn, cocktail_id, &user_email)?;
    Ok(Json(RatingResponse::new(rating, email)))
}

#[utoipa::path(
    patch,
    path = "/cocktails/{id}/ratings/{user_email}",
    tag = "ratings",
    params(
        ("id" = i32, Path, description = "Cocktail ID"),
        ("user_email" = String, Path, description = "Email of the rater")
    ),
    request_body(content = UpdateRatingRequest, example = json!({"rating": 3})),
    responses(
        (status = 200, description = "Updated rating", body = RatingResponse),
        (status = 400, description = "Invalid rating", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the owner or staff", body = ErrorResponse),
        (status = 404, description = "Rating not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_rating(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path((cocktail_id, user_email)): Path<(i32, String)>,
    Json(req): Json<UpdateRatingRequest>,
) -> ApiResult<impl IntoResponse> {
    let mut conn = pool.get()?;
    let (existing, email) = find_rating(&mut conn, cocktail_id, &user_email)?;
    ensure_can_modify(&user, &existing)?;

    let value = req.value()?;

    let updated: Rating =
        diesel::update(ratings::table.find((existing.user_id, cocktail_id)))
            .set(ratings::rating.eq(value))
            .returning(Rating::as_returning())
            .get_result(&mut conn)?;

    tracing::info!(cocktail_id, rater = %existing.user_id, by = %user.id, "Updated rating");
    Ok(Json(RatingResponse::new(updated, email)))
}

#[utoipa::path(
    delete,
    path = "/cocktails/{id}/ratings/{user_email}",
    tag = "ratings",
    params(
        ("id" = i32, Path, description = "Cocktail ID"),
        ("user_email" = String, Path, description = "Email of the rater")
    ),
    responses(
        (status = 200, description = "Deleted rating", body = RatingResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the owner or staff", body = ErrorResponse),
        (status = 404, description = "Rating not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_rating(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path((cocktail_id, user_email)): Path<(i32, String)>,
) -> ApiResult<impl IntoResponse> {
    let mut conn = pool.get()?;
    let (existing, email) = find_rating(&mut conn, cocktail_id, &user_email)?;
    ensure_can_modify(&user, &existing)?;

    let deleted: Rating = diesel::delete(ratings::table.find((existing.user_id, cocktail_id)))
        .returning(Rating::as_returning())
        .get_result(&mut conn)?;

    tracing::info!(cocktail_id, rater = %existing.user_id, by = %user.id, "Deleted rating");
    Ok(Json(RatingResponse::new(deleted, email)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use axum::http::StatusCode;
    use chrono::Utc;

    fn user(role: Role) -> User {
        User {
            id: uuid::Uuid::new_v4(),
            email: "rater@example.com".to_string(),
            password_hash: String::new(),
            name: "rater".to_string(),
            about_me: String::new(),
            role: role.as_str().to_string(),
            is_enabled: true,
            is_verified: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn rating_by(user_id: uuid::Uuid) -> Rating {
        Rating {
            user_id,
            cocktail_id: 1,
            rating: 4.0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_plain_user_cannot_modify_others_rating() {
        let owner = user(Role::User);
        let intruder = user(Role::User);
        let err = ensure_can_modify(&intruder, &rating_by(owner.id)).unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert!(ensure_can_modify(&owner, &rating_by(owner.id)).is_ok());
    }

    #[test]
    fn test_update_without_rating_is_bad_request() {
        let req: UpdateRatingRequest = serde_json::from_str("{}").unwrap();
        let err = req.value().unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "rating is required");
    }

    #[test]
    fn test_update_value_is_clamped() {
        let req: UpdateRatingRequest = serde_json::from_str(r#"{"rating": 9}"#).unwrap();
        assert_eq!(req.value().unwrap(), 5.0);
    }
}
