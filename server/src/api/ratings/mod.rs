//! Per-user cocktail ratings on a 0 to 5 scale.

pub mod create;
pub mod item;
pub mod list;

use crate::email_matches;
use crate::error::{ApiError, ApiResult};
use crate::models::{Rating, User};
use crate::schema::{ratings, users};
use crate::AppState;
use axum::routing::get;
use axum::Router;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 5.0;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cocktails/ratings/me", get(list::my_ratings))
        .route(
            "/cocktails/{id}/ratings",
            get(list::list_ratings).post(create::create_rating),
        )
        .route(
            "/cocktails/{id}/ratings/{user_email}",
            get(item::get_rating)
                .patch(item::update_rating)
                .delete(item::delete_rating),
        )
}

/// A rating as returned to clients, identified by the rater's email.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingResponse {
    pub user_email: String,
    pub cocktail_id: i32,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RatingResponse {
    pub fn new(rating: Rating, user_email: String) -> Self {
        Self {
            user_email,
            cocktail_id: rating.cocktail_id,
            rating: rating.rating,
            created_at: rating.created_at,
            updated_at: rating.updated_at,
        }
    }
}

/// Out-of-range values are clamped rather than rejected.
pub fn clamp_rating(value: f64) -> ApiResult<f64> {
    if !value.is_finite() {
        return Err(ApiError::bad_request("rating must be a finite number"));
    }
    Ok(value.clamp(MIN_RATING, MAX_RATING))
}

/// Owners may change their own rating; moderators and admins may change any.
pub fn can_modify(caller: &User, owner_id: uuid::Uuid) -> bool {
    caller.id == owner_id || caller.role().is_staff()
}

fn rating_not_found(cocktail_id: i32, user_email: &str) -> ApiError {
    ApiError::not_found(format!(
        "Rating for cocktail with id {} by user {} not found",
        cocktail_id, user_email
    ))
}

/// The rating a user (by email, case-insensitive) gave a cocktail.
pub fn find_rating(
    conn: &mut PgConnection,
    cocktail_id: i32,
    user_email: &str,
) -> ApiResult<(Rating, String)> {
    ratings::table
        .inner_join(users::table)
        .filter(ratings::cocktail_id.eq(cocktail_id))
        .filter(email_matches!(user_email))
        .select((Rating::as_select(), users::email))
        .first(conn)
        .optional()?
        .ok_or_else(|| rating_not_found(cocktail_id, user_email))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_rating,
        list::list_ratings,
        list::my_ratings,
        item::get_rating,
        item::update_rating,
        item::delete_rating,
    ),
    components(schemas(
        RatingResponse,
        create::RatingRequest,
        item::UpdateRatingRequest,
        list::CocktailRating,
        list::UserRating,
    ))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use axum::http::StatusCode;

    fn user(role: Role) -> User {
        User {
            id: uuid::Uuid::new_v4(),
            email: "someone@example.com".to_string(),
            password_hash: String::new(),
            name: "someone".to_string(),
            about_me: String::new(),
            role: role.as_str().to_string(),
            is_enabled: true,
            is_verified: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_clamp_rating() {
        assert_eq!(clamp_rating(3.5).unwrap(), 3.5);
        assert_eq!(clamp_rating(7.0).unwrap(), MAX_RATING);
        assert_eq!(clamp_rating(-2.0).unwrap(), MIN_RATING);
        assert_eq!(clamp_rating(0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_non_finite_rating_rejected() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(
                clamp_rating(value).unwrap_err().status(),
                StatusCode::BAD_REQUEST
            );
        }
    }

    #[test]
    fn test_only_owner_or_staff_can_modify() {
        let owner = user(Role::User);
        let other = user(Role::User);
        let moderator = user(Role::Moderator);
        let admin = user(Role::Admin);

        assert!(can_modify(&owner, owner.id));
        assert!(!can_modify(&other, owner.id));
        assert!(can_modify(&moderator, owner.id));
        assert!(can_modify(&admin, owner.id));
    }

    #[test]
    fn test_response_shape() {
        let now = Utc::now();
        let response = RatingResponse::new(
            Rating {
                user_id: uuid::Uuid::new_v4(),
                cocktail_id: 4,
                rating: 4.5,
                created_at: now,
                updated_at: now,
            },
            "rater@example.com".to_string(),
        );
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["userEmail"], "rater@example.com");
        assert_eq!(json["cocktailId"], 4);
        assert_eq!(json["rating"], 4.5);
        assert!(json.get("userId").is_none());
    }
}
