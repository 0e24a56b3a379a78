use super::find_link;
use crate::api::{check_max_chars, ErrorResponse, MAX_KEY_LEN};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::{ApiError, ApiResult};
use crate::models::CocktailIngredient;
use crate::schema::cocktail_ingredients;
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

#[derive(Debug, Clone, Default, Deserialize, ToSchema, AsChangeset)]
#[diesel(table_name = cocktail_ingredients)]
pub struct UpdateCocktailIngredientRequest {
    pub amount: Option<String>,
    pub note: Option<String>,
}

impl UpdateCocktailIngredientRequest {
    fn validate(&self) -> ApiResult<()> {
        if let Some(amount) = &self.amount {
            let amount = amount.trim();
            if amount.is_empty() {
                return Err(ApiError::bad_request("amount must not be empty"));
            }
            check_max_chars("amount", amount, MAX_KEY_LEN)?;
        }
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.amount.is_none() && self.note.is_none()
    }
}

#[utoipa::path(
    get,
    path = "/cocktails/{id}/ingredients/{ingredient_id}",
    tag = "cocktail-ingredients",
    params(
        ("id" = i32, Path, description = "Cocktail ID"),
        ("ingredient_id" = i32, Path, description = "Ingredient ID")
    ),
    responses(
        (status = 200, description = "Link record", body = CocktailIngredient),
        (status = 404, description = "Ingredient not in cocktail", body = ErrorResponse)
    )
)]
pub async fn get_cocktail_ingredient(
    State(pool): State<Arc<DbPool>>,
    Path((cocktail_id, ingredient_id)): Path<(i32, i32)>,
) -> ApiResult<impl IntoResponse> {
    let mut conn = pool.get()?;
    Ok(Json(find_link(&mut conn, cocktail_id, ingredient_id)?))
}

#[utoipa::path(
    patch,
    path = "/cocktails/{id}/ingredients/{ingredient_id}",
    tag = "cocktail-ingredients",
    params(
        ("id" = i32, Path, description = "Cocktail ID"),
        ("ingredient_id" = i32, Path, description = "Ingredient ID")
    ),
    request_body(content = UpdateCocktailIngredientRequest, example = json!({"amount": "60ml"})),
    responses(
        (status = 200, description = "Updated link", body = CocktailIngredient),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Ingredient not in cocktail", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_cocktail_ingredient(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path((cocktail_id, ingredient_id)): Path<(i32, i32)>,
    Json(mut req): Json<UpdateCocktailIngredientRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;
    req.amount = req.amount.map(|a| a.trim().to_string());

    let mut conn = pool.get()?;
    let existing = find_link(&mut conn, cocktail_id, ingredient_id)?;
    if req.is_empty() {
        return Ok(Json(existing));
    }

    let updated: CocktailIngredient =
        diesel::update(cocktail_ingredients::table.find((cocktail_id, ingredient_id)))
            .set(&req)
            .returning(CocktailIngredient::as_returning())
            .get_result(&mut conn)?;

    tracing::info!(cocktail_id, ingredient_id, by = %user.id, "Updated cocktail ingredient");
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/cocktails/{id}/ingredients/{ingredient_id}",
    tag = "cocktail-ingredients",
    params(
        ("id" = i32, Path, description = "Cocktail ID"),
        ("ingredient_id" = i32, Path, description = "Ingredient ID")
    ),
    responses(
        (status = 204, description = "Ingredient removed from cocktail"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Ingredient not in cocktail", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_cocktail_ingredient(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path((cocktail_id, ingredient_id)): Path<(i32, i32)>,
) -> ApiResult<impl IntoResponse> {
    let mut conn = pool.get()?;
    let deleted =
        diesel::delete(cocktail_ingredients::table.find((cocktail_id, ingredient_id)))
            .execute(&mut conn)?;
    if deleted == 0 {
        return Err(super::link_not_found(cocktail_id, ingredient_id));
    }

    tracing::info!(cocktail_id, ingredient_id, by = %user.id, "Removed ingredient from cocktail");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_update_detected() {
        let req: UpdateCocktailIngredientRequest = serde_json::from_str("{}").unwrap();
        assert!(req.is_empty());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_blank_amount_rejected() {
        let req: UpdateCocktailIngredientRequest =
            serde_json::from_str(r#"{"amount": " "}"#).unwrap();
        assert_eq!(req.validate().unwrap_err().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_overlong_amount_rejected() {
        let req = UpdateCocktailIngredientRequest {
            amount: Some("1".repeat(70)),
            note: None,
        };
        assert_eq!(
            req.validate().unwrap_err().to_string(),
            "amount must be at most 64 characters"
        );
    }
}
