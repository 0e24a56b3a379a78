use crate::api::cocktails::find_cocktail;
use crate::api::ingredients::find_ingredient;
use crate::api::{check_max_chars, ErrorResponse, MAX_KEY_LEN};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::{conflict_on_unique, ApiError, ApiResult};
use crate::models::{CocktailIngredient, NewCocktailIngredient};
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

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddCocktailIngredientRequest {
    pub ingredient_id: i32,
    /// Free text, e.g. "50ml" or "2 dashes"
    pub amount: String,
    pub note: Option<String>,
}

impl AddCocktailIngredientRequest {
    fn amount(&self) -> ApiResult<&str> {
        let amount = self.amount.trim();
        if amount.is_empty() {
            return Err(ApiError::bad_request("amount must not be empty"));
        }
        check_max_chars("amount", amount, MAX_KEY_LEN)?;
        Ok(amount)
    }
}

#[utoipa::path(
    post,
    path = "/cocktails/{id}/ingredients",
    tag = "cocktail-ingredients",
    params(
        ("id" = i32, Path, description = "Cocktail ID")
    ),
    request_body(content = AddCocktailIngredientRequest, example = json!({"ingredientId": 1, "amount": "50ml", "note": "white rum"})),
    responses(
        (status = 201, description = "Ingredient added to cocktail", body = CocktailIngredient),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Cocktail or ingredient not found", body = ErrorResponse),
        (status = 409, description = "Ingredient already in cocktail", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn add_cocktail_ingredient(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(cocktail_id): Path<i32>,
    Json(req): Json<AddCocktailIngredientRequest>,
) -> ApiResult<impl IntoResponse> {
    let amount = req.amount()?;

    let mut conn = pool.get()?;
    find_cocktail(&mut conn, cocktail_id)?;
    find_ingredient(&mut conn, req.ingredient_id)?;

    let link: CocktailIngredient = diesel::insert_into(cocktail_ingredients::table)
        .values(&NewCocktailIngredient {
            cocktail_id,
            ingredient_id: req.ingredient_id,
            amount,
            note: req.note.as_deref(),
        })
        .returning(CocktailIngredient::as_returning())
        .get_result(&mut conn)
        .map_err(conflict_on_unique(format!(
            "Ingredient with id {} is already in cocktail with id {}",
            req.ingredient_id, cocktail_id
        )))?;

    tracing::info!(cocktail_id, ingredient_id = req.ingredient_id, by = %user.id, "Added ingredient to cocktail");
    Ok((StatusCode::CREATED, Json(link)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_is_camel_case() {
        let req: AddCocktailIngredientRequest =
            serde_json::from_str(r#"{"ingredientId": 3, "amount": " 50ml "}"#).unwrap();
        assert_eq!(req.ingredient_id, 3);
        assert_eq!(req.amount().unwrap(), "50ml");
        assert!(req.note.is_none());
    }

    #[test]
    fn test_blank_amount_rejected() {
        let req: AddCocktailIngredientRequest =
            serde_json::from_str(r#"{"ingredientId": 3, "amount": "  "}"#).unwrap();
        assert_eq!(req.amount().unwrap_err().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_amount_longer_than_column_rejected() {
        let req = AddCocktailIngredientRequest {
            ingredient_id: 3,
            amount: "2".repeat(70),
            note: None,
        };
        let err = req.amount().unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "amount must be at most 64 characters");
    }
}
