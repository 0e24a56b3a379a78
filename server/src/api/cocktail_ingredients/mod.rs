//! Ingredients linked to a cocktail, with amount and note.

pub mod create;
pub mod item;
pub mod list;

use crate::error::{ApiError, ApiResult};
use crate::models::CocktailIngredient;
use crate::schema::cocktail_ingredients;
use crate::AppState;
use axum::routing::get;
use axum::Router;
use diesel::prelude::*;
use utoipa::OpenApi;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/cocktails/{id}/ingredients",
            get(list::list_cocktail_ingredients).post(create::add_cocktail_ingredient),
        )
        .route(
            "/cocktails/{id}/ingredients/{ingredient_id}",
            get(item::get_cocktail_ingredient)
                .patch(item::update_cocktail_ingredient)
                .delete(item::delete_cocktail_ingredient),
        )
}

fn link_not_found(cocktail_id: i32, ingredient_id: i32) -> ApiError {
    ApiError::not_found(format!(
        "Ingredient with id {} not found in cocktail with id {}",
        ingredient_id, cocktail_id
    ))
}

pub fn find_link(
    conn: &mut PgConnection,
    cocktail_id: i32,
    ingredient_id: i32,
) -> ApiResult<CocktailIngredient> {
    cocktail_ingredients::table
        .find((cocktail_id, ingredient_id))
        .select(CocktailIngredient::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| link_not_found(cocktail_id, ingredient_id))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::add_cocktail_ingredient,
        list::list_cocktail_ingredients,
        item::get_cocktail_ingredient,
        item::update_cocktail_ingredient,
        item::delete_cocktail_ingredient,
    ),
    components(schemas(
        CocktailIngredient,
        create::AddCocktailIngredientRequest,
        item::UpdateCocktailIngredientRequest,
    ))
)]
pub struct ApiDoc;
