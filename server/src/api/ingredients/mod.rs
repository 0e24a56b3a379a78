pub mod create;
pub mod delete;
pub mod form;
pub mod get;
pub mod list;
pub mod update;

use crate::error::{ApiError, ApiResult};
use crate::models::Ingredient;
use crate::schema::{ingredient_types, ingredients};
use crate::AppState;
use axum::routing::get;
use axum::Router;
use diesel::prelude::*;
use utoipa::OpenApi;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/ingredients",
            get(list::list_ingredients).post(create::create_ingredient),
        )
        .route(
            "/ingredients/{id}",
            get(get::get_ingredient)
                .patch(update::update_ingredient)
                .delete(delete::delete_ingredient),
        )
}

pub fn find_ingredient(conn: &mut PgConnection, id: i32) -> ApiResult<Ingredient> {
    ingredients::table
        .find(id)
        .select(Ingredient::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| ApiError::not_found(format!("Ingredient with id {} not found", id)))
}

pub fn ensure_type_exists(conn: &mut PgConnection, name: &str) -> ApiResult<()> {
    let exists: bool = diesel::select(diesel::dsl::exists(ingredient_types::table.find(name)))
        .get_result(conn)?;
    if exists {
        Ok(())
    } else {
        Err(ApiError::not_found(format!(
            "Ingredient type with name {} not found",
            name
        )))
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_ingredient,
        list::list_ingredients,
        get::get_ingredient,
        update::update_ingredient,
        delete::delete_ingredient,
    ),
    components(schemas(
        Ingredient,
        form::IngredientFormDoc,
        list::IngredientSort,
        crate::query::SortOrder,
    ))
)]
pub struct ApiDoc;
