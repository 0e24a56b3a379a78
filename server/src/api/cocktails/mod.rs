pub mod create;
pub mod delete;
pub mod form;
pub mod get;
pub mod list;
pub mod update;
pub mod view;

use crate::error::{ApiError, ApiResult};
use crate::models::Cocktail;
use crate::schema::{cocktail_categories, cocktails};
use crate::AppState;
use axum::routing::get;
use axum::Router;
use diesel::prelude::*;
use utoipa::OpenApi;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/cocktails",
            get(list::list_cocktails).post(create::create_cocktail),
        )
        .route(
            "/cocktails/{id}",
            get(get::get_cocktail)
                .patch(update::update_cocktail)
                .delete(delete::delete_cocktail),
        )
}

pub fn find_cocktail(conn: &mut PgConnection, id: i32) -> ApiResult<Cocktail> {
    cocktails::table
        .find(id)
        .select(Cocktail::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| ApiError::not_found(format!("Cocktail with id {} not found", id)))
}

pub fn ensure_category_exists(conn: &mut PgConnection, name: &str) -> ApiResult<()> {
    let exists: bool =
        diesel::select(diesel::dsl::exists(cocktail_categories::table.find(name)))
            .get_result(conn)?;
    if exists {
        Ok(())
    } else {
        Err(ApiError::not_found(format!(
            "Cocktail category with name {} not found",
            name
        )))
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_cocktail,
        list::list_cocktails,
        get::get_cocktail,
        update::update_cocktail,
        delete::delete_cocktail,
    ),
    components(schemas(
        Cocktail,
        form::CocktailFormDoc,
        list::CocktailSort,
        view::CocktailWithIngredients,
        view::CocktailDetail,
        view::CocktailIngredientEntry,
        view::IngredientSummary,
    ))
)]
pub struct ApiDoc;
