use super::find_cocktail;
use super::view::{load_entries, CocktailDetail};
use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::error::ApiResult;
use crate::models::CocktailCategory;
use crate::schema::cocktail_categories;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/cocktails/{id}",
    tag = "cocktails",
    params(
        ("id" = i32, Path, description = "Cocktail ID")
    ),
    responses(
        (status = 200, description = "Cocktail with category and ingredients", body = CocktailDetail),
        (status = 404, description = "Cocktail not found", body = ErrorResponse)
    )
)]
pub async fn get_cocktail(
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    let mut conn = pool.get()?;
    let cocktail = find_cocktail(&mut conn, id)?;

    let category: Option<CocktailCategory> = match cocktail.category_name.as_deref() {
        Some(name) => cocktail_categories::table
            .find(name)
            .select(CocktailCategory::as_select())
            .first(&mut conn)
            .optional()?,
        None => None,
    };

    let ingredients = load_entries(&mut conn, &[id])?
        .remove(&id)
        .unwrap_or_default();

    Ok(Json(CocktailDetail {
        cocktail,
        category,
        ingredients,
    }))
}
