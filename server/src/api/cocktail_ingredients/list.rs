use crate::api::cocktails::find_cocktail;
use crate::api::cocktails::view::{CocktailIngredientEntry, IngredientSummary};
use crate::api::ingredients::list::IngredientSort;
use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::error::ApiResult;
use crate::query::{contains_pattern, SortOrder};
use crate::raw_sql::percentage_order;
use crate::schema::{cocktail_ingredients, ingredients};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListCocktailIngredientsParams {
    /// Case-insensitive substring of the ingredient name
    pub filter: Option<String>,
    /// Only alcoholic (`true`) or non-alcoholic (`false`) ingredients
    pub alcoholic: Option<bool>,
    /// Ingredient field to sort by (default: order added)
    pub sort: Option<IngredientSort>,
    /// Sort direction (default: asc)
    #[serde(default)]
    pub order: SortOrder,
}

#[utoipa::path(
    get,
    path = "/cocktails/{id}/ingredients",
    tag = "cocktail-ingredients",
    params(
        ("id" = i32, Path, description = "Cocktail ID"),
        ListCocktailIngredientsParams
    ),
    responses(
        (status = 200, description = "Ingredients of the cocktail", body = Vec<CocktailIngredientEntry>),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 404, description = "Cocktail not found", body = ErrorResponse)
    )
)]
pub async fn list_cocktail_ingredients(
    State(pool): State<Arc<DbPool>>,
    Path(cocktail_id): Path<i32>,
    Query(params): Query<ListCocktailIngredientsParams>,
) -> ApiResult<impl IntoResponse> {
    let mut conn = pool.get()?;
    find_cocktail(&mut conn, cocktail_id)?;

    let mut query = cocktail_ingredients::table
        .inner_join(ingredients::table)
        .filter(cocktail_ingredients::cocktail_id.eq(cocktail_id))
        .into_boxed();

    if let Some(pattern) = params.filter.as_deref().and_then(contains_pattern) {
        query = query.filter(ingredients::name.ilike(pattern));
    }
    if let Some(alcoholic) = params.alcoholic {
        query = query.filter(ingredients::alcoholic.eq(alcoholic));
    }

    let query = match (params.sort, params.order) {
        (None, _) => query.order(cocktail_ingredients::created_at.asc()),
        (Some(IngredientSort::Name), SortOrder::Asc) => query.order(ingredients::name.asc()),
        (Some(IngredientSort::Name), SortOrder::Desc) => query.order(ingredients::name.desc()),
        (Some(IngredientSort::Alcoholic), SortOrder::Asc) => {
            query.order(ingredients::alcoholic.asc())
        }
        (Some(IngredientSort::Alcoholic), SortOrder::Desc) => {
            query.order(ingredients::alcoholic.desc())
        }
        (Some(IngredientSort::TypeName), SortOrder::Asc) => {
            query.order(ingredients::type_name.asc())
        }
        (Some(IngredientSort::TypeName), SortOrder::Desc) => {
            query.order(ingredients::type_name.desc())
        }
        (Some(IngredientSort::Percentage), order) => {
            query.order(percentage_order(order.is_desc()))
        }
        (Some(IngredientSort::CreatedAt), SortOrder::Asc) => {
            query.order(ingredients::created_at.asc())
        }
        (Some(IngredientSort::CreatedAt), SortOrder::Desc) => {
            query.order(ingredients::created_at.desc())
        }
        (Some(IngredientSort::UpdatedAt), SortOrder::Asc) => {
            query.order(ingredients::updated_at.asc())
        }
        (Some(IngredientSort::UpdatedAt), SortOrder::Desc) => {
            query.order(ingredients::updated_at.desc())
        }
    };

    let rows: Vec<(String, Option<String>, IngredientSummary)> = query
        .then_order_by(cocktail_ingredients::ingredient_id.asc())
        .select((
            cocktail_ingredients::amount,
            cocktail_ingredients::note,
            IngredientSummary::as_select(),
        ))
        .load(&mut conn)?;

    let entries: Vec<CocktailIngredientEntry> = rows
        .into_iter()
        .map(|(amount, note, ingredient)| CocktailIngredientEntry {
            amount,
            note,
            ingredient,
        })
        .collect();

    Ok(Json(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Uri;

    fn parse(query: &str) -> Result<ListCocktailIngredientsParams, String> {
        let uri: Uri = format!("/cocktails/1/ingredients?{}", query).parse().unwrap();
        Query::<ListCocktailIngredientsParams>::try_from_uri(&uri)
            .map(|Query(p)| p)
            .map_err(|e| e.body_text())
    }

    #[test]
    fn test_parses_filter_and_ingredient_sort() {
        let params = parse("filter=vod&alcoholic=true&sort=percentage&order=desc").unwrap();
        assert_eq!(params.filter.as_deref(), Some("vod"));
        assert_eq!(params.alcoholic, Some(true));
        assert_eq!(params.sort, Some(IngredientSort::Percentage));
        assert!(params.order.is_desc());
    }

    #[test]
    fn test_rejects_cocktail_sort_keys() {
        assert!(parse("sort=glass").is_err());
        assert!(parse("sort=amount").is_err());
    }
}
