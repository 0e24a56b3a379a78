use super::view::{load_entries, with_ingredients, CocktailWithIngredients};
use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::error::ApiResult;
use crate::models::Cocktail;
use crate::query::{contains_pattern, split_csv_lower, SortOrder};
use crate::raw_sql::cocktail_has_alcohol;
use crate::schema::cocktails;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

/// Sort field for cocktail lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum CocktailSort {
    Name,
    Glass,
    CategoryName,
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListCocktailsParams {
    /// Case-insensitive substring of the name
    pub name: Option<String>,
    /// Keep cocktails with (`true`) or without (`false`) an alcoholic ingredient
    #[serde(rename = "hasAlcohol")]
    pub has_alcohol: Option<bool>,
    /// Comma-separated ingredient names; matches cocktails containing any of them
    pub ingredients: Option<String>,
    /// Sort field (default: newest first)
    pub sort: Option<CocktailSort>,
    /// Sort direction (default: asc)
    #[serde(default)]
    pub order: SortOrder,
}

#[utoipa::path(
    get,
    path = "/cocktails",
    tag = "cocktails",
    params(ListCocktailsParams),
    responses(
        (status = 200, description = "Matching cocktails with their ingredients", body = Vec<CocktailWithIngredients>),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse)
    )
)]
pub async fn list_cocktails(
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ListCocktailsParams>,
) -> ApiResult<impl IntoResponse> {
    let mut conn = pool.get()?;

    let mut query = cocktails::table.into_boxed();

    if let Some(pattern) = params.name.as_deref().and_then(contains_pattern) {
        query = query.filter(cocktails::name.ilike(pattern));
    }
    match params.has_alcohol {
        Some(true) => query = query.filter(cocktail_has_alcohol()),
        Some(false) => query = query.filter(diesel::dsl::not(cocktail_has_alcohol())),
        None => {}
    }
    if let Some(list) = params.ingredients.as_deref() {
        let names = split_csv_lower(list);
        if !names.is_empty() {
            query = query.filter(crate::cocktail_has_any_ingredient!(names));
        }
    }

    let query = match (params.sort, params.order) {
        (None, _) => query.order(cocktails::created_at.desc()),
        (Some(CocktailSort::Name), SortOrder::Asc) => query.order(cocktails::name.asc()),
        (Some(CocktailSort::Name), SortOrder::Desc) => query.order(cocktails::name.desc()),
        (Some(CocktailSort::Glass), SortOrder::Asc) => query.order(cocktails::glass.asc()),
        (Some(CocktailSort::Glass), SortOrder::Desc) => query.order(cocktails::glass.desc()),
        (Some(CocktailSort::CategoryName), SortOrder::Asc) => {
            query.order(cocktails::category_name.asc())
        }
        (Some(CocktailSort::CategoryName), SortOrder::Desc) => {
            query.order(cocktails::category_name.desc())
        }
        (Some(CocktailSort::CreatedAt), SortOrder::Asc) => {
            query.order(cocktails::created_at.asc())
        }
        (Some(CocktailSort::CreatedAt), SortOrder::Desc) => {
            query.order(cocktails::created_at.desc())
        }
        (Some(CocktailSort::UpdatedAt), SortOrder::Asc) => {
            query.order(cocktails::updated_at.asc())
        }
        (Some(CocktailSort::UpdatedAt), SortOrder::Desc) => {
            query.order(cocktails::updated_at.desc())
        }
    };

    let results: Vec<Cocktail> = query
        .then_order_by(cocktails::id.asc())
        .select(Cocktail::as_select())
        .load(&mut conn)?;

    let ids: Vec<i32> = results.iter().map(|c| c.id).collect();
    let entries = load_entries(&mut conn, &ids)?;

    Ok(Json(with_ingredients(results, entries)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Uri;

    fn parse(query: &str) -> Result<ListCocktailsParams, String> {
        let uri: Uri = format!("/cocktails?{}", query).parse().unwrap();
        Query::<ListCocktailsParams>::try_from_uri(&uri)
            .map(|Query(p)| p)
            .map_err(|e| e.body_text())
    }

    #[test]
    fn test_parses_filters() {
        let params =
            parse("name=jito&hasAlcohol=false&ingredients=Mint,Lime%20Juice&sort=glass").unwrap();
        assert_eq!(params.name.as_deref(), Some("jito"));
        assert_eq!(params.has_alcohol, Some(false));
        assert_eq!(
            split_csv_lower(params.ingredients.as_deref().unwrap()),
            vec!["mint", "lime juice"]
        );
        assert_eq!(params.sort, Some(CocktailSort::Glass));
        assert_eq!(params.order, SortOrder::Asc);
    }

    #[test]
    fn test_snake_case_filter_name_is_not_recognised() {
        let params = parse("has_alcohol=true").unwrap();
        assert!(params.has_alcohol.is_none());
    }

    #[test]
    fn test_sort_whitelist() {
        for key in ["name", "glass", "categoryName", "createdAt", "updatedAt"] {
            assert!(parse(&format!("sort={}", key)).is_ok(), "{} should be accepted", key);
        }
        assert!(parse("sort=instructions").is_err());
        assert!(parse("sort=id").is_err());
    }
}
