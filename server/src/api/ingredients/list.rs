use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::error::ApiResult;
use crate::models::Ingredient;
use crate::query::{contains_pattern, SortOrder};
use crate::raw_sql::percentage_order;
use crate::schema::ingredients;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

/// Sort field for ingredient lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum IngredientSort {
    Name,
    Alcoholic,
    TypeName,
    /// Ingredients without a percentage always come last
    Percentage,
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListIngredientsParams {
    /// Exact ingredient type name
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    /// Only alcoholic (`true`) or non-alcoholic (`false`) ingredients
    pub alcoholic: Option<bool>,
    /// Case-insensitive substring of the name
    pub name: Option<String>,
    /// Sort field (default: newest first)
    pub sort: Option<IngredientSort>,
    /// Sort direction (default: asc)
    #[serde(default)]
    pub order: SortOrder,
}

#[utoipa::path(
    get,
    path = "/ingredients",
    tag = "ingredients",
    params(ListIngredientsParams),
    responses(
        (status = 200, description = "Matching ingredients", body = Vec<Ingredient>),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse)
    )
)]
pub async fn list_ingredients(
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ListIngredientsParams>,
) -> ApiResult<impl IntoResponse> {
    let mut conn = pool.get()?;

    let mut query = ingredients::table.into_boxed();

    if let Some(type_name) = params.type_name.as_deref().map(str::trim) {
        if !type_name.is_empty() {
            query = query.filter(ingredients::type_name.eq(type_name.to_string()));
        }
    }
    if let Some(alcoholic) = params.alcoholic {
        query = query.filter(ingredients::alcoholic.eq(alcoholic));
    }
    if let Some(pattern) = params.name.as_deref().and_then(contains_pattern) {
        query = query.filter(ingredients::name.ilike(pattern));
    }

    let query = match (params.sort, params.order) {
        (None, _) => query.order(ingredients::created_at.desc()),
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

    let results: Vec<Ingredient> = query
        .then_order_by(ingredients::id.asc())
        .select(Ingredient::as_select())
        .load(&mut conn)?;

    Ok(Json(results))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Uri;

    fn parse(query: &str) -> Result<ListIngredientsParams, String> {
        let uri: Uri = format!("/ingredients?{}", query).parse().unwrap();
        Query::<ListIngredientsParams>::try_from_uri(&uri)
            .map(|Query(p)| p)
            .map_err(|e| e.body_text())
    }

    #[test]
    fn test_defaults() {
        let params = parse("").unwrap();
        assert!(params.sort.is_none());
        assert_eq!(params.order, SortOrder::Asc);
        assert!(params.alcoholic.is_none());
    }

    #[test]
    fn test_parses_all_filters() {
        let params = parse("type=Spirit&alcoholic=true&name=rum&sort=typeName&order=desc").unwrap();
        assert_eq!(params.type_name.as_deref(), Some("Spirit"));
        assert_eq!(params.alcoholic, Some(true));
        assert_eq!(params.name.as_deref(), Some("rum"));
        assert_eq!(params.sort, Some(IngredientSort::TypeName));
        assert!(params.order.is_desc());
    }

    #[test]
    fn test_sort_whitelist() {
        for key in ["name", "alcoholic", "typeName", "percentage", "createdAt", "updatedAt"] {
            assert!(parse(&format!("sort={}", key)).is_ok(), "{} should be accepted", key);
        }
        assert!(parse("sort=id").is_err());
        assert!(parse("sort=imageUrl").is_err());
        assert!(parse("sort=type_name").is_err());
    }

    #[test]
    fn test_alcoholic_must_be_boolean() {
        assert!(parse("alcoholic=yes").is_err());
        assert_eq!(parse("alcoholic=false").unwrap().alcoholic, Some(false));
    }
}
