//! Cocktail categories (`Classic`, `Tropical`, ...), keyed by name.

use crate::api::named::{clean_name, NameRequest, NamedKind, RenameRequest};
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::{conflict_on_unique, ApiResult};
use crate::models::CocktailCategory;
use crate::schema::cocktail_categories;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use diesel::prelude::*;
use std::sync::Arc;
use utoipa::OpenApi;

const KIND: NamedKind = NamedKind::new("Cocktail category");

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/cocktails/categories",
            get(list_cocktail_categories).post(create_cocktail_category),
        )
        .route(
            "/cocktails/categories/{name}",
            get(get_cocktail_category)
                .patch(update_cocktail_category)
                .delete(delete_cocktail_category),
        )
}

fn find(conn: &mut PgConnection, name: &str) -> ApiResult<CocktailCategory> {
    cocktail_categories::table
        .find(name)
        .select(CocktailCategory::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| KIND.not_found(name))
}

#[utoipa::path(
    post,
    path = "/cocktails/categories",
    tag = "cocktail-categories",
    request_body(content = NameRequest, example = json!({"name": "Classic"})),
    responses(
        (status = 201, description = "Cocktail category created", body = CocktailCategory),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Staff only", body = ErrorResponse),
        (status = 409, description = "Cocktail category already exists", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_cocktail_category(
    auth: AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(req): Json<NameRequest>,
) -> ApiResult<impl IntoResponse> {
    auth.require_staff()?;
    let name = clean_name(&req.name)?;

    let mut conn = pool.get()?;
    let created: CocktailCategory = diesel::insert_into(cocktail_categories::table)
        .values(cocktail_categories::name.eq(name))
        .returning(CocktailCategory::as_returning())
        .get_result(&mut conn)
        .map_err(conflict_on_unique(KIND.already_exists(name)))?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/cocktails/categories",
    tag = "cocktail-categories",
    responses(
        (status = 200, description = "All cocktail categories ordered by name", body = Vec<CocktailCategory>)
    )
)]
pub async fn list_cocktail_categories(
    State(pool): State<Arc<DbPool>>,
) -> ApiResult<impl IntoResponse> {
    let mut conn = pool.get()?;
    let categories: Vec<CocktailCategory> = cocktail_categories::table
        .order(cocktail_categories::name.asc())
        .select(CocktailCategory::as_select())
        .load(&mut conn)?;

    Ok(Json(categories))
}

#[utoipa::path(
    get,
    path = "/cocktails/categories/{name}",
    tag = "cocktail-categories",
    params(
        ("name" = String, Path, description = "Cocktail category name")
    ),
    responses(
        (status = 200, description = "Cocktail category", body = CocktailCategory),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn get_cocktail_category(
    State(pool): State<Arc<DbPool>>,
    Path(name): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let mut conn = pool.get()?;
    Ok(Json(find(&mut conn, &name)?))
}

#[utoipa::path(
    patch,
    path = "/cocktails/categories/{name}",
    tag = "cocktail-categories",
    params(
        ("name" = String, Path, description = "Cocktail category name")
    ),
    request_body(content = RenameRequest, example = json!({"name": "Modern classic"})),
    responses(
        (status = 200, description = "Renamed cocktail category", body = CocktailCategory),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Staff only", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse),
        (status = 409, description = "Name already taken", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_cocktail_category(
    auth: AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(name): Path<String>,
    Json(req): Json<RenameRequest>,
) -> ApiResult<impl IntoResponse> {
    auth.require_staff()?;
    let mut conn = pool.get()?;

    let Some(new_name) = req.name.as_deref() else {
        return Ok(Json(find(&mut conn, &name)?));
    };
    let new_name = clean_name(new_name)?;

    // Cocktails follow the rename through ON UPDATE CASCADE
    let updated: CocktailCategory = diesel::update(cocktail_categories::table.find(&name))
        .set(cocktail_categories::name.eq(new_name))
        .returning(CocktailCategory::as_returning())
        .get_result(&mut conn)
        .optional()
        .map_err(conflict_on_unique(KIND.already_exists(new_name)))?
        .ok_or_else(|| KIND.not_found(&name))?;

    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/cocktails/categories/{name}",
    tag = "cocktail-categories",
    params(
        ("name" = String, Path, description = "Cocktail category name")
    ),
    responses(
        (status = 200, description = "Deleted cocktail category", body = CocktailCategory),
        (status = 403, description = "Staff only", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_cocktail_category(
    auth: AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(name): Path<String>,
) -> ApiResult<impl IntoResponse> {
    auth.require_staff()?;
    let mut conn = pool.get()?;

    // Cocktails in this category keep existing uncategorized (ON DELETE SET NULL)
    let deleted: CocktailCategory = diesel::delete(cocktail_categories::table.find(&name))
        .returning(CocktailCategory::as_returning())
        .get_result(&mut conn)
        .optional()?
        .ok_or_else(|| KIND.not_found(&name))?;

    tracing::info!(name = %deleted.name, by = %auth.0.id, "Deleted cocktail category");
    Ok(Json(deleted))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create_cocktail_category,
        list_cocktail_categories,
        get_cocktail_category,
        update_cocktail_category,
        delete_cocktail_category,
    ),
    components(schemas(CocktailCategory, NameRequest, RenameRequest))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        assert_eq!(
            KIND.not_found("Tiki").to_string(),
            "Cocktail category with name Tiki not found"
        );
    }
}
