//! Ingredient types (`Spirit`, `Juice`, ...), keyed by name.

use crate::api::named::{clean_name, NameRequest, NamedKind, RenameRequest};
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::{conflict_on_unique, ApiResult};
use crate::models::IngredientType;
use crate::schema::ingredient_types;
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

const KIND: NamedKind = NamedKind::new("Ingredient type");

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/ingredients/types",
            get(list_ingredient_types).post(create_ingredient_type),
        )
        .route(
            "/ingredients/types/{name}",
            get(get_ingredient_type)
                .patch(update_ingredient_type)
                .delete(delete_ingredient_type),
        )
}

fn find(conn: &mut PgConnection, name: &str) -> ApiResult<IngredientType> {
    ingredient_types::table
        .find(name)
        .select(IngredientType::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| KIND.not_found(name))
}

#[utoipa::path(
    post,
    path = "/ingredients/types",
    tag = "ingredient-types",
    request_body(content = NameRequest, example = json!({"name": "Juice"})),
    responses(
        (status = 201, description = "Ingredient type created", body = IngredientType),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Staff only", body = ErrorResponse),
        (status = 409, description = "Ingredient type already exists", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_ingredient_type(
    auth: AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(req): Json<NameRequest>,
) -> ApiResult<impl IntoResponse> {
    auth.require_staff()?;
    let name = clean_name(&req.name)?;

    let mut conn = pool.get()?;
    let created: IngredientType = diesel::insert_into(ingredient_types::table)
        .values(ingredient_types::name.eq(name))
        .returning(IngredientType::as_returning())
        .get_result(&mut conn)
        .map_err(conflict_on_unique(KIND.already_exists(name)))?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/ingredients/types",
    tag = "ingredient-types",
    responses(
        (status = 200, description = "All ingredient types ordered by name", body = Vec<IngredientType>)
    )
)]
pub async fn list_ingredient_types(
    State(pool): State<Arc<DbPool>>,
) -> ApiResult<impl IntoResponse> {
    let mut conn = pool.get()?;
    let types: Vec<IngredientType> = ingredient_types::table
        .order(ingredient_types::name.asc())
        .select(IngredientType::as_select())
        .load(&mut conn)?;

    Ok(Json(types))
}

#[utoipa::path(
    get,
    path = "/ingredients/types/{name}",
    tag = "ingredient-types",
    params(
        ("name" = String, Path, description = "Ingredient type name")
    ),
    responses(
        (status = 200, description = "Ingredient type", body = IngredientType),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn get_ingredient_type(
    State(pool): State<Arc<DbPool>>,
    Path(name): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let mut conn = pool.get()?;
    Ok(Json(find(&mut conn, &name)?))
}

#[utoipa::path(
    patch,
    path = "/ingredients/types/{name}",
    tag = "ingredient-types",
    params(
        ("name" = String, Path, description = "Ingredient type name")
    ),
    request_body(content = RenameRequest, example = json!({"name": "Fresh juice"})),
    responses(
        (status = 200, description = "Renamed ingredient type", body = IngredientType),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Staff only", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse),
        (status = 409, description = "Name already taken", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_ingredient_type(
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

    // Ingredients follow the rename through ON UPDATE CASCADE
    let updated: IngredientType = diesel::update(ingredient_types::table.find(&name))
        .set(ingredient_types::name.eq(new_name))
        .returning(IngredientType::as_returning())
        .get_result(&mut conn)
        .optional()
        .map_err(conflict_on_unique(KIND.already_exists(new_name)))?
        .ok_or_else(|| KIND.not_found(&name))?;

    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/ingredients/types/{name}",
    tag = "ingredient-types",
    params(
        ("name" = String, Path, description = "Ingredient type name")
    ),
    responses(
        (status = 200, description = "Deleted ingredient type", body = IngredientType),
        (status = 403, description = "Staff only", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_ingredient_type(
    auth: AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(name): Path<String>,
) -> ApiResult<impl IntoResponse> {
    auth.require_staff()?;
    let mut conn = pool.get()?;

    // Ingredients of this type keep existing with no type (ON DELETE SET NULL)
    let deleted: IngredientType = diesel::delete(ingredient_types::table.find(&name))
        .returning(IngredientType::as_returning())
        .get_result(&mut conn)
        .optional()?
        .ok_or_else(|| KIND.not_found(&name))?;

    tracing::info!(name = %deleted.name, by = %auth.0.id, "Deleted ingredient type");
    Ok(Json(deleted))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create_ingredient_type,
        list_ingredient_types,
        get_ingredient_type,
        update_ingredient_type,
        delete_ingredient_type,
    ),
    components(schemas(IngredientType, NameRequest, RenameRequest))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        assert_eq!(
            KIND.not_found("Bitters").to_string(),
            "Ingredient type with name Bitters not found"
        );
    }
}
