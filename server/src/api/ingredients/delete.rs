use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::{ApiError, ApiResult};
use crate::media::MediaStore;
use crate::models::Ingredient;
use crate::schema::ingredients;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    delete,
    path = "/ingredients/{id}",
    tag = "ingredients",
    params(
        ("id" = i32, Path, description = "Ingredient ID")
    ),
    responses(
        (status = 200, description = "Deleted ingredient", body = Ingredient),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Ingredient not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_ingredient(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(media): State<Arc<MediaStore>>,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    let mut conn = pool.get()?;

    // Cocktail links to this ingredient go with it (ON DELETE CASCADE)
    let deleted: Ingredient = diesel::delete(ingredients::table.find(id))
        .returning(Ingredient::as_returning())
        .get_result(&mut conn)
        .optional()?
        .ok_or_else(|| ApiError::not_found(format!("Ingredient with id {} not found", id)))?;

    media.remove_logged(&deleted.image_url).await;

    tracing::info!(ingredient_id = id, by = %user.id, "Deleted ingredient");
    Ok(Json(deleted))
}
