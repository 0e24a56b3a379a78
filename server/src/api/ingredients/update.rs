use super::form::{IngredientFields, IngredientFormDoc, FIELDS};
use super::{ensure_type_exists, find_ingredient};
use crate::api::multipart::ImageForm;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::{conflict_on_unique, ApiResult};
use crate::media::{MediaKind, MediaStore};
use crate::models::Ingredient;
use crate::schema::ingredients;
use axum::{
    extract::{Multipart, Path, State},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    patch,
    path = "/ingredients/{id}",
    tag = "ingredients",
    params(
        ("id" = i32, Path, description = "Ingredient ID")
    ),
    request_body(content_type = "multipart/form-data", content = IngredientFormDoc, description = "Any subset of the create fields"),
    responses(
        (status = 200, description = "Updated ingredient", body = Ingredient),
        (status = 400, description = "Invalid form or image", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Ingredient or ingredient type not found", body = ErrorResponse),
        (status = 409, description = "Name already taken", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_ingredient(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(media): State<Arc<MediaStore>>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let mut form = ImageForm::read(multipart, FIELDS).await?;
    let fields = IngredientFields::parse(&form)?;

    let mut conn = pool.get()?;
    let existing = find_ingredient(&mut conn, id)?;
    if let Some(type_name) = fields.type_name.as_deref() {
        ensure_type_exists(&mut conn, type_name)?;
    }

    let mut changes = fields.into_changes();
    if let Some(image) = form.image.take() {
        changes.image_url = Some(media.save(MediaKind::Ingredient, &image).await?);
    }
    if changes.is_empty() {
        return Ok(Json(existing));
    }

    let updated = diesel::update(ingredients::table.find(id))
        .set(&changes)
        .returning(Ingredient::as_returning())
        .get_result(&mut conn)
        .map_err(conflict_on_unique("Ingredient with this name already exists"));

    let updated = match updated {
        Ok(updated) => updated,
        Err(e) => {
            if let Some(new_url) = &changes.image_url {
                media.remove_logged(new_url).await;
            }
            return Err(e);
        }
    };

    if changes.image_url.is_some() {
        media.remove_logged(&existing.image_url).await;
    }

    tracing::info!(ingredient_id = id, by = %user.id, "Updated ingredient");
    Ok(Json(updated))
}
