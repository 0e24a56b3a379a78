use super::form::{CocktailFields, CocktailFormDoc, FIELDS};
use super::{ensure_category_exists, find_cocktail};
use crate::api::multipart::ImageForm;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::{conflict_on_unique, ApiResult};
use crate::media::{MediaKind, MediaStore};
use crate::models::Cocktail;
use crate::schema::cocktails;
use axum::{
    extract::{Multipart, Path, State},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    patch,
    path = "/cocktails/{id}",
    tag = "cocktails",
    params(
        ("id" = i32, Path, description = "Cocktail ID")
    ),
    request_body(content_type = "multipart/form-data", content = CocktailFormDoc, description = "Any subset of the create fields"),
    responses(
        (status = 200, description = "Updated cocktail", body = Cocktail),
        (status = 400, description = "Invalid form or image", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Cocktail or category not found", body = ErrorResponse),
        (status = 409, description = "Name already taken", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_cocktail(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(media): State<Arc<MediaStore>>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let mut form = ImageForm::read(multipart, FIELDS).await?;
    let fields = CocktailFields::parse(&form)?;

    let mut conn = pool.get()?;
    let existing = find_cocktail(&mut conn, id)?;
    if let Some(category) = fields.category_name.as_deref() {
        ensure_category_exists(&mut conn, category)?;
    }

    let mut changes = fields.into_changes();
    if let Some(image) = form.image.take() {
        changes.image_url = Some(media.save(MediaKind::Cocktail, &image).await?);
    }
    if changes.is_empty() {
        return Ok(Json(existing));
    }

    let updated = diesel::update(cocktails::table.find(id))
        .set(&changes)
        .returning(Cocktail::as_returning())
        .get_result(&mut conn)
        .map_err(conflict_on_unique("Cocktail with this name already exists"));

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

    tracing::info!(cocktail_id = id, by = %user.id, "Updated cocktail");
    Ok(Json(updated))
}
