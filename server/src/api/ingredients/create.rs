use super::ensure_type_exists;
use super::form::{IngredientFields, IngredientFormDoc, FIELDS};
use crate::api::multipart::ImageForm;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::{conflict_on_unique, ApiResult};
use crate::media::{MediaKind, MediaStore};
use crate::models::{Ingredient, NewIngredient};
use crate::schema::ingredients;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/ingredients",
    tag = "ingredients",
    request_body(content_type = "multipart/form-data", content = IngredientFormDoc),
    responses(
        (status = 201, description = "Ingredient created", body = Ingredient),
        (status = 400, description = "Invalid form or image", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Image missing or unknown ingredient type", body = ErrorResponse),
        (status = 409, description = "Ingredient already exists", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_ingredient(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(media): State<Arc<MediaStore>>,
    multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let mut form = ImageForm::read(multipart, FIELDS).await?;
    let image = form.take_required_image()?;
    let fields = IngredientFields::parse(&form)?;
    let (name, alcoholic) = fields.require_create()?;

    let mut conn = pool.get()?;
    if let Some(type_name) = fields.type_name.as_deref() {
        ensure_type_exists(&mut conn, type_name)?;
    }

    let image_url = media.save(MediaKind::Ingredient, &image).await?;

    let inserted = diesel::insert_into(ingredients::table)
        .values(&NewIngredient {
            name,
            description: fields.description.as_deref(),
            alcoholic,
            type_name: fields.type_name.as_deref(),
            percentage: fields.percentage,
            image_url: &image_url,
        })
        .returning(Ingredient::as_returning())
        .get_result(&mut conn)
        .map_err(conflict_on_unique(format!(
            "Ingredient with name {} already exists",
            name
        )));

    let ingredient = match inserted {
        Ok(ingredient) => ingredient,
        Err(e) => {
            media.remove_logged(&image_url).await;
            return Err(e);
        }
    };

    tracing::info!(ingredient_id = ingredient.id, by = %user.id, "Created ingredient");
    Ok((StatusCode::CREATED, Json(ingredient)))
}
