use super::ensure_category_exists;
use super::form::{CocktailFields, CocktailFormDoc, FIELDS};
use crate::api::multipart::ImageForm;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::{conflict_on_unique, ApiResult};
use crate::media::{MediaKind, MediaStore};
use crate::models::{Cocktail, NewCocktail};
use crate::schema::cocktails;
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
    path = "/cocktails",
    tag = "cocktails",
    request_body(content_type = "multipart/form-data", content = CocktailFormDoc),
    responses(
        (status = 201, description = "Cocktail created", body = Cocktail),
        (status = 400, description = "Invalid form or image", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Image missing or unknown category", body = ErrorResponse),
        (status = 409, description = "Cocktail already exists", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_cocktail(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(media): State<Arc<MediaStore>>,
    multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let mut form = ImageForm::read(multipart, FIELDS).await?;
    let image = form.take_required_image()?;
    let fields = CocktailFields::parse(&form)?;
    let required = fields.require_create()?;

    let mut conn = pool.get()?;
    if let Some(category) = fields.category_name.as_deref() {
        ensure_category_exists(&mut conn, category)?;
    }

    let image_url = media.save(MediaKind::Cocktail, &image).await?;

    let inserted = diesel::insert_into(cocktails::table)
        .values(&NewCocktail {
            name: required.name,
            instructions: required.instructions,
            glass: required.glass,
            category_name: fields.category_name.as_deref(),
            image_url: &image_url,
        })
        .returning(Cocktail::as_returning())
        .get_result(&mut conn)
        .map_err(conflict_on_unique(format!(
            "Cocktail with name {} already exists",
            required.name
        )));

    let cocktail = match inserted {
        Ok(cocktail) => cocktail,
        Err(e) => {
            media.remove_logged(&image_url).await;
            return Err(e);
        }
    };

    tracing::info!(cocktail_id = cocktail.id, by = %user.id, "Created cocktail");
    Ok((StatusCode::CREATED, Json(cocktail)))
}
