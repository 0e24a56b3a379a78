use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::{ApiError, ApiResult};
use crate::media::MediaStore;
use crate::schema::cocktails;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    delete,
    path = "/cocktails/{id}",
    tag = "cocktails",
    params(
        ("id" = i32, Path, description = "Cocktail ID")
    ),
    responses(
        (status = 204, description = "Cocktail deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Cocktail not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_cocktail(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(media): State<Arc<MediaStore>>,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    let mut conn = pool.get()?;

    // Ratings and ingredient links cascade
    let image_url: String = diesel::delete(cocktails::table.find(id))
        .returning(cocktails::image_url)
        .get_result(&mut conn)
        .optional()?
        .ok_or_else(|| ApiError::not_found(format!("Cocktail with id {} not found", id)))?;

    media.remove_logged(&image_url).await;

    tracing::info!(cocktail_id = id, by = %user.id, "Deleted cocktail");
    Ok(StatusCode::NO_CONTENT)
}
