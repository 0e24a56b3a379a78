use super::find_user_by_email;
use crate::api::auth::register::{check_profile_lengths, is_valid_email};
use crate::api::ErrorResponse;
use crate::auth::{AuthUser, Role};
use crate::db::DbPool;
use crate::error::{ApiError, ApiResult};
use crate::models::User;
use crate::schema::users;
use axum::{extract::State, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    #[serde(rename = "newAboutMe")]
    pub new_about_me: Option<String>,
    pub name: Option<String>,
    /// Target account; defaults to the caller. Only admins may target others.
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UpdateUserResponse {
    pub email: String,
    pub name: String,
    pub about_me: String,
}

#[derive(AsChangeset)]
#[diesel(table_name = users)]
struct ProfileChanges<'a> {
    name: Option<&'a str>,
    about_me: Option<&'a str>,
}

/// Resolve which account the caller may edit.
fn target_email<'a>(caller: &'a User, role: Role, req: &'a UpdateUserRequest) -> ApiResult<&'a str> {
    match req.email.as_deref().map(str::trim) {
        None => Ok(&caller.email),
        Some(email) if email.eq_ignore_ascii_case(&caller.email) => Ok(&caller.email),
        Some(email) if role == Role::Admin => {
            if is_valid_email(email) {
                Ok(email)
            } else {
                Err(ApiError::bad_request("email must be a valid email address"))
            }
        }
        Some(_) => Err(ApiError::conflict("Cannot update another user's data")),
    }
}

fn validate(req: &UpdateUserRequest) -> ApiResult<()> {
    if req.name.is_none() && req.new_about_me.is_none() {
        return Err(ApiError::bad_request("No fields to update"));
    }
    check_profile_lengths(req.name.as_deref(), req.new_about_me.as_deref())
}

#[utoipa::path(
    patch,
    path = "/user",
    tag = "user",
    request_body(content = UpdateUserRequest, example = json!({"name": "Ola", "newAboutMe": "Loves mojitos"})),
    responses(
        (status = 200, description = "Updated profile", body = UpdateUserResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Cannot update another user's data", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_user(
    auth: AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    let role = auth.role();
    let target = target_email(&auth.0, role, &req)?;
    validate(&req)?;

    let mut conn = pool.get()?;
    let user = find_user_by_email(&mut conn, target)?;

    let updated: User = diesel::update(users::table.find(user.id))
        .set(&ProfileChanges {
            name: req.name.as_deref(),
            about_me: req.new_about_me.as_deref(),
        })
        .returning(User::as_returning())
        .get_result(&mut conn)?;

    tracing::info!(user_id = %updated.id, by = %auth.0.id, "Updated user profile");

    Ok(Json(UpdateUserResponse {
        email: updated.email,
        name: updated.name,
        about_me: updated.about_me,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn caller() -> User {
        User {
            id: Uuid::new_v4(),
            email: "Guest@Example.com".to_string(),
            password_hash: String::new(),
            name: String::new(),
            about_me: String::new(),
            role: "USER".to_string(),
            is_enabled: true,
            is_verified: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn targeting(email: Option<&str>) -> UpdateUserRequest {
        UpdateUserRequest {
            email: email.map(str::to_string),
            name: Some("Ola".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_to_caller() {
        let user = caller();
        let req = targeting(None);
        assert_eq!(target_email(&user, Role::User, &req).unwrap(), "Guest@Example.com");

        let req = targeting(Some("guest@example.com"));
        assert_eq!(target_email(&user, Role::User, &req).unwrap(), "Guest@Example.com");
    }

    #[test]
    fn test_only_admins_edit_others() {
        let user = caller();
        let req = targeting(Some("other@example.com"));

        let err = target_email(&user, Role::User, &req).unwrap_err();
        assert_eq!(err.to_string(), "Cannot update another user's data");
        assert!(target_email(&user, Role::Moderator, &req).is_err());
        assert_eq!(
            target_email(&user, Role::Admin, &req).unwrap(),
            "other@example.com"
        );
    }

    #[test]
    fn test_requires_some_field() {
        let req = UpdateUserRequest::default();
        assert_eq!(validate(&req).unwrap_err().to_string(), "No fields to update");

        let req = UpdateUserRequest {
            new_about_me: Some("x".repeat(31)),
            ..Default::default()
        };
        assert!(validate(&req).is_err());
    }

    #[test]
    fn test_request_field_names() {
        let req: UpdateUserRequest =
            serde_json::from_str(r#"{"newAboutMe": "hi", "name": "Ola"}"#).unwrap();
        assert_eq!(req.new_about_me.as_deref(), Some("hi"));
        assert_eq!(req.name.as_deref(), Some("Ola"));
    }
}
