pub mod auth;
pub mod cocktail_categories;
pub mod cocktail_ingredients;
pub mod cocktails;
pub mod ingredient_types;
pub mod ingredients;
pub mod multipart;
pub mod named;
pub mod ratings;
pub mod root;
pub mod users;

use crate::error::{ApiError, ApiResult};
use crate::AppState;
use axum::Router;
use serde::Serialize;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{OpenApi, ToSchema};

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Plain confirmation message
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Length of `VARCHAR(64)` columns: category and type names, amounts.
pub const MAX_KEY_LEN: usize = 64;
/// Length of `VARCHAR(255)` columns: cocktail and ingredient names, glass.
pub const MAX_LABEL_LEN: usize = 255;

/// 400 when `value` has more than `max` characters.
pub fn check_max_chars(field: &str, value: &str, max: usize) -> ApiResult<()> {
    if value.chars().count() > max {
        return Err(ApiError::bad_request(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

/// All API routes. Auth is enforced per handler through the `AuthUser` extractor.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(root::router())
        .merge(auth::router())
        .merge(users::router())
        .merge(ingredient_types::router())
        .merge(ingredients::router())
        .merge(cocktail_categories::router())
        .merge(cocktails::router())
        .merge(cocktail_ingredients::router())
        .merge(ratings::router())
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Base spec with shared components and security
    #[derive(OpenApi)]
    #[openapi(
        info(title = "Cocktail API", description = "Cocktail and ingredient catalog"),
        components(schemas(ErrorResponse, MessageResponse))
    )]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    // Add security scheme
    if let Some(components) = spec.components.as_mut() {
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }

    // Merge in each module's spec
    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        root::ApiDoc::openapi(),
        auth::ApiDoc::openapi(),
        users::ApiDoc::openapi(),
        ingredient_types::ApiDoc::openapi(),
        ingredients::ApiDoc::openapi(),
        cocktail_categories::ApiDoc::openapi(),
        cocktails::ApiDoc::openapi(),
        cocktail_ingredients::ApiDoc::openapi(),
        ratings::ApiDoc::openapi(),
    ];

    for module_spec in modules {
        // Paths can be shared between modules (e.g. GET and POST on one path
        // documented separately), so merge operations rather than replacing.
        for (path, item) in module_spec.paths.paths {
            match spec.paths.paths.get_mut(&path) {
                Some(existing) => existing.merge_operations(item),
                None => {
                    spec.paths.paths.insert(path, item);
                }
            }
        }

        // Merge components (schemas)
        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_covers_every_module() {
        let spec = openapi();
        for path in [
            "/",
            "/auth/register",
            "/auth/login",
            "/auth/profile",
            "/auth/verify-email",
            "/auth/forgot-password",
            "/auth/reset-password",
            "/auth/logout",
            "/user",
            "/user/me",
            "/user/disable/{email}",
            "/user/enable/{email}",
            "/ingredients/types",
            "/ingredients/types/{name}",
            "/ingredients",
            "/ingredients/{id}",
            "/cocktails/categories",
            "/cocktails/categories/{name}",
            "/cocktails",
            "/cocktails/{id}",
            "/cocktails/{id}/ingredients",
            "/cocktails/{id}/ingredients/{ingredient_id}",
            "/cocktails/{id}/ratings",
            "/cocktails/{id}/ratings/{user_email}",
            "/cocktails/ratings/me",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {}", path);
        }

        let components = spec.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
        assert!(components.schemas.contains_key("ErrorResponse"));
    }

    #[test]
    fn test_check_max_chars_counts_characters() {
        assert!(check_max_chars("name", &"a".repeat(MAX_KEY_LEN), MAX_KEY_LEN).is_ok());
        // Multi-byte characters count once each
        assert!(check_max_chars("name", &"ó".repeat(MAX_KEY_LEN), MAX_KEY_LEN).is_ok());

        let err = check_max_chars("name", &"a".repeat(MAX_KEY_LEN + 1), MAX_KEY_LEN).unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "name must be at most 64 characters");
    }

    #[test]
    fn test_paths_with_several_methods_keep_all_operations() {
        let spec = openapi();
        let item = &spec.paths.paths["/cocktails/{id}"];
        assert!(item.get.is_some());
        assert!(item.patch.is_some());
        assert!(item.delete.is_some());
    }
}
