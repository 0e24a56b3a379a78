//! Request bodies and messages shared by the name-keyed lookup resources
//! (ingredient types and cocktail categories).

use super::{check_max_chars, MAX_KEY_LEN};
use crate::error::{ApiError, ApiResult};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NameRequest {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RenameRequest {
    /// New name; omit to leave the record unchanged
    pub name: Option<String>,
}

/// A kind of name-keyed record, e.g. "Ingredient type".
#[derive(Debug, Clone, Copy)]
pub struct NamedKind {
    label: &'static str,
}

impl NamedKind {
    pub const fn new(label: &'static str) -> Self {
        Self { label }
    }

    pub fn not_found(&self, name: &str) -> ApiError {
        ApiError::not_found(format!("{} with name {} not found", self.label, name))
    }

    pub fn already_exists(&self, name: &str) -> String {
        format!("{} with name {} already exists", self.label, name)
    }
}

/// Trimmed, non-empty name that fits the key column.
pub fn clean_name(name: &str) -> ApiResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("name must not be empty"));
    }
    check_max_chars("name", name, MAX_KEY_LEN)?;
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_clean_name_trims() {
        assert_eq!(clean_name("  Juice ").unwrap(), "Juice");
        assert!(clean_name("   ").is_err());
    }

    #[test]
    fn test_clean_name_rejects_names_longer_than_the_column() {
        assert!(clean_name(&"x".repeat(MAX_KEY_LEN)).is_ok());

        let err = clean_name(&"x".repeat(MAX_KEY_LEN + 1)).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "name must be at most 64 characters");
    }

    #[test]
    fn test_messages_use_label() {
        let kind = NamedKind::new("Cocktail category");
        assert_eq!(
            kind.not_found("Tiki").to_string(),
            "Cocktail category with name Tiki not found"
        );
        assert_eq!(
            kind.already_exists("Tiki"),
            "Cocktail category with name Tiki already exists"
        );
    }
}
