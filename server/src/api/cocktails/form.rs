use crate::api::multipart::ImageForm;
use crate::api::{check_max_chars, MAX_KEY_LEN, MAX_LABEL_LEN};
use crate::error::{ApiError, ApiResult};
use crate::models::CocktailChanges;
use utoipa::ToSchema;

/// Text fields read from cocktail forms.
pub const FIELDS: &[&str] = &["name", "instructions", "glass", "categoryName"];

/// Multipart body of cocktail create/update requests.
#[derive(ToSchema)]
#[schema(as = CocktailForm, rename_all = "camelCase")]
#[allow(dead_code)]
pub struct CocktailFormDoc {
    pub name: String,
    pub instructions: String,
    pub glass: String,
    pub category_name: Option<String>,
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

#[derive(Debug, PartialEq)]
pub struct CocktailFields {
    pub name: Option<String>,
    pub instructions: Option<String>,
    pub glass: Option<String>,
    pub category_name: Option<String>,
}

/// Required fields of a new cocktail.
pub struct NewCocktailFields<'a> {
    pub name: &'a str,
    pub instructions: &'a str,
    pub glass: &'a str,
}

fn required<'a>(value: &'a Option<String>, name: &str) -> ApiResult<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| ApiError::bad_request(format!("{} is required", name)))
}

impl CocktailFields {
    pub fn parse(form: &ImageForm) -> ApiResult<Self> {
        let fields = Self {
            name: form.text("name"),
            instructions: form.text("instructions"),
            glass: form.text("glass"),
            category_name: form.text("categoryName"),
        };
        for (field, value, max) in [
            ("name", &fields.name, MAX_LABEL_LEN),
            ("glass", &fields.glass, MAX_LABEL_LEN),
            ("categoryName", &fields.category_name, MAX_KEY_LEN),
        ] {
            if let Some(value) = value {
                check_max_chars(field, value, max)?;
            }
        }
        Ok(fields)
    }

    pub fn require_create(&self) -> ApiResult<NewCocktailFields<'_>> {
        Ok(NewCocktailFields {
            name: required(&self.name, "name")?,
            instructions: required(&self.instructions, "instructions")?,
            glass: required(&self.glass, "glass")?,
        })
    }

    pub fn into_changes(self) -> CocktailChanges {
        CocktailChanges {
            name: self.name,
            instructions: self.instructions,
            glass: self.glass,
            category_name: self.category_name,
            image_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_requires_core_fields() {
        let form = ImageForm::from_pairs(&[("name", "Mojito"), ("glass", "Highball")]);
        let fields = CocktailFields::parse(&form).unwrap();
        assert_eq!(
            fields.require_create().err().map(|e| e.to_string()).as_deref(),
            Some("instructions is required")
        );
    }

    #[test]
    fn test_complete_form() {
        let form = ImageForm::from_pairs(&[
            ("name", "Mojito"),
            ("instructions", "Muddle mint, add rum, top with soda"),
            ("glass", "Highball"),
            ("categoryName", "Classic"),
        ]);
        let fields = CocktailFields::parse(&form).unwrap();
        let required = fields.require_create().unwrap();
        assert_eq!(required.name, "Mojito");
        assert_eq!(required.glass, "Highball");
        assert_eq!(fields.category_name.as_deref(), Some("Classic"));
    }

    #[test]
    fn test_empty_update_has_no_changes() {
        let changes = CocktailFields::parse(&ImageForm::from_pairs(&[]))
            .unwrap()
            .into_changes();
        assert!(changes.is_empty());
    }

    #[test]
    fn test_overlong_fields_rejected() {
        let name = "M".repeat(MAX_LABEL_LEN + 1);
        let form = ImageForm::from_pairs(&[("name", name.as_str())]);
        assert_eq!(
            CocktailFields::parse(&form).unwrap_err().to_string(),
            "name must be at most 255 characters"
        );

        let category = "c".repeat(MAX_KEY_LEN + 1);
        let form = ImageForm::from_pairs(&[("categoryName", category.as_str())]);
        assert_eq!(
            CocktailFields::parse(&form).unwrap_err().to_string(),
            "categoryName must be at most 64 characters"
        );

        let glass = "g".repeat(MAX_LABEL_LEN);
        let form = ImageForm::from_pairs(&[("glass", glass.as_str())]);
        assert!(CocktailFields::parse(&form).is_ok());
    }
}
