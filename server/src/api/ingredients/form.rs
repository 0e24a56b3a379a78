use crate::api::multipart::ImageForm;
use crate::api::{check_max_chars, MAX_KEY_LEN, MAX_LABEL_LEN};
use crate::error::{ApiError, ApiResult};
use crate::models::IngredientChanges;
use utoipa::ToSchema;

/// Text fields read from ingredient forms.
pub const FIELDS: &[&str] = &[
    "name",
    "alcoholic",
    "typeName",
    "type",
    "description",
    "percentage",
];

/// Multipart body of ingredient create/update requests.
#[derive(ToSchema)]
#[schema(as = IngredientForm, rename_all = "camelCase")]
#[allow(dead_code)]
pub struct IngredientFormDoc {
    pub name: String,
    pub alcoholic: bool,
    /// Ingredient type name; `type` is accepted as an alias
    pub type_name: Option<String>,
    pub description: Option<String>,
    /// Alcohol by volume, 0 to 100
    pub percentage: Option<f64>,
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

#[derive(Debug, PartialEq)]
pub struct IngredientFields {
    pub name: Option<String>,
    pub alcoholic: Option<bool>,
    pub type_name: Option<String>,
    pub description: Option<String>,
    pub percentage: Option<f64>,
}

impl IngredientFields {
    pub fn parse(form: &ImageForm) -> ApiResult<Self> {
        let percentage = form.number("percentage")?;
        if percentage.is_some_and(|p| !(0.0..=100.0).contains(&p)) {
            return Err(ApiError::bad_request("percentage must be between 0 and 100"));
        }

        let name = form.text("name");
        if let Some(name) = &name {
            check_max_chars("name", name, MAX_LABEL_LEN)?;
        }
        let type_name = form.text_any(&["typeName", "type"]);
        if let Some(type_name) = &type_name {
            check_max_chars("typeName", type_name, MAX_KEY_LEN)?;
        }

        Ok(Self {
            name,
            alcoholic: form.bool("alcoholic")?,
            type_name,
            description: form.text("description"),
            percentage,
        })
    }

    /// Required fields for a new ingredient.
    pub fn require_create(&self) -> ApiResult<(&str, bool)> {
        let name = self
            .name
            .as_deref()
            .ok_or_else(|| ApiError::bad_request("name is required"))?;
        let alcoholic = self
            .alcoholic
            .ok_or_else(|| ApiError::bad_request("alcoholic is required"))?;
        Ok((name, alcoholic))
    }

    pub fn into_changes(self) -> IngredientChanges {
        IngredientChanges {
            name: self.name,
            description: self.description,
            alcoholic: self.alcoholic,
            type_name: self.type_name,
            percentage: self.percentage,
            image_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_form() {
        let form = ImageForm::from_pairs(&[
            ("name", "Vodka"),
            ("alcoholic", "true"),
            ("type", "Spirit"),
            ("percentage", "40"),
        ]);
        let fields = IngredientFields::parse(&form).unwrap();
        assert_eq!(fields.require_create().unwrap(), ("Vodka", true));
        assert_eq!(fields.type_name.as_deref(), Some("Spirit"));
        assert_eq!(fields.percentage, Some(40.0));
        assert_eq!(fields.description, None);
    }

    #[test]
    fn test_create_requires_name_and_alcoholic() {
        let form = ImageForm::from_pairs(&[("name", "Lime juice")]);
        let fields = IngredientFields::parse(&form).unwrap();
        assert_eq!(
            fields.require_create().unwrap_err().to_string(),
            "alcoholic is required"
        );
    }

    #[test]
    fn test_percentage_range() {
        let form = ImageForm::from_pairs(&[("percentage", "140")]);
        assert!(IngredientFields::parse(&form).is_err());
    }

    #[test]
    fn test_overlong_name_and_type_rejected() {
        let name = "v".repeat(MAX_LABEL_LEN + 1);
        let form = ImageForm::from_pairs(&[("name", name.as_str())]);
        assert_eq!(
            IngredientFields::parse(&form).unwrap_err().to_string(),
            "name must be at most 255 characters"
        );

        let type_name = "t".repeat(MAX_KEY_LEN + 1);
        let form = ImageForm::from_pairs(&[("type", type_name.as_str())]);
        assert_eq!(
            IngredientFields::parse(&form).unwrap_err().to_string(),
            "typeName must be at most 64 characters"
        );
    }

    #[test]
    fn test_partial_update_changes() {
        let form = ImageForm::from_pairs(&[("description", "Fresh")]);
        let changes = IngredientFields::parse(&form).unwrap().into_changes();
        assert_eq!(changes.description.as_deref(), Some("Fresh"));
        assert!(changes.name.is_none());
        assert!(!changes.is_empty());
    }
}
