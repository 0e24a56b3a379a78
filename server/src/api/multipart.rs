//! Multipart forms carrying text fields plus one optional image file.

use crate::error::ApiError;
use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use std::collections::HashMap;

/// Name of the file field in create/update forms.
pub const IMAGE_FIELD: &str = "image";

#[derive(Debug, Default)]
pub struct ImageForm {
    fields: HashMap<String, String>,
    pub image: Option<Vec<u8>>,
}

fn multipart_error(e: MultipartError) -> ApiError {
    tracing::warn!("Multipart read error: {}", e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::bad_request("File too large")
    } else {
        ApiError::bad_request(format!("Failed to read multipart data: {}", e.body_text()))
    }
}

impl ImageForm {
    /// Read every field. Only the names in `known` are kept as text, the
    /// `image` field is kept as bytes, anything else is skipped.
    pub async fn read(mut multipart: Multipart, known: &[&str]) -> Result<Self, ApiError> {
        let mut form = ImageForm::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == IMAGE_FIELD {
                let data = field.bytes().await.map_err(multipart_error)?;
                // Browsers send an empty part when no file was picked
                if !data.is_empty() {
                    form.image = Some(data.to_vec());
                }
            } else if known.contains(&name.as_str()) {
                let value = field.text().await.map_err(multipart_error)?;
                form.fields.insert(name, value);
            } else {
                tracing::debug!(field = %name, "Ignoring unknown form field");
            }
        }

        Ok(form)
    }

    #[cfg(test)]
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            image: None,
        }
    }

    /// Trimmed text value; blank counts as absent.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// First present value among several accepted names.
    pub fn text_any(&self, names: &[&str]) -> Option<String> {
        names.iter().find_map(|name| self.text(name))
    }

    pub fn bool(&self, name: &str) -> Result<Option<bool>, ApiError> {
        match self.text(name) {
            None => Ok(None),
            Some(v) => match v.to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(Some(true)),
                "false" | "0" => Ok(Some(false)),
                _ => Err(ApiError::bad_request(format!("{} must be a boolean", name))),
            },
        }
    }

    pub fn number(&self, name: &str) -> Result<Option<f64>, ApiError> {
        match self.text(name) {
            None => Ok(None),
            Some(v) => v
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(Some)
                .ok_or_else(|| ApiError::bad_request(format!("{} must be a number", name))),
        }
    }

    /// The uploaded image, or the 404 used when a create form lacks one.
    pub fn take_required_image(&mut self) -> Result<Vec<u8>, ApiError> {
        self.image
            .take()
            .ok_or_else(|| ApiError::not_found("Image file is required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_trims_and_treats_blank_as_missing() {
        let form = ImageForm::from_pairs(&[("name", "  Mojito "), ("glass", "   ")]);
        assert_eq!(form.text("name").as_deref(), Some("Mojito"));
        assert_eq!(form.text("glass"), None);
    }

    #[test]
    fn test_text_any_prefers_first_name() {
        let form = ImageForm::from_pairs(&[("type", "Juice")]);
        assert_eq!(
            form.text_any(&["typeName", "type"]).as_deref(),
            Some("Juice")
        );
    }

    #[test]
    fn test_bool_parsing() {
        let form = ImageForm::from_pairs(&[("a", "true"), ("b", "FALSE"), ("c", "maybe")]);
        assert_eq!(form.bool("a").unwrap(), Some(true));
        assert_eq!(form.bool("b").unwrap(), Some(false));
        assert!(form.bool("c").is_err());
        assert_eq!(form.bool("missing").unwrap(), None);
    }

    #[test]
    fn test_number_parsing() {
        let form = ImageForm::from_pairs(&[("p", "40.5"), ("bad", "forty"), ("nan", "NaN")]);
        assert_eq!(form.number("p").unwrap(), Some(40.5));
        assert!(form.number("bad").is_err());
        assert!(form.number("nan").is_err());
    }

    #[test]
    fn test_missing_image_is_not_found() {
        let mut form = ImageForm::from_pairs(&[]);
        let err = form.take_required_image().unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Image file is required");
    }
}
