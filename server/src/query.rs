//! Helpers shared by list endpoints: sort direction and text filters.

use serde::Deserialize;
use utoipa::ToSchema;

/// Sort direction
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending (oldest/lowest first)
    #[default]
    Asc,
    /// Descending (newest/highest first)
    Desc,
}

impl SortOrder {
    pub fn is_desc(&self) -> bool {
        matches!(self, SortOrder::Desc)
    }
}

/// `%text%` for a case-insensitive substring match, with LIKE wildcards escaped.
/// Blank input yields `None`.
pub fn contains_pattern(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Some(format!(
        "%{}%",
        text.replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_")
    ))
}

/// Lower-cased, trimmed, non-empty items of a comma-separated list.
pub fn split_csv_lower(list: &str) -> Vec<String> {
    list.split(',')
        .map(|item| item.trim().to_lowercase())
        .filter(|item| !item.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::extract::Query;
    use axum::http::Uri;

    #[derive(Debug, Deserialize)]
    struct Params {
        #[serde(default)]
        order: SortOrder,
    }

    fn parse(query: &str) -> Result<Params, String> {
        let uri: Uri = format!("/cocktails?{}", query).parse().unwrap();
        Query::<Params>::try_from_uri(&uri)
            .map(|Query(p)| p)
            .map_err(|e| e.body_text())
    }

    #[test]
    fn test_order_defaults_to_asc() {
        let params = parse("").unwrap();
        assert_eq!(params.order, SortOrder::Asc);

        let params = parse("order=desc").unwrap();
        assert!(params.order.is_desc());
    }

    #[test]
    fn test_order_rejects_unknown_values() {
        assert!(parse("order=sideways").is_err());
        assert!(parse("order=DESC").is_err());
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("gin"), Some("%gin%".to_string()));
        assert_eq!(contains_pattern(" 100%_"), Some("%100\\%\\_%".to_string()));
        assert_eq!(contains_pattern("   "), None);
    }

    #[test]
    fn test_split_csv_lower() {
        assert_eq!(
            split_csv_lower("Vodka, lime juice,,  MINT "),
            vec!["vodka", "lime juice", "mint"]
        );
        assert!(split_csv_lower(" , ").is_empty());
    }
}
