//! List filter parsing.
//!
//! A filter specification is a JSON object mapping field names to lists of
//! values, e.g. `{"name": ["web"], "id": ["3f2a"]}`. The query service
//! interprets `name` and `id`; unknown fields parse fine and are carried
//! through untouched.

use std::collections::HashMap;

use corral_common::{CorralError, CorralResult};

/// Parsed filter specification: field name to requested values.
pub type Filters = HashMap<String, Vec<String>>;

/// Parse a raw filter specification.
///
/// An empty or whitespace-only specification yields an empty map.
///
/// # Errors
///
/// Returns [`CorralError::InvalidFilter`] when the specification is not a
/// well-formed JSON object of string lists.
pub fn parse_filters(raw: &str) -> CorralResult<Filters> {
    if raw.trim().is_empty() {
        return Ok(Filters::new());
    }

    serde_json::from_str(raw).map_err(|e| CorralError::InvalidFilter {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_spec_yields_empty_map() {
        assert!(parse_filters("").unwrap().is_empty());
        assert!(parse_filters("   ").unwrap().is_empty());
    }

    #[test]
    fn parses_name_and_id_fields() {
        let filters = parse_filters(r#"{"name": ["web", "db"], "id": ["3f2a"]}"#).unwrap();
        assert_eq!(filters["name"], vec!["web", "db"]);
        assert_eq!(filters["id"], vec!["3f2a"]);
    }

    #[test]
    fn unknown_fields_are_carried_through() {
        let filters = parse_filters(r#"{"dangling": ["true"]}"#).unwrap();
        assert_eq!(filters["dangling"], vec!["true"]);
    }

    #[test]
    fn malformed_spec_is_rejected() {
        let err = parse_filters("{not json").unwrap_err();
        assert!(matches!(err, CorralError::InvalidFilter { .. }));

        let err = parse_filters(r#"{"name": "web"}"#).unwrap_err();
        assert!(matches!(err, CorralError::InvalidFilter { .. }));
    }

    proptest! {
        #[test]
        fn never_panics_on_arbitrary_input(raw in ".*") {
            let _ = parse_filters(&raw);
        }

        #[test]
        fn accepts_any_well_formed_spec(
            spec in proptest::collection::hash_map(
                "[a-z]{1,8}",
                proptest::collection::vec("[a-zA-Z0-9_-]{0,12}", 0..4),
                0..4,
            )
        ) {
            let raw = serde_json::to_string(&spec).unwrap();
            let parsed = parse_filters(&raw).unwrap();
            prop_assert_eq!(parsed, spec);
        }
    }
}
