//! Leaf-name type inference from BSON-style suffix conventions.

use crate::types::DataType;
use once_cell::sync::Lazy;

/// Suffix rules, checked in order; first match wins.
static SUFFIX_RULES: Lazy<Vec<(&'static str, DataType)>> = Lazy::new(|| {
    vec![
        ("$numberDecimal", DataType::decimal(18, 3)),
        ("$numberLong", DataType::Int64),
        // dates are epoch-encoded integers, not a calendar type
        ("$date", DataType::Int64),
        ("$oid", DataType::String),
        ("$boolean", DataType::Boolean),
        ("$timestamp", DataType::Timestamp),
    ]
});

/// Infer the semantic type of a leaf field from its name.
///
/// Total: anything without a recognized suffix is a string.
pub fn leaf_type(leaf_name: &str) -> DataType {
    SUFFIX_RULES
        .iter()
        .find(|(suffix, _)| leaf_name.ends_with(suffix))
        .map(|(_, data_type)| data_type.clone())
        .unwrap_or(DataType::String)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_table() {
        assert_eq!(leaf_type("x$numberDecimal"), DataType::decimal(18, 3));
        assert_eq!(leaf_type("x$numberLong"), DataType::Int64);
        assert_eq!(leaf_type("x$date"), DataType::Int64);
        assert_eq!(leaf_type("x$oid"), DataType::String);
        assert_eq!(leaf_type("x$boolean"), DataType::Boolean);
        assert_eq!(leaf_type("x$timestamp"), DataType::Timestamp);
    }

    #[test]
    fn test_default_is_string() {
        assert_eq!(leaf_type("x"), DataType::String);
        assert_eq!(leaf_type("x$unknown"), DataType::String);
        assert_eq!(leaf_type(""), DataType::String);
    }

    #[test]
    fn test_suffix_must_be_terminal() {
        // the marker has to end the name to count
        assert_eq!(leaf_type("x$oid_backup"), DataType::String);
    }
}
