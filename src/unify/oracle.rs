//! Decides whether an expected path needs (re-)construction.

use crate::table::Table;
use crate::types::FieldPath;

/// True when `path` should be built: the column is absent, or present with
/// no non-null value in any row.
///
/// Nested paths are always reported missing. Existence is only tracked for
/// top-level column names, so every dotted path is rebuilt on every pass:
/// idempotent in the shape it produces, not in the work it skips.
pub fn is_missing<T: Table>(table: &T, path: &FieldPath) -> bool {
    if path.is_nested() {
        return true;
    }

    let name = path.as_str();
    if !table.column_names().iter().any(|column| *column == name) {
        return true;
    }

    match table.count_non_null(name) {
        Ok(non_null) => non_null == 0,
        // fail closed: a failed scan reports the column as populated, so a
        // transient fault never triggers a rebuild
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TableError;
    use crate::table::{ColumnExpr, JsonTable};
    use crate::types::DataType;
    use serde_json::json;

    #[test]
    fn test_absent_flat_column_is_missing() {
        let t = JsonTable::from_values(vec![json!({"id": 1})]);
        assert!(is_missing(&t, &FieldPath::new("status")));
    }

    #[test]
    fn test_all_null_flat_column_is_missing() {
        let t = JsonTable::from_values(vec![json!({"status": null}), json!({"status": null})]);
        assert!(is_missing(&t, &FieldPath::new("status")));
    }

    #[test]
    fn test_populated_flat_column_is_not_missing() {
        let t = JsonTable::from_values(vec![json!({"status": null}), json!({"status": "ok"})]);
        assert!(!is_missing(&t, &FieldPath::new("status")));
    }

    #[test]
    fn test_nested_path_is_always_missing() {
        // the nested leaf exists and holds data, and is still reported
        // missing: only top-level names are consulted
        let t = JsonTable::from_values(vec![json!({"meta": {"source": "s3"}})]);
        assert!(is_missing(&t, &FieldPath::new("meta.source")));
    }

    /// Table whose non-null scan always fails
    struct FlakyScans(JsonTable);

    impl Table for FlakyScans {
        fn column_type(&self, name: &str) -> Option<&DataType> {
            self.0.column_type(name)
        }

        fn column_names(&self) -> Vec<&str> {
            self.0.column_names()
        }

        fn count_non_null(&self, _name: &str) -> Result<u64, TableError> {
            Err(TableError::ScanFailed("connection reset".to_string()))
        }

        fn with_column(&self, name: &str, expr: ColumnExpr) -> Result<Self, TableError> {
            Ok(FlakyScans(self.0.with_column(name, expr)?))
        }
    }

    #[test]
    fn test_scan_failure_reports_column_as_populated() {
        // the column is entirely null, but the scan cannot prove it
        let t = FlakyScans(JsonTable::from_values(vec![json!({"status": null})]));
        assert!(!is_missing(&t, &FieldPath::new("status")));
    }
}
