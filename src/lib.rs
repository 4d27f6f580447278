//! # Anneal - Schema Unification for Semi-Structured JSON Tables
//!
//! A library for reconciling the schema of JSON/BSON-style row data
//! against a list of expected field paths. Rows exported from flexible
//! document stores rarely agree on shape; consumers written against a
//! fixed schema do. Anneal closes the gap by adding a null-filled column
//! for every expected path that is absent or holds no value, with leaf
//! types inferred from BSON-style name suffixes (`$oid`, `$numberLong`,
//! `$date`, ...).
//!
//! ## Modules
//!
//! - **table**: the table boundary - a column-expression language, the
//!   [`Table`] trait, and the in-memory [`JsonTable`]
//! - **unify**: the reconciliation pass - suffix type inference, nested
//!   struct construction, emptiness detection, and the unifier itself
//!
//! ## Quick Start
//!
//! ```rust
//! use anneal::{unify, FieldPath, JsonTable, Table};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), anneal::UnifyError> {
//! let table = JsonTable::from_values(vec![
//!     json!({"order_id": "A-1", "amount": {"value$numberDecimal": "10.500"}}),
//!     json!({"order_id": "A-2"}),
//! ]);
//!
//! let expected = vec![
//!     FieldPath::new("order_id"),
//!     FieldPath::new("status"),
//!     FieldPath::new("amount.value$numberDecimal"),
//!     FieldPath::new("amount.currency$oid"),
//! ];
//!
//! let unified = unify(table, &expected)?;
//!
//! // every expected path is now present; missing ones are null-filled
//! assert!(unified.column_names().contains(&"status"));
//! assert_eq!(unified.rows()[1]["amount"]["value$numberDecimal"], serde_json::Value::Null);
//! # Ok(())
//! # }
//! ```
//!
//! ## Type inference
//!
//! ```rust
//! use anneal::{leaf_type, DataType};
//!
//! assert_eq!(leaf_type("created$date"), DataType::Int64);
//! assert_eq!(leaf_type("total$numberDecimal"), DataType::decimal(18, 3));
//! assert_eq!(leaf_type("note"), DataType::String);
//! ```

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};
use std::io::BufRead;

pub mod error;
pub mod table;
pub mod types;
pub mod unify;

// Re-export commonly used items for convenience
pub use error::{TableError, UnifyError};
pub use table::{ColumnExpr, JsonTable, Table};
pub use types::{DataType, Field, FieldPath};
pub use unify::{ensure_struct_field, is_missing, leaf_type, unify};

/// Main entry point: read NDJSON rows and unify them against expected paths
pub fn unify_ndjson<R: BufRead>(reader: R, expected_paths: &[FieldPath]) -> Result<JsonTable> {
    let mut rows: Vec<Map<String, Value>> = Vec::new();

    for line in reader.lines() {
        let line = line.context("Failed to read line")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line).context("Failed to parse JSON")?;
        match value {
            Value::Object(obj) => rows.push(obj),
            other => bail!("expected a JSON object per line, got: {}", other),
        }
    }

    let table = JsonTable::from_rows(rows);
    let unified = unify::unify(table, expected_paths)?;
    Ok(unified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_basic_unification() {
        let input = concat!(
            "{\"id\": 1, \"meta\": {\"source$oid\": \"abc\"}}\n",
            "{\"id\": 2}\n",
        );

        let expected = vec![
            FieldPath::new("id"),
            FieldPath::new("status"),
            FieldPath::new("meta.source$oid"),
            FieldPath::new("meta.ingested$timestamp"),
        ];

        let table = unify_ndjson(Cursor::new(input), &expected).unwrap();

        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.column_type("status"), Some(&DataType::String));
        assert_eq!(
            table.column_type("meta"),
            Some(&DataType::Struct(vec![
                Field::new("source$oid", DataType::String),
                Field::new("ingested$timestamp", DataType::Timestamp),
            ]))
        );
    }

    #[test]
    fn test_non_object_line_is_rejected() {
        let expected = vec![FieldPath::new("id")];
        let err = unify_ndjson(Cursor::new("[1, 2, 3]\n"), &expected).unwrap_err();
        assert!(err.to_string().contains("expected a JSON object"));
    }
}
