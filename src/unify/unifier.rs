//! The unification pass: one left-to-right fold over the expected paths.

use crate::error::UnifyError;
use crate::table::{ColumnExpr, Table};
use crate::types::{DataType, FieldPath};
use crate::unify::{builder, infer, oracle};

/// Reconcile `table` against `expected_paths`.
///
/// Every expected path that is missing, or present without a single
/// non-null value, is added as a null-filled column: nested paths get a
/// suffix-inferred leaf type inside a struct chain, flat paths become
/// plain string columns regardless of suffix. Paths are processed in
/// order and each step's output feeds the next, so later paths observe
/// the columns earlier paths created.
///
/// The first table failure aborts the whole pass with the offending path
/// attached; the intermediate table is dropped, so callers treat their
/// input as authoritative after an error.
pub fn unify<T: Table>(mut table: T, expected_paths: &[FieldPath]) -> Result<T, UnifyError> {
    for path in expected_paths {
        if !oracle::is_missing(&table, path) {
            continue;
        }

        table = match path.split() {
            (Some(parent), leaf) => {
                let leaf_type = infer::leaf_type(leaf);
                builder::ensure_struct_field(&table, &parent, leaf, leaf_type)
            }
            // flat columns are always strings; the suffix table only
            // applies to nested leaves
            (None, name) => table.with_column(name, ColumnExpr::null_of(DataType::String)),
        }
        .map_err(|source| UnifyError {
            path: path.clone(),
            source,
        })?;
    }

    Ok(table)
}
