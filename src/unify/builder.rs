//! Bottom-up struct construction for nested expected paths.

use crate::error::TableError;
use crate::table::{ColumnExpr, Table};
use crate::types::{DataType, Field, FieldPath};

/// Return a table where the struct column addressed by `struct_path`
/// contains `leaf_name` with type `leaf_type`.
///
/// Recursion runs from the leaf toward the top-level column, wrapping the
/// leaf in a fresh single-child struct type per level. Only the outermost
/// addressed struct keeps its existing children:
///
/// - top-level struct column: children are re-emitted in their original
///   order; the leaf is appended as a typed null only when no child
///   already has its name (an existing child is kept as-is, never
///   retyped);
/// - top-level scalar column: replaced wholesale by a single-field
///   struct, silently dropping the previous values;
/// - no such column: created as a single-field struct.
///
/// The wholesale scalar replacement is deliberate; callers who need the
/// old values must snapshot the table first.
pub fn ensure_struct_field<T: Table>(
    table: &T,
    struct_path: &FieldPath,
    leaf_name: &str,
    leaf_type: DataType,
) -> Result<T, TableError> {
    match struct_path.split() {
        (None, column) => {
            let expr = match table.column_type(column) {
                Some(DataType::Struct(existing)) => {
                    let column_path = FieldPath::new(column);
                    let mut children: Vec<(String, ColumnExpr)> = existing
                        .iter()
                        .map(|field| {
                            (
                                field.name.clone(),
                                ColumnExpr::field(column_path.child(&field.name)),
                            )
                        })
                        .collect();
                    if !existing.iter().any(|field| field.name == leaf_name) {
                        children.push((leaf_name.to_string(), ColumnExpr::null_of(leaf_type)));
                    }
                    ColumnExpr::struct_of(children)
                }
                // scalar column or no column at all
                _ => ColumnExpr::struct_of(vec![(
                    leaf_name.to_string(),
                    ColumnExpr::null_of(leaf_type),
                )]),
            };
            table.with_column(column, expr)
        }
        (Some(parent), last) => {
            let wrapped = DataType::Struct(vec![Field::new(leaf_name, leaf_type)]);
            ensure_struct_field(table, &parent, last, wrapped)
        }
    }
}
