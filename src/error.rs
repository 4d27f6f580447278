use crate::types::FieldPath;
use thiserror::Error;

/// Errors surfaced by a table implementation
#[derive(Debug, Error)]
pub enum TableError {
    /// A column expression referenced a field the schema does not contain
    #[error("unresolved field `{0}`")]
    UnresolvedField(String),

    /// The engine rejected a column replacement
    #[error("column replacement rejected: {0}")]
    MutationRejected(String),

    /// The non-null scan behind the emptiness check failed
    #[error("column scan failed: {0}")]
    ScanFailed(String),
}

/// A unification pass failed while processing one expected path. The rest
/// of the pass is abandoned; no partially unified table is returned.
#[derive(Debug, Error)]
#[error("failed to unify `{path}`")]
pub struct UnifyError {
    pub path: FieldPath,
    #[source]
    pub source: TableError,
}
