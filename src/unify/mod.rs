//! Schema unification - reconcile a table against expected field paths
//!
//! Rows that originate from heterogeneous document sources rarely agree on
//! shape: one export carries `meta.source$oid`, the next never saw a
//! `meta` object at all. This module makes a fixed downstream schema safe
//! to read by adding a null-filled column for every expected path that is
//! absent or holds no value, with the leaf type inferred from BSON-style
//! name suffixes.
//!
//! The pass is a single left-to-right fold: each path's decision sees the
//! columns earlier paths created.

pub mod builder;
pub mod infer;
pub mod oracle;
pub mod unifier;

pub use builder::ensure_struct_field;
pub use infer::leaf_type;
pub use oracle::is_missing;
pub use unifier::unify;
