use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic type of a column or struct field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    String,
    Int64,
    Float64,
    Boolean,
    Timestamp,
    Decimal { precision: u8, scale: u8 },
    Struct(Vec<Field>),
}

impl DataType {
    pub fn decimal(precision: u8, scale: u8) -> Self {
        DataType::Decimal { precision, scale }
    }

    pub fn is_struct(&self) -> bool {
        matches!(self, DataType::Struct(_))
    }

    /// Child fields when this is a struct type
    pub fn struct_fields(&self) -> Option<&[Field]> {
        match self {
            DataType::Struct(fields) => Some(fields),
            _ => None,
        }
    }
}

/// A named, typed schema element. Within one struct the field names are
/// unique and their order is the order they were added in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: DataType,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Field {
            name: name.into(),
            data_type,
        }
    }
}

/// A dot-delimited path addressing a (possibly nested) column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldPath(pub String);

impl FieldPath {
    pub fn new(path: impl Into<String>) -> Self {
        FieldPath(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_nested(&self) -> bool {
        self.0.contains('.')
    }

    pub fn segments(&self) -> std::str::Split<'_, char> {
        self.0.split('.')
    }

    /// Split into the parent struct path and the leaf segment. A flat path
    /// has no parent.
    pub fn split(&self) -> (Option<FieldPath>, &str) {
        match self.0.rfind('.') {
            Some(idx) => (Some(FieldPath(self.0[..idx].to_string())), &self.0[idx + 1..]),
            None => (None, self.0.as_str()),
        }
    }

    /// Path addressing `name` one level below this path
    pub fn child(&self, name: &str) -> FieldPath {
        FieldPath(format!("{}.{}", self.0, name))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_flat_path() {
        let path = FieldPath::new("status");
        let (parent, leaf) = path.split();
        assert_eq!(parent, None);
        assert_eq!(leaf, "status");
        assert!(!path.is_nested());
    }

    #[test]
    fn test_split_nested_path() {
        let path = FieldPath::new("a.b.c$boolean");
        let (parent, leaf) = path.split();
        assert_eq!(parent, Some(FieldPath::new("a.b")));
        assert_eq!(leaf, "c$boolean");
        assert!(path.is_nested());
    }

    #[test]
    fn test_child() {
        let path = FieldPath::new("meta");
        assert_eq!(path.child("source$oid"), FieldPath::new("meta.source$oid"));
    }

    #[test]
    fn test_segments() {
        let path = FieldPath::new("a.b.c");
        let segments: Vec<&str> = path.segments().collect();
        assert_eq!(segments, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_struct_fields_accessor() {
        let dt = DataType::Struct(vec![Field::new("x", DataType::Int64)]);
        assert!(dt.is_struct());
        assert_eq!(dt.struct_fields().unwrap().len(), 1);
        assert_eq!(DataType::String.struct_fields(), None);
    }
}
