//! The table collaborator: schema introspection and column-level mutation.
//!
//! The unifier never touches storage directly. It sees a [`Table`] through
//! four primitives: look up a top-level column's type, list the top-level
//! column names, count a flat column's non-null values, and replace a
//! column with the result of a [`ColumnExpr`]. `with_column` has value
//! semantics: the receiver is left untouched and a new table is returned.
//!
//! [`JsonTable`] is the in-memory implementation over `serde_json` rows,
//! with schema inference for raw row ingestion.

use crate::error::TableError;
use crate::types::{DataType, Field, FieldPath};
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::io::Write;

/// Column expression evaluated row-by-row by `with_column`
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnExpr {
    /// Reference to an existing, possibly nested field
    Field(FieldPath),
    /// Null literal carrying the type the new column takes
    Null(DataType),
    /// Struct built from named child expressions, in order
    Struct(Vec<(String, ColumnExpr)>),
}

impl ColumnExpr {
    pub fn field(path: FieldPath) -> Self {
        ColumnExpr::Field(path)
    }

    pub fn null_of(data_type: DataType) -> Self {
        ColumnExpr::Null(data_type)
    }

    pub fn struct_of(children: Vec<(String, ColumnExpr)>) -> Self {
        ColumnExpr::Struct(children)
    }
}

/// The abstract table the unifier works against
pub trait Table: Sized {
    /// Type of a top-level column, or `None` if no such column exists
    fn column_type(&self, name: &str) -> Option<&DataType>;

    /// Top-level column names, in schema order
    fn column_names(&self) -> Vec<&str>;

    /// Number of rows holding a non-null value in a top-level column.
    /// A full scan; implementations may fail on transient faults.
    fn count_non_null(&self, name: &str) -> Result<u64, TableError>;

    /// Replace (or append) a top-level column with the evaluated
    /// expression, returning a new table. The receiver is untouched.
    fn with_column(&self, name: &str, expr: ColumnExpr) -> Result<Self, TableError>;
}

/// In-memory table of JSON object rows with an explicit schema.
///
/// The schema carries the type information JSON values cannot express on
/// their own (a null Int64 column vs a null String column), and its field
/// order is authoritative for struct children.
#[derive(Debug, Clone, Default)]
pub struct JsonTable {
    fields: Vec<Field>,
    rows: Vec<Map<String, Value>>,
}

impl JsonTable {
    /// Build a table from an explicit schema and matching rows. Rows are
    /// trusted to conform; no validation is performed.
    pub fn new(fields: Vec<Field>, rows: Vec<Map<String, Value>>) -> Self {
        JsonTable { fields, rows }
    }

    /// Build a table from raw rows, inferring the schema by accumulating
    /// over every value: first non-null scalar type wins, objects merge
    /// child-wise, a column that never holds a value comes out as string.
    pub fn from_rows(rows: Vec<Map<String, Value>>) -> Self {
        let mut root = TypeAccumulator::default();
        for row in &rows {
            root.add_object(row);
        }
        JsonTable {
            fields: root.into_fields(),
            rows,
        }
    }

    /// Build a table from JSON values, keeping object rows only
    pub fn from_values(values: Vec<Value>) -> Self {
        let rows = values
            .into_iter()
            .filter_map(|value| match value {
                Value::Object(obj) => Some(obj),
                _ => None,
            })
            .collect();
        Self::from_rows(rows)
    }

    pub fn schema(&self) -> &[Field] {
        &self.fields
    }

    pub fn rows(&self) -> &[Map<String, Value>] {
        &self.rows
    }

    /// Write the rows as newline-delimited JSON
    pub fn write_ndjson<W: Write>(&self, writer: &mut W) -> Result<()> {
        for row in &self.rows {
            let json = serde_json::to_string(row).context("Failed to serialize row")?;
            writeln!(writer, "{}", json).context("Failed to write row")?;
        }
        Ok(())
    }

    /// Resolve a dotted path against the schema tree
    fn resolve(&self, path: &FieldPath) -> Option<&DataType> {
        let mut segments = path.segments();
        let mut current = self.column_type(segments.next()?)?;
        for segment in segments {
            current = current
                .struct_fields()?
                .iter()
                .find(|field| field.name == segment)
                .map(|field| &field.data_type)?;
        }
        Some(current)
    }

    /// Type an expression against this table's schema
    fn expr_type(&self, expr: &ColumnExpr) -> Result<DataType, TableError> {
        match expr {
            ColumnExpr::Null(data_type) => Ok(data_type.clone()),
            ColumnExpr::Field(path) => self
                .resolve(path)
                .cloned()
                .ok_or_else(|| TableError::UnresolvedField(path.to_string())),
            ColumnExpr::Struct(children) => {
                let fields = children
                    .iter()
                    .map(|(name, child)| Ok(Field::new(name.clone(), self.expr_type(child)?)))
                    .collect::<Result<Vec<_>, TableError>>()?;
                Ok(DataType::Struct(fields))
            }
        }
    }
}

impl Table for JsonTable {
    fn column_type(&self, name: &str) -> Option<&DataType> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| &field.data_type)
    }

    fn column_names(&self) -> Vec<&str> {
        self.fields.iter().map(|field| field.name.as_str()).collect()
    }

    fn count_non_null(&self, name: &str) -> Result<u64, TableError> {
        let count = self
            .rows
            .iter()
            .filter(|row| !matches!(row.get(name), None | Some(Value::Null)))
            .count();
        Ok(count as u64)
    }

    fn with_column(&self, name: &str, expr: ColumnExpr) -> Result<Self, TableError> {
        let data_type = self.expr_type(&expr)?;

        // a replaced column keeps its position; a new one goes last
        let mut fields = self.fields.clone();
        match fields.iter().position(|field| field.name == name) {
            Some(idx) => fields[idx] = Field::new(name, data_type),
            None => fields.push(Field::new(name, data_type)),
        }

        let rows = self
            .rows
            .iter()
            .map(|row| {
                let value = eval_expr(row, &expr);
                let mut row = row.clone();
                row.insert(name.to_string(), value);
                row
            })
            .collect();

        Ok(JsonTable { fields, rows })
    }
}

/// Evaluate an expression against one row. Total: unresolvable field
/// references come out as null, matching the schema-level typing done in
/// `expr_type` up front.
fn eval_expr(row: &Map<String, Value>, expr: &ColumnExpr) -> Value {
    match expr {
        ColumnExpr::Null(_) => Value::Null,
        ColumnExpr::Field(path) => lookup(row, path).cloned().unwrap_or(Value::Null),
        ColumnExpr::Struct(children) => {
            let mut obj = Map::new();
            for (name, child) in children {
                obj.insert(name.clone(), eval_expr(row, child));
            }
            Value::Object(obj)
        }
    }
}

/// Walk a dotted path through nested row objects
fn lookup<'a>(row: &'a Map<String, Value>, path: &FieldPath) -> Option<&'a Value> {
    let mut segments = path.segments();
    let mut current = row.get(segments.next()?)?;
    for segment in segments {
        match current {
            Value::Object(obj) => current = obj.get(segment)?,
            _ => return None,
        }
    }
    Some(current)
}

/// Streaming type accumulator for schema inference over raw rows
#[derive(Debug, Default)]
struct TypeAccumulator {
    scalar: Option<DataType>,
    children: Option<Vec<(String, TypeAccumulator)>>,
}

impl TypeAccumulator {
    fn add_value(&mut self, value: &Value) {
        match value {
            Value::Null => {}
            Value::Object(obj) => self.add_object(obj),
            other => {
                if self.scalar.is_none() {
                    self.scalar = Some(scalar_type_of(other));
                }
            }
        }
    }

    fn add_object(&mut self, obj: &Map<String, Value>) {
        let children = self.children.get_or_insert_with(Vec::new);
        for (key, value) in obj {
            match children.iter_mut().find(|(name, _)| name == key) {
                Some((_, acc)) => acc.add_value(value),
                None => {
                    let mut acc = TypeAccumulator::default();
                    acc.add_value(value);
                    children.push((key.clone(), acc));
                }
            }
        }
    }

    fn build(self) -> DataType {
        // a field seen as both object and scalar comes out as a struct
        if let Some(children) = self.children {
            DataType::Struct(
                children
                    .into_iter()
                    .map(|(name, acc)| Field::new(name, acc.build()))
                    .collect(),
            )
        } else {
            self.scalar.unwrap_or(DataType::String)
        }
    }

    fn into_fields(self) -> Vec<Field> {
        match self.build() {
            DataType::Struct(fields) => fields,
            _ => Vec::new(),
        }
    }
}

fn scalar_type_of(value: &Value) -> DataType {
    match value {
        Value::Bool(_) => DataType::Boolean,
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                DataType::Int64
            } else {
                DataType::Float64
            }
        }
        // strings stay strings; arrays are carried opaquely, the schema
        // model has no list type
        _ => DataType::String,
    }
}
