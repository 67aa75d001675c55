//! Row schema definitions.
//!
//! A [`RowSchema`] is an ordered list of [`ColumnDescriptor`]s. Projection
//! always produces exactly one value per column, in declaration order, so
//! the schema is the single source of truth for row shape on both the
//! extraction and emission sides. Schemas are shared via [`SchemaRef`].

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Shared handle to an immutable schema.
pub type SchemaRef = Arc<RowSchema>;

/// The type of a single schema column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Boolean.
    Bool,
    /// Signed 8-bit integer.
    Int8,
    /// Signed 16-bit integer.
    Int16,
    /// Signed 32-bit integer.
    Int32,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 8-bit integer.
    UInt8,
    /// Unsigned 16-bit integer.
    UInt16,
    /// Unsigned 32-bit integer.
    UInt32,
    /// Unsigned 64-bit integer.
    UInt64,
    /// 32-bit floating point.
    Float32,
    /// 64-bit floating point.
    Float64,
    /// UTF-8 string.
    String,
    /// Raw byte buffer.
    Bytes,
    /// Millisecond-precision timestamp.
    Timestamp,
    /// Ordered sequence of values.
    List,
    /// Ordered key/value mapping.
    Map,
}

impl ColumnType {
    /// Returns the lowercase name of the type.
    #[must_use]
    pub fn type_name(self) -> &'static str {
        match self {
            ColumnType::Bool => "bool",
            ColumnType::Int8 => "int8",
            ColumnType::Int16 => "int16",
            ColumnType::Int32 => "int32",
            ColumnType::Int64 => "int64",
            ColumnType::UInt8 => "uint8",
            ColumnType::UInt16 => "uint16",
            ColumnType::UInt32 => "uint32",
            ColumnType::UInt64 => "uint64",
            ColumnType::Float32 => "float32",
            ColumnType::Float64 => "float64",
            ColumnType::String => "string",
            ColumnType::Bytes => "bytes",
            ColumnType::Timestamp => "timestamp",
            ColumnType::List => "list",
            ColumnType::Map => "map",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A single named, typed column with a default value.
///
/// The default is substituted whenever the source document has no usable
/// value for the column: the field is absent, explicitly `null`, or a
/// conversion legitimately produced nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor {
    name: String,
    column_type: ColumnType,
    default: Value,
}

impl ColumnDescriptor {
    /// Creates a column with a [`Value::Null`] default.
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            default: Value::Null,
        }
    }

    /// Sets the value substituted for absent or null fields.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = default.into();
        self
    }

    /// The column's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The column's declared type.
    #[must_use]
    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    /// The default substituted when the source has no value.
    #[must_use]
    pub fn default_value(&self) -> &Value {
        &self.default
    }
}

/// An ordered collection of columns.
#[derive(Debug, Clone, PartialEq)]
pub struct RowSchema {
    columns: Vec<ColumnDescriptor>,
}

impl RowSchema {
    /// Creates a schema from columns in projection order.
    #[must_use]
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        Self { columns }
    }

    /// Wraps the schema in a shared [`SchemaRef`].
    #[must_use]
    pub fn into_ref(self) -> SchemaRef {
        Arc::new(self)
    }

    /// All columns, in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the schema has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Finds a column's position by exact, case-sensitive name.
    ///
    /// O(n) lookup. For typical schemas (tens of columns) a linear scan
    /// beats a map.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// The column at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn column(&self, index: usize) -> &ColumnDescriptor {
        &self.columns[index]
    }
}
