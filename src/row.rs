//! Schema-conformant rows.

use crate::error::{RowsetError, RowsetResult};
use crate::schema::SchemaRef;
use crate::value::Value;

/// A row: exactly one [`Value`] per schema column, in schema order.
///
/// Rows are always complete. A column the source document never mentioned
/// still has an entry, filled with the column's default during projection.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    schema: SchemaRef,
    values: Vec<Value>,
}

impl Row {
    /// Creates a row, validating that the value count matches the schema.
    ///
    /// # Errors
    ///
    /// Returns [`RowsetError::ColumnCountMismatch`] if `values` does not
    /// have exactly one entry per column.
    pub fn try_new(schema: SchemaRef, values: Vec<Value>) -> RowsetResult<Self> {
        if values.len() != schema.len() {
            return Err(RowsetError::ColumnCountMismatch {
                expected: schema.len(),
                actual: values.len(),
            });
        }
        Ok(Self { schema, values })
    }

    /// The schema this row conforms to.
    #[must_use]
    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// All values, in schema order.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// The value at column `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn value(&self, index: usize) -> &Value {
        &self.values[index]
    }

    /// Looks up a value by exact column name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema.column_index(name).map(|i| &self.values[i])
    }

    /// Number of values (equals the schema's column count).
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the row has no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates `(column name, value)` pairs in schema order.
    #[must_use]
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.schema
            .columns()
            .iter()
            .map(|c| c.name())
            .zip(self.values.iter())
    }
}
