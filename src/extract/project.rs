//! Row projection.

use crate::error::RowsetResult;
use crate::extract::coerce::{coerce_field, BytesProjection};
use crate::extract::select::ObjectNode;
use crate::row::Row;
use crate::schema::SchemaRef;

/// Projects one object node onto the schema.
///
/// Columns are visited in schema order and looked up by exact name, so
/// the row always carries one value per column: matched fields coerce,
/// unmatched columns take their defaults, and extra members in the
/// object are ignored.
///
/// # Errors
///
/// Returns [`crate::RowsetError::Conversion`] from the first column whose
/// value cannot be coerced.
pub fn project_row(
    obj: &ObjectNode,
    schema: &SchemaRef,
    bytes: BytesProjection,
) -> RowsetResult<Row> {
    let mut values = Vec::with_capacity(schema.len());
    for column in schema.columns() {
        values.push(coerce_field(obj.get(column.name()), column, bytes)?);
    }
    Row::try_new(schema.clone(), values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RowsetError;
    use crate::schema::{ColumnDescriptor, ColumnType, RowSchema};
    use crate::value::Value;

    fn make_schema() -> SchemaRef {
        RowSchema::new(vec![
            ColumnDescriptor::new("id", ColumnType::Int64),
            ColumnDescriptor::new("name", ColumnType::String).with_default(""),
        ])
        .into_ref()
    }

    fn object(text: &str) -> ObjectNode {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn test_projects_in_schema_order() {
        let schema = make_schema();
        let obj = object(r#"{"name": "a", "id": 3, "extra": true}"#);
        let row = project_row(&obj, &schema, BytesProjection::Normal).unwrap();
        assert_eq!(row.len(), 2);
        assert_eq!(*row.value(0), Value::from(3i64));
        assert_eq!(*row.value(1), Value::from("a"));
    }

    #[test]
    fn test_unmatched_columns_take_defaults() {
        let schema = make_schema();
        let obj = object(r#"{"id": 1}"#);
        let row = project_row(&obj, &schema, BytesProjection::Normal).unwrap();
        assert_eq!(*row.value(1), Value::from(""));

        let obj = object("{}");
        let row = project_row(&obj, &schema, BytesProjection::Normal).unwrap();
        assert_eq!(*row.value(0), Value::Null);
        assert_eq!(*row.value(1), Value::from(""));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let schema = make_schema();
        let obj = object(r#"{"ID": 9}"#);
        let row = project_row(&obj, &schema, BytesProjection::Normal).unwrap();
        assert_eq!(*row.value(0), Value::Null);
    }

    #[test]
    fn test_conversion_failure_propagates() {
        let schema = make_schema();
        let obj = object(r#"{"id": {"nested": 1}}"#);
        let err = project_row(&obj, &schema, BytesProjection::Normal).unwrap_err();
        assert!(matches!(err, RowsetError::Conversion { ref column, .. } if column == "id"));
    }
}
