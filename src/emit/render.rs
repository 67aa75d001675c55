//! Row-to-JSON rendering.
//!
//! [`row_to_json`] renders a row as one JSON object with keys in schema
//! order, omitting null columns entirely. [`value_to_json`] renders a
//! single value, honoring its construction-time classification: an
//! associative value becomes an object, while a sequence stays an array
//! even when its elements happen to look like key/value pairs.

use base64::prelude::BASE64_STANDARD;
use base64::Engine;

use crate::row::Row;
use crate::value::{Scalar, Value};

/// Renders one value as JSON.
#[must_use]
pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Scalar(scalar) => scalar_to_json(scalar),
        Value::Sequence(items) => {
            serde_json::Value::Array(items.iter().map(value_to_json).collect())
        }
        Value::Associative(pairs) => {
            let mut map = serde_json::Map::with_capacity(pairs.len());
            for (key, value) in pairs {
                map.insert(key.clone(), value_to_json(value));
            }
            serde_json::Value::Object(map)
        }
    }
}

fn scalar_to_json(scalar: &Scalar) -> serde_json::Value {
    match scalar {
        Scalar::Bool(b) => serde_json::Value::Bool(*b),
        Scalar::Int(n) => serde_json::Value::Number((*n).into()),
        Scalar::UInt(n) => serde_json::Value::Number((*n).into()),
        Scalar::Float(f) => serde_json::Number::from_f64(*f)
            .map_or(serde_json::Value::Null, serde_json::Value::Number),
        Scalar::String(s) => serde_json::Value::String(s.clone()),
        Scalar::Bytes(b) => serde_json::Value::String(BASE64_STANDARD.encode(b)),
        Scalar::Timestamp(ms) => match chrono::DateTime::from_timestamp_millis(*ms) {
            Some(dt) => serde_json::Value::String(dt.to_rfc3339()),
            None => serde_json::Value::Number((*ms).into()),
        },
    }
}

/// Renders one row as a JSON object, omitting null columns.
#[must_use]
pub fn row_to_json(row: &Row) -> serde_json::Value {
    let mut map = serde_json::Map::with_capacity(row.len());
    for (name, value) in row.entries() {
        if value.is_null() {
            continue;
        }
        map.insert(name.to_owned(), value_to_json(value));
    }
    serde_json::Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnDescriptor, ColumnType, RowSchema, SchemaRef};
    use serde_json::json;

    fn make_schema(names: &[&str]) -> SchemaRef {
        RowSchema::new(
            names
                .iter()
                .map(|n| ColumnDescriptor::new(*n, ColumnType::Int64))
                .collect(),
        )
        .into_ref()
    }

    #[test]
    fn test_sparse_rendering_omits_null_columns() {
        let row = Row::try_new(
            make_schema(&["a", "b"]),
            vec![Value::from(1i64), Value::Null],
        )
        .unwrap();
        assert_eq!(serde_json::to_string(&row_to_json(&row)).unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn test_keys_follow_schema_order() {
        let row = Row::try_new(
            make_schema(&["z", "a"]),
            vec![Value::from(1i64), Value::from(2i64)],
        )
        .unwrap();
        assert_eq!(
            serde_json::to_string(&row_to_json(&row)).unwrap(),
            r#"{"z":1,"a":2}"#
        );
    }

    #[test]
    fn test_associative_renders_as_object() {
        let value = Value::Associative(vec![("k".into(), Value::from(1i64))]);
        assert_eq!(value_to_json(&value), json!({"k": 1}));
    }

    #[test]
    fn test_sequence_of_pairs_stays_an_array() {
        let value = Value::Sequence(vec![Value::Sequence(vec![
            Value::from("k"),
            Value::from(1i64),
        ])]);
        assert_eq!(value_to_json(&value), json!([["k", 1]]));
    }

    #[test]
    fn test_bytes_render_as_base64() {
        let value = Value::from(b"hi".to_vec());
        assert_eq!(value_to_json(&value), json!("aGk="));
    }

    #[test]
    fn test_timestamp_renders_rfc3339() {
        let value = Value::Scalar(Scalar::Timestamp(0));
        assert_eq!(value_to_json(&value), json!("1970-01-01T00:00:00+00:00"));

        let value = Value::Scalar(Scalar::Timestamp(i64::MAX));
        assert_eq!(value_to_json(&value), json!(i64::MAX));
    }

    #[test]
    fn test_non_finite_float_renders_null() {
        assert_eq!(value_to_json(&Value::from(f64::NAN)), json!(null));
        assert_eq!(value_to_json(&Value::from(f64::INFINITY)), json!(null));
    }
}
