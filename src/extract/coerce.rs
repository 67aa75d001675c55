//! JSON-to-column value coercion.
//!
//! [`coerce_field`] turns one optional JSON node into the [`Value`] for a
//! single schema column:
//!
//! - **Absent or null** fields produce the column default.
//! - **Lenient repairs** are attempted first: numeric strings parse into
//!   numeric columns, integral floats narrow into integer columns, and
//!   any node renders into a string column.
//! - **Irreparable mismatches** (an object where an integer is expected,
//!   an out-of-range number) fail with [`RowsetError::Conversion`] naming
//!   the column.
//!
//! Byte columns honor a [`BytesProjection`] mode: decode an encoded
//! payload, capture the node's raw string rendering, or capture that
//! rendering gzip-compressed.

use std::io::Write;

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};

use crate::error::{RowsetError, RowsetResult};
use crate::schema::{ColumnDescriptor, ColumnType};
use crate::value::{Scalar, Value};

/// How a JSON node is projected into a [`ColumnType::Bytes`] column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BytesProjection {
    /// Decode an encoded payload: a base64 string or an array of byte
    /// values (default).
    Normal,
    /// The UTF-8 bytes of the node's raw string rendering.
    BytesString,
    /// The gzip compression of the node's raw string rendering.
    BytesStringCompressed,
}

/// Converts one optional JSON field into a column value.
///
/// An absent or null field yields the column default, as does a
/// conversion that legitimately produces no value (for example a
/// timestamp outside the representable range). Everything else either
/// converts or fails.
///
/// # Errors
///
/// Returns [`RowsetError::Conversion`] when the node cannot be coerced
/// to the column's type.
pub fn coerce_field(
    field: Option<&serde_json::Value>,
    column: &ColumnDescriptor,
    bytes: BytesProjection,
) -> RowsetResult<Value> {
    let node = match field {
        Some(n) if !n.is_null() => n,
        _ => return Ok(column.default_value().clone()),
    };
    let converted =
        convert_node(node, column, bytes).map_err(|message| RowsetError::Conversion {
            column: column.name().to_owned(),
            expected: column.column_type(),
            message,
        })?;
    if converted.is_null() {
        return Ok(column.default_value().clone());
    }
    Ok(converted)
}

fn convert_node(
    node: &serde_json::Value,
    column: &ColumnDescriptor,
    bytes: BytesProjection,
) -> Result<Value, String> {
    match column.column_type() {
        ColumnType::Bool => extract_bool(node).map(|b| Value::Scalar(Scalar::Bool(b))),
        ColumnType::Int8 => {
            int_in_range(node, i64::from(i8::MIN), i64::from(i8::MAX), ColumnType::Int8)
        }
        ColumnType::Int16 => int_in_range(
            node,
            i64::from(i16::MIN),
            i64::from(i16::MAX),
            ColumnType::Int16,
        ),
        ColumnType::Int32 => int_in_range(
            node,
            i64::from(i32::MIN),
            i64::from(i32::MAX),
            ColumnType::Int32,
        ),
        ColumnType::Int64 => extract_i64(node).map(|n| Value::Scalar(Scalar::Int(n))),
        ColumnType::UInt8 => uint_in_range(node, u64::from(u8::MAX), ColumnType::UInt8),
        ColumnType::UInt16 => uint_in_range(node, u64::from(u16::MAX), ColumnType::UInt16),
        ColumnType::UInt32 => uint_in_range(node, u64::from(u32::MAX), ColumnType::UInt32),
        ColumnType::UInt64 => extract_u64(node).map(|n| Value::Scalar(Scalar::UInt(n))),
        ColumnType::Float32 => extract_f64(node).map(|f| {
            #[allow(clippy::cast_possible_truncation)]
            let narrowed = f as f32;
            Value::Scalar(Scalar::Float(f64::from(narrowed)))
        }),
        ColumnType::Float64 => extract_f64(node).map(|f| Value::Scalar(Scalar::Float(f))),
        ColumnType::String => Ok(Value::Scalar(Scalar::String(value_to_string(node)))),
        ColumnType::Bytes => {
            bytes_from_node(node, bytes).map(|b| Value::Scalar(Scalar::Bytes(b)))
        }
        ColumnType::Timestamp => extract_timestamp(node).map(|ts| match ts {
            Some(ms) => Value::Scalar(Scalar::Timestamp(ms)),
            None => Value::Null,
        }),
        ColumnType::List => match node {
            serde_json::Value::Array(_) => Ok(Value::from_json(node)),
            other => Err(format!("expected array, got {}", json_type_name(other))),
        },
        ColumnType::Map => match node {
            serde_json::Value::Object(_) => Ok(Value::from_json(node)),
            other => Err(format!("expected object, got {}", json_type_name(other))),
        },
    }
}

fn int_in_range(
    node: &serde_json::Value,
    min: i64,
    max: i64,
    ty: ColumnType,
) -> Result<Value, String> {
    let n = extract_i64(node)?;
    if n < min || n > max {
        return Err(format!("integer {n} out of {ty} range"));
    }
    Ok(Value::Scalar(Scalar::Int(n)))
}

fn uint_in_range(node: &serde_json::Value, max: u64, ty: ColumnType) -> Result<Value, String> {
    let n = extract_u64(node)?;
    if n > max {
        return Err(format!("integer {n} out of {ty} range"));
    }
    Ok(Value::Scalar(Scalar::UInt(n)))
}

fn extract_i64(node: &serde_json::Value) -> Result<i64, String> {
    if let Some(n) = node.as_i64() {
        return Ok(n);
    }
    if let Some(n) = node.as_u64() {
        return i64::try_from(n).map_err(|_| format!("u64 {n} out of i64 range"));
    }
    if let Some(f) = node.as_f64() {
        return float_to_i64(f);
    }
    if let Some(s) = node.as_str() {
        return s
            .parse()
            .map_err(|_| format!("cannot parse integer from string: {s:?}"));
    }
    Err(format!("expected integer, got {}", json_type_name(node)))
}

fn extract_u64(node: &serde_json::Value) -> Result<u64, String> {
    if let Some(n) = node.as_u64() {
        return Ok(n);
    }
    if let Some(n) = node.as_i64() {
        return u64::try_from(n).map_err(|_| format!("integer {n} out of u64 range"));
    }
    if let Some(f) = node.as_f64() {
        return float_to_u64(f);
    }
    if let Some(s) = node.as_str() {
        return s
            .parse()
            .map_err(|_| format!("cannot parse integer from string: {s:?}"));
    }
    Err(format!("expected integer, got {}", json_type_name(node)))
}

fn extract_f64(node: &serde_json::Value) -> Result<f64, String> {
    if let Some(f) = node.as_f64() {
        return Ok(f);
    }
    if let Some(s) = node.as_str() {
        return s
            .parse()
            .map_err(|_| format!("cannot parse float from string: {s:?}"));
    }
    Err(format!("expected number, got {}", json_type_name(node)))
}

fn extract_bool(node: &serde_json::Value) -> Result<bool, String> {
    if let Some(b) = node.as_bool() {
        return Ok(b);
    }
    if let Some(s) = node.as_str() {
        return match s.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(format!("cannot parse boolean from string: {s:?}")),
        };
    }
    if let Some(n) = node.as_i64() {
        return Ok(n != 0);
    }
    Err(format!("expected boolean, got {}", json_type_name(node)))
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn float_to_i64(f: f64) -> Result<i64, String> {
    if !f.is_finite() || f.fract() != 0.0 {
        return Err(format!("float {f} is not a whole number"));
    }
    if f < (i64::MIN as f64) || f >= (i64::MAX as f64) {
        return Err(format!("float {f} out of integer range"));
    }
    Ok(f as i64)
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn float_to_u64(f: f64) -> Result<u64, String> {
    if !f.is_finite() || f.fract() != 0.0 {
        return Err(format!("float {f} is not a whole number"));
    }
    if f < 0.0 || f >= (u64::MAX as f64) {
        return Err(format!("float {f} out of integer range"));
    }
    Ok(f as u64)
}

/// Renders a node for string-typed consumption. Strings pass through
/// unquoted; everything else uses its JSON text.
fn value_to_string(node: &serde_json::Value) -> String {
    match node {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_type_name(node: &serde_json::Value) -> &'static str {
    match node {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// `Ok(None)` means the instant cannot be represented and the column
/// default applies.
fn extract_timestamp(node: &serde_json::Value) -> Result<Option<i64>, String> {
    if let Some(ms) = node.as_i64() {
        return Ok(representable_millis(ms));
    }
    if let Some(f) = node.as_f64() {
        let ms = float_to_i64(f)?;
        return Ok(representable_millis(ms));
    }
    if let Some(s) = node.as_str() {
        return chrono::DateTime::parse_from_rfc3339(s)
            .map(|dt| Some(dt.timestamp_millis()))
            .map_err(|_| format!("cannot parse timestamp from string: {s:?}"));
    }
    Err(format!("expected timestamp, got {}", json_type_name(node)))
}

fn representable_millis(ms: i64) -> Option<i64> {
    chrono::DateTime::from_timestamp_millis(ms).map(|_| ms)
}

fn bytes_from_node(node: &serde_json::Value, mode: BytesProjection) -> Result<Vec<u8>, String> {
    match mode {
        BytesProjection::Normal => decode_encoded_bytes(node),
        BytesProjection::BytesString => Ok(value_to_string(node).into_bytes()),
        BytesProjection::BytesStringCompressed => gzip_bytes(value_to_string(node).as_bytes()),
    }
}

fn decode_encoded_bytes(node: &serde_json::Value) -> Result<Vec<u8>, String> {
    if let Some(s) = node.as_str() {
        return BASE64_STANDARD
            .decode(s)
            .map_err(|e| format!("invalid base64: {e}"));
    }
    if let Some(items) = node.as_array() {
        let mut bytes = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let n = item
                .as_u64()
                .filter(|n| *n <= u64::from(u8::MAX))
                .ok_or_else(|| format!("byte array element {i} is not in 0..=255"))?;
            #[allow(clippy::cast_possible_truncation)]
            bytes.push(n as u8);
        }
        return Ok(bytes);
    }
    Err(format!(
        "expected base64 string or byte array, got {}",
        json_type_name(node)
    ))
}

fn gzip_bytes(data: &[u8]) -> Result<Vec<u8>, String> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| format!("gzip failed: {e}"))?;
    encoder.finish().map_err(|e| format!("gzip failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn coerce(node: &serde_json::Value, ty: ColumnType) -> RowsetResult<Value> {
        coerce_field(
            Some(node),
            &ColumnDescriptor::new("c", ty),
            BytesProjection::Normal,
        )
    }

    #[test]
    fn test_absent_and_null_use_default() {
        let col = ColumnDescriptor::new("n", ColumnType::Int64).with_default(7i64);
        assert_eq!(
            coerce_field(None, &col, BytesProjection::Normal).unwrap(),
            Value::from(7i64)
        );
        assert_eq!(
            coerce_field(Some(&serde_json::Value::Null), &col, BytesProjection::Normal).unwrap(),
            Value::from(7i64)
        );
    }

    #[test]
    fn test_absent_bytes_default_under_every_mode() {
        let col = ColumnDescriptor::new("b", ColumnType::Bytes).with_default(vec![9u8]);
        for mode in [
            BytesProjection::Normal,
            BytesProjection::BytesString,
            BytesProjection::BytesStringCompressed,
        ] {
            assert_eq!(
                coerce_field(None, &col, mode).unwrap(),
                Value::from(vec![9u8])
            );
            assert_eq!(
                coerce_field(Some(&serde_json::Value::Null), &col, mode).unwrap(),
                Value::from(vec![9u8])
            );
        }
    }

    #[test]
    fn test_integer_paths() {
        assert_eq!(coerce(&json!(42), ColumnType::Int64).unwrap(), Value::from(42i64));
        assert_eq!(coerce(&json!("42"), ColumnType::Int64).unwrap(), Value::from(42i64));
        assert_eq!(coerce(&json!(42.0), ColumnType::Int64).unwrap(), Value::from(42i64));
        assert_eq!(
            coerce(&json!(u64::MAX), ColumnType::UInt64).unwrap(),
            Value::from(u64::MAX)
        );
    }

    #[test]
    fn test_narrow_integer_range() {
        assert_eq!(
            coerce(&json!(-128), ColumnType::Int8).unwrap(),
            Value::from(-128i64)
        );
        let err = coerce(&json!(200), ColumnType::Int8).unwrap_err();
        assert!(err.to_string().contains("out of int8 range"));
    }

    #[test]
    fn test_float_with_fraction_rejected_for_integer() {
        let err = coerce(&json!(1.5), ColumnType::Int64).unwrap_err();
        assert!(err.to_string().contains("not a whole number"));
    }

    #[test]
    fn test_negative_into_unsigned() {
        let err = coerce(&json!(-1), ColumnType::UInt32).unwrap_err();
        assert!(err.to_string().contains("out of u64 range"));
    }

    #[test]
    fn test_bool_variants() {
        assert_eq!(coerce(&json!(true), ColumnType::Bool).unwrap(), Value::from(true));
        assert_eq!(coerce(&json!("Yes"), ColumnType::Bool).unwrap(), Value::from(true));
        assert_eq!(coerce(&json!("0"), ColumnType::Bool).unwrap(), Value::from(false));
        assert_eq!(coerce(&json!(3), ColumnType::Bool).unwrap(), Value::from(true));
        assert!(coerce(&json!("maybe"), ColumnType::Bool).is_err());
    }

    #[test]
    fn test_float_paths() {
        assert_eq!(coerce(&json!(2.5), ColumnType::Float32).unwrap(), Value::from(2.5f64));
        assert_eq!(
            coerce(&json!("3.25"), ColumnType::Float64).unwrap(),
            Value::from(3.25f64)
        );
        assert!(coerce(&json!([1.0]), ColumnType::Float64).is_err());
    }

    #[test]
    fn test_string_renders_any_node() {
        assert_eq!(coerce(&json!("x"), ColumnType::String).unwrap(), Value::from("x"));
        assert_eq!(
            coerce(&json!({"a": 1}), ColumnType::String).unwrap(),
            Value::from(r#"{"a":1}"#)
        );
        assert_eq!(coerce(&json!(true), ColumnType::String).unwrap(), Value::from("true"));
    }

    #[test]
    fn test_timestamp_from_millis_and_rfc3339() {
        assert_eq!(
            coerce(&json!(1_609_459_200_000i64), ColumnType::Timestamp).unwrap(),
            Value::Scalar(Scalar::Timestamp(1_609_459_200_000))
        );
        assert_eq!(
            coerce(&json!("2021-01-01T00:00:00Z"), ColumnType::Timestamp).unwrap(),
            Value::Scalar(Scalar::Timestamp(1_609_459_200_000))
        );
        assert!(coerce(&json!("not a date"), ColumnType::Timestamp).is_err());
    }

    #[test]
    fn test_unrepresentable_timestamp_falls_back_to_default() {
        let col = ColumnDescriptor::new("ts", ColumnType::Timestamp).with_default(0i64);
        let node = json!(i64::MAX);
        assert_eq!(
            coerce_field(Some(&node), &col, BytesProjection::Normal).unwrap(),
            Value::from(0i64)
        );
    }

    #[test]
    fn test_list_and_map() {
        assert_eq!(
            coerce(&json!([1, 2]), ColumnType::List).unwrap(),
            Value::Sequence(vec![Value::from(1i64), Value::from(2i64)])
        );
        assert_eq!(
            coerce(&json!({"k": true}), ColumnType::Map).unwrap(),
            Value::Associative(vec![("k".into(), Value::from(true))])
        );
        let err = coerce(&json!(5), ColumnType::List).unwrap_err();
        assert!(err.to_string().contains("expected array, got number"));
        let err = coerce(&json!([1]), ColumnType::Map).unwrap_err();
        assert!(err.to_string().contains("expected object, got array"));
    }

    #[test]
    fn test_bytes_normal_decodes_base64() {
        let encoded = BASE64_STANDARD.encode(b"hello");
        assert_eq!(
            coerce(&json!(encoded), ColumnType::Bytes).unwrap(),
            Value::from(b"hello".to_vec())
        );
        assert!(coerce(&json!("!!!"), ColumnType::Bytes).is_err());
    }

    #[test]
    fn test_bytes_normal_accepts_numeric_array() {
        assert_eq!(
            coerce(&json!([104, 105]), ColumnType::Bytes).unwrap(),
            Value::from(vec![104u8, 105])
        );
        let err = coerce(&json!([300]), ColumnType::Bytes).unwrap_err();
        assert!(err.to_string().contains("not in 0..=255"));
    }

    #[test]
    fn test_bytes_string_captures_raw_rendering() {
        let col = ColumnDescriptor::new("b", ColumnType::Bytes);
        let node = json!("abc");
        assert_eq!(
            coerce_field(Some(&node), &col, BytesProjection::BytesString).unwrap(),
            Value::from(vec![0x61u8, 0x62, 0x63])
        );
        let node = json!(123);
        assert_eq!(
            coerce_field(Some(&node), &col, BytesProjection::BytesString).unwrap(),
            Value::from(b"123".to_vec())
        );
    }

    #[test]
    fn test_bytes_string_compressed_round_trips_through_gzip() {
        use std::io::Read;

        let col = ColumnDescriptor::new("b", ColumnType::Bytes);
        let node = json!("abc");
        let value =
            coerce_field(Some(&node), &col, BytesProjection::BytesStringCompressed).unwrap();
        let Value::Scalar(Scalar::Bytes(compressed)) = value else {
            panic!("expected bytes value");
        };
        let mut decoder = flate2::read::GzDecoder::new(compressed.as_slice());
        let mut decompressed = String::new();
        decoder.read_to_string(&mut decompressed).unwrap();
        assert_eq!(decompressed, "abc");
    }

    #[test]
    fn test_conversion_error_names_column() {
        let col = ColumnDescriptor::new("age", ColumnType::Int64);
        let node = json!({"nested": true});
        let err = coerce_field(Some(&node), &col, BytesProjection::Normal).unwrap_err();
        match err {
            RowsetError::Conversion {
                column, expected, ..
            } => {
                assert_eq!(column, "age");
                assert_eq!(expected, ColumnType::Int64);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
