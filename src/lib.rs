//! Bidirectional conversion between JSON document streams and typed,
//! schema-conformant rows.
//!
//! The crate has two halves that mirror each other:
//!
//! - **Extraction** ([`extract`]): scan a byte stream of JSON documents
//!   lazily, select the object nodes that become rows, and coerce each
//!   node onto a [`RowSchema`]. Configured through [`RowExtractor`].
//! - **Emission** ([`emit`]): stream rows back out as one JSON array
//!   through [`RowWriter`], with null columns omitted.
//!
//! ```
//! use json_rowset::{ColumnDescriptor, ColumnType, RowExtractor, RowSchema, RowWriter};
//!
//! let schema = RowSchema::new(vec![
//!     ColumnDescriptor::new("symbol", ColumnType::String).with_default(""),
//!     ColumnDescriptor::new("price", ColumnType::Float64),
//! ])
//! .into_ref();
//!
//! let input = r#"[{"symbol": "ACME", "price": 12.5}, {"symbol": "WIDG"}]"#;
//!
//! let extractor = RowExtractor::new(schema);
//! let mut writer = RowWriter::new(Vec::new());
//! for row in extractor.extract(input.as_bytes()) {
//!     writer.write(&row?)?;
//! }
//! let encoded = writer.into_inner()?;
//!
//! assert_eq!(
//!     String::from_utf8_lossy(&encoded),
//!     r#"[{"symbol":"ACME","price":12.5},{"symbol":"WIDG"}]"#
//! );
//! # Ok::<(), json_rowset::RowsetError>(())
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

/// Emission of rows as one streamed JSON array.
pub mod emit;
/// Crate error types.
pub mod error;
/// Extraction of rows from JSON document streams.
pub mod extract;
/// Row-node selection paths.
pub mod path;
/// Schema-conformant rows.
pub mod row;
/// Row schema definitions.
pub mod schema;
/// In-memory row values.
pub mod value;

pub use emit::{row_to_json, value_to_json, RowWriter};
pub use error::{RowsetError, RowsetResult};
pub use extract::{
    coerce_field, project_row, select_rows, BytesProjection, DocumentCursor, ExtractOptions,
    ObjectNode, RowExtractor, RowStream,
};
pub use path::{PathStep, TreePath};
pub use row::Row;
pub use schema::{ColumnDescriptor, ColumnType, RowSchema, SchemaRef};
pub use value::{Scalar, Value};
