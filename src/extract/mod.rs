//! Extraction: JSON document streams to schema-conformant rows.
//!
//! An extraction is configured once as a [`RowExtractor`] and can then
//! run against any number of readers. Each run walks the input lazily:
//!
//! - [`DocumentCursor`] frames and materializes one document at a time,
//! - [`select_rows`] picks the object nodes that become rows,
//! - [`project_row`] coerces each node onto the schema.
//!
//! ```
//! use json_rowset::{ColumnDescriptor, ColumnType, RowExtractor, RowSchema, RowsetResult, Value};
//!
//! let schema = RowSchema::new(vec![
//!     ColumnDescriptor::new("id", ColumnType::Int64).with_default(0i64),
//!     ColumnDescriptor::new("name", ColumnType::String).with_default(""),
//! ])
//! .into_ref();
//!
//! let input = r#"{"id": 1, "name": "a"} {"id": 2}"#;
//! let extractor = RowExtractor::new(schema);
//! let rows = extractor
//!     .extract(input.as_bytes())
//!     .collect::<RowsetResult<Vec<_>>>()?;
//!
//! assert_eq!(rows.len(), 2);
//! assert_eq!(rows[1].get("name"), Some(&Value::from("")));
//! # Ok::<(), json_rowset::RowsetError>(())
//! ```

use std::io::Read;

use crate::error::RowsetResult;
use crate::path::TreePath;
use crate::schema::SchemaRef;

pub mod coerce;
pub mod cursor;
pub mod project;
pub mod select;
pub mod stream;

pub use coerce::{coerce_field, BytesProjection};
pub use cursor::DocumentCursor;
pub use project::project_row;
pub use select::{select_rows, ObjectNode};
pub use stream::RowStream;

/// Extraction tuning knobs.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Path selecting the nodes that become rows. `None` applies the
    /// default selection: an object document is its own row node and an
    /// array document contributes its immediate object elements.
    pub row_path: Option<String>,
    /// How byte columns interpret their source nodes.
    pub bytes: BytesProjection,
    /// Stop after this many documents have been started.
    pub max_documents: Option<u64>,
    /// Pass over malformed documents instead of stopping at the first.
    pub skip_malformed: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            row_path: None,
            bytes: BytesProjection::Normal,
            max_documents: None,
            skip_malformed: false,
        }
    }
}

impl ExtractOptions {
    /// Creates the default options: no row path, normal byte decoding,
    /// no document limit, strict failure handling.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the row-node selection path. An empty string clears it.
    #[must_use]
    pub fn with_row_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.row_path = if path.is_empty() { None } else { Some(path) };
        self
    }

    /// Sets the byte-column projection mode.
    #[must_use]
    pub fn with_bytes_projection(mut self, bytes: BytesProjection) -> Self {
        self.bytes = bytes;
        self
    }

    /// Bounds the number of documents started per run.
    #[must_use]
    pub fn with_max_documents(mut self, max: u64) -> Self {
        self.max_documents = Some(max);
        self
    }

    /// Enables or disables passing over malformed documents.
    #[must_use]
    pub fn with_skip_malformed(mut self, skip: bool) -> Self {
        self.skip_malformed = skip;
        self
    }
}

/// A reusable, configured extraction.
#[derive(Debug)]
pub struct RowExtractor {
    pub(crate) schema: SchemaRef,
    pub(crate) options: ExtractOptions,
    pub(crate) path: Option<TreePath>,
}

impl RowExtractor {
    /// Creates an extractor with default options.
    #[must_use]
    pub fn new(schema: SchemaRef) -> Self {
        Self {
            schema,
            options: ExtractOptions::default(),
            path: None,
        }
    }

    /// Creates an extractor, compiling the configured row path.
    ///
    /// # Errors
    ///
    /// Returns [`RowsetError::InvalidPath`](crate::RowsetError::InvalidPath)
    /// when `options.row_path` does not compile.
    pub fn with_options(schema: SchemaRef, options: ExtractOptions) -> RowsetResult<Self> {
        let path = match options.row_path.as_deref() {
            Some("") | None => None,
            Some(text) => Some(TreePath::compile(text)?),
        };
        Ok(Self {
            schema,
            options,
            path,
        })
    }

    /// The target schema.
    #[must_use]
    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// The options this extractor was built with.
    #[must_use]
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Starts a lazy extraction over `reader`.
    #[must_use]
    pub fn extract<R: Read>(&self, reader: R) -> RowStream<'_, R> {
        RowStream::new(self, reader)
    }
}
