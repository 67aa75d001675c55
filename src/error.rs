//! Crate error types.
//!
//! Provides [`RowsetError`] for extraction and emission failures, plus a
//! convenience [`RowsetResult`] alias. The taxonomy matters operationally:
//! [`RowsetError::MalformedDocument`] is the only class the skip policy is
//! allowed to suppress; every other variant always reaches the caller.

use thiserror::Error;

use crate::schema::ColumnType;

/// Result alias for extraction and emission operations.
pub type RowsetResult<T> = Result<T, RowsetError>;

/// Errors that can occur while converting between JSON documents and rows.
#[derive(Debug, Error)]
pub enum RowsetError {
    /// One document unit could not be tokenized or parsed.
    #[error("malformed document {document}: {message}")]
    MalformedDocument {
        /// Zero-based index of the document within its stream.
        document: u64,
        /// What the tokenizer or parser rejected.
        message: String,
    },

    /// A JSON field could not be converted to its column's type.
    #[error("cannot convert column '{column}' to {expected}: {message}")]
    Conversion {
        /// Name of the schema column being populated.
        column: String,
        /// The column's declared type.
        expected: ColumnType,
        /// Why the conversion failed.
        message: String,
    },

    /// A node-selection path failed to compile.
    #[error("invalid row path: {0}")]
    InvalidPath(String),

    /// A row was built with the wrong number of values for its schema.
    #[error("schema has {expected} columns but row has {actual} values")]
    ColumnCountMismatch {
        /// Number of columns in the schema.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// A row or delimiter was pushed to a writer that has been closed.
    #[error("writer is closed")]
    WriterClosed,

    /// An I/O failure on the underlying reader or writer.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl RowsetError {
    /// Returns `true` for the narrow malformed-document class that the
    /// skip policy may suppress.
    ///
    /// Conversion, path, and I/O errors are deliberately excluded: a
    /// skipping extraction must still surface them.
    #[must_use]
    pub fn is_malformed_document(&self) -> bool {
        matches!(self, RowsetError::MalformedDocument { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_document_display() {
        let err = RowsetError::MalformedDocument {
            document: 3,
            message: "unexpected end of input".into(),
        };
        assert_eq!(
            err.to_string(),
            "malformed document 3: unexpected end of input"
        );
    }

    #[test]
    fn test_conversion_display() {
        let err = RowsetError::Conversion {
            column: "age".into(),
            expected: ColumnType::Int64,
            message: "expected integer, got object".into(),
        };
        assert!(err.to_string().contains("age"));
        assert!(err.to_string().contains("int64"));
        assert!(err.to_string().contains("got object"));
    }

    #[test]
    fn test_column_count_mismatch_display() {
        let err = RowsetError::ColumnCountMismatch {
            expected: 2,
            actual: 5,
        };
        assert_eq!(err.to_string(), "schema has 2 columns but row has 5 values");
    }

    #[test]
    fn test_is_malformed_document_is_narrow() {
        let malformed = RowsetError::MalformedDocument {
            document: 0,
            message: "bad token".into(),
        };
        assert!(malformed.is_malformed_document());

        let conversion = RowsetError::Conversion {
            column: "x".into(),
            expected: ColumnType::Bool,
            message: "nope".into(),
        };
        assert!(!conversion.is_malformed_document());

        let io = RowsetError::Io(std::io::Error::other("disk gone"));
        assert!(!io.is_malformed_document());
    }

    #[test]
    fn test_io_error_from() {
        let err: RowsetError = std::io::Error::other("boom").into();
        assert!(matches!(err, RowsetError::Io(_)));
        assert!(err.to_string().contains("boom"));
    }
}
