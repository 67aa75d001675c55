//! Streamed JSON array emission.
//!
//! [`RowWriter`] writes any number of rows as one JSON array without
//! buffering them. The array opener is written lazily on the first row,
//! rows are comma-separated as they arrive, and closing writes the
//! terminator and flushes. A writer closed without ever opening still
//! emits a complete empty array.

use std::fmt;
use std::io::{BufWriter, Write};

use crate::emit::render::row_to_json;
use crate::error::{RowsetError, RowsetResult};
use crate::row::Row;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    Unopened,
    Open,
    RowWritten,
    Closed,
}

/// Streaming writer of one JSON array of row objects.
///
/// ```
/// use json_rowset::{ColumnDescriptor, ColumnType, Row, RowSchema, RowWriter, Value};
///
/// let schema = RowSchema::new(vec![ColumnDescriptor::new("a", ColumnType::Int64)]).into_ref();
/// let row = Row::try_new(schema, vec![Value::from(1i64)])?;
///
/// let mut writer = RowWriter::new(Vec::new());
/// writer.write(&row)?;
/// let encoded = writer.into_inner()?;
/// assert_eq!(encoded, b"[{\"a\":1}]");
/// # Ok::<(), json_rowset::RowsetError>(())
/// ```
pub struct RowWriter<W: Write> {
    out: BufWriter<W>,
    state: WriterState,
}

impl<W: Write> RowWriter<W> {
    /// Creates a writer over `sink`. Nothing is written until the first
    /// row arrives or the writer is opened or closed explicitly.
    #[must_use]
    pub fn new(sink: W) -> Self {
        Self {
            out: BufWriter::new(sink),
            state: WriterState::Unopened,
        }
    }

    /// Writes the array opener if it has not been written yet.
    ///
    /// # Errors
    ///
    /// Returns [`RowsetError::WriterClosed`] after [`close`](Self::close),
    /// or [`RowsetError::Io`] if the sink fails.
    pub fn open(&mut self) -> RowsetResult<()> {
        match self.state {
            WriterState::Unopened => {
                self.out.write_all(b"[")?;
                self.state = WriterState::Open;
                Ok(())
            }
            WriterState::Open | WriterState::RowWritten => Ok(()),
            WriterState::Closed => Err(RowsetError::WriterClosed),
        }
    }

    /// Writes one row, opening the array first if necessary.
    ///
    /// # Errors
    ///
    /// Returns [`RowsetError::WriterClosed`] after [`close`](Self::close),
    /// or [`RowsetError::Io`] if the sink fails.
    pub fn write(&mut self, row: &Row) -> RowsetResult<()> {
        match self.state {
            WriterState::Unopened => self.out.write_all(b"[")?,
            WriterState::Open => {}
            WriterState::RowWritten => self.out.write_all(b",")?,
            WriterState::Closed => return Err(RowsetError::WriterClosed),
        }
        serde_json::to_writer(&mut self.out, &row_to_json(row))
            .map_err(|e| RowsetError::Io(e.into()))?;
        self.state = WriterState::RowWritten;
        Ok(())
    }

    /// Terminates the array and flushes. A writer that never opened
    /// emits `[]`. Closing twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`RowsetError::Io`] if the sink fails.
    pub fn close(&mut self) -> RowsetResult<()> {
        match self.state {
            WriterState::Unopened => self.out.write_all(b"[]")?,
            WriterState::Open | WriterState::RowWritten => self.out.write_all(b"]")?,
            WriterState::Closed => return Ok(()),
        }
        self.state = WriterState::Closed;
        self.out.flush()?;
        Ok(())
    }

    /// Closes the array if needed and returns the sink.
    ///
    /// # Errors
    ///
    /// Returns [`RowsetError::Io`] if closing or unwrapping the buffer
    /// fails.
    pub fn into_inner(mut self) -> RowsetResult<W> {
        self.close()?;
        self.out
            .into_inner()
            .map_err(|e| RowsetError::Io(e.into_error()))
    }
}

impl<W: Write> fmt::Debug for RowWriter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowWriter")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
