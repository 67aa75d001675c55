//! Streaming row extraction.
//!
//! [`RowStream`] drives the extraction pipeline lazily: pull one document
//! from the [`DocumentCursor`], select its row nodes, then project one
//! row per node. All rows of a document are drained before the next
//! document is read, so memory tracks document size rather than stream
//! size.
//!
//! Failure handling is strict by default: the first error ends the
//! stream. With skip enabled, malformed documents are counted, logged,
//! and passed over; conversion and I/O errors still end the stream.

use std::fmt;
use std::io::Read;

use tracing::debug;

use crate::error::RowsetResult;
use crate::extract::cursor::DocumentCursor;
use crate::extract::project::project_row;
use crate::extract::select::{select_rows, ObjectNode};
use crate::extract::RowExtractor;
use crate::row::Row;

/// Iterator of extracted rows, tied to the extractor that produced it.
pub struct RowStream<'a, R: Read> {
    cursor: DocumentCursor<R>,
    extractor: &'a RowExtractor,
    pending: std::vec::IntoIter<ObjectNode>,
    skipped: u64,
    done: bool,
}

impl<'a, R: Read> RowStream<'a, R> {
    pub(crate) fn new(extractor: &'a RowExtractor, reader: R) -> Self {
        let mut cursor = DocumentCursor::new(reader);
        if let Some(max) = extractor.options.max_documents {
            cursor = cursor.with_max_documents(max);
        }
        Self {
            cursor,
            extractor,
            pending: Vec::new().into_iter(),
            skipped: 0,
            done: false,
        }
    }

    /// Number of documents started so far, parsed or not.
    #[must_use]
    pub fn documents_started(&self) -> u64 {
        self.cursor.documents_started()
    }

    /// Number of malformed documents passed over in skip mode.
    #[must_use]
    pub fn documents_skipped(&self) -> u64 {
        self.skipped
    }

    fn next_row(&mut self) -> Option<RowsetResult<Row>> {
        loop {
            if let Some(node) = self.pending.next() {
                return Some(project_row(
                    &node,
                    &self.extractor.schema,
                    self.extractor.options.bytes,
                ));
            }
            match self.cursor.next_document()? {
                Ok(doc) => {
                    self.pending = select_rows(doc, self.extractor.path.as_ref()).into_iter();
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

impl<R: Read> Iterator for RowStream<'_, R> {
    type Item = RowsetResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.next_row() {
                None => {
                    self.done = true;
                    return None;
                }
                Some(Err(e))
                    if self.extractor.options.skip_malformed && e.is_malformed_document() =>
                {
                    self.skipped += 1;
                    debug!(error = %e, skipped = self.skipped, "skipping malformed document");
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                Some(Ok(row)) => return Some(Ok(row)),
            }
        }
    }
}

impl<R: Read> fmt::Debug for RowStream<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowStream")
            .field("documents_started", &self.cursor.documents_started())
            .field("documents_skipped", &self.skipped)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}
