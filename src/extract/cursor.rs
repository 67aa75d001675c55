//! Lazy document framing.
//!
//! [`DocumentCursor`] scans a byte stream for top-level JSON values and
//! materializes each top-level object as one document. The scan is
//! forward-only and single-pass:
//!
//! - **Framing bytes** between documents (whitespace, commas, `[`/`]`)
//!   are consumed and ignored, so concatenated, newline-delimited, and
//!   array-wrapped streams all work without configuration.
//! - **Top-level objects** are captured through their matching close
//!   brace and parsed. A document that fails to parse yields
//!   [`RowsetError::MalformedDocument`] with the cursor already advanced
//!   past it, so pulling again resumes at the next boundary.
//! - **Other top-level values** (numbers, strings, booleans, nulls) are
//!   validated and skipped; they are not documents.
//!
//! An optional limit stops the scan once that many documents have been
//! started, whether or not they parsed.

use std::fmt;
use std::io::{BufReader, Read};

use crate::error::{RowsetError, RowsetResult};

/// Pull-based scanner over a stream of JSON documents.
pub struct DocumentCursor<R: Read> {
    bytes: std::io::Bytes<BufReader<R>>,
    peeked: Option<u8>,
    started: u64,
    max_documents: Option<u64>,
    finished: bool,
}

impl<R: Read> DocumentCursor<R> {
    /// Creates a cursor over `reader`.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            bytes: BufReader::new(reader).bytes(),
            peeked: None,
            started: 0,
            max_documents: None,
            finished: false,
        }
    }

    /// Stops the scan after `max` documents have been started, counting
    /// documents that fail to parse.
    #[must_use]
    pub fn with_max_documents(mut self, max: u64) -> Self {
        self.max_documents = Some(max);
        self
    }

    /// Number of documents started so far, parsed or not.
    #[must_use]
    pub fn documents_started(&self) -> u64 {
        self.started
    }

    /// Advances to the next document.
    ///
    /// Returns `None` at end of input or once the document limit is
    /// reached. A malformed document or junk token yields `Some(Err)`
    /// without ending the scan; the next call resumes at the following
    /// boundary.
    pub fn next_document(&mut self) -> Option<RowsetResult<serde_json::Value>> {
        if self.finished {
            return None;
        }
        if let Some(max) = self.max_documents {
            if self.started >= max {
                self.finished = true;
                return None;
            }
        }
        loop {
            let byte = match self.next_byte() {
                Ok(Some(b)) => b,
                Ok(None) => {
                    self.finished = true;
                    return None;
                }
                Err(e) => return Some(Err(e)),
            };
            match byte {
                b' ' | b'\t' | b'\r' | b'\n' | b',' | b'[' | b']' => {}
                b'{' => {
                    self.started += 1;
                    return Some(self.capture_object(self.started - 1));
                }
                b'"' => {
                    if let Err(e) = self.skip_string() {
                        return Some(Err(e));
                    }
                }
                other => {
                    if let Err(e) = self.skip_scalar(other) {
                        return Some(Err(e));
                    }
                }
            }
        }
    }

    /// Reads one object through its matching close brace, then parses
    /// the captured bytes.
    fn capture_object(&mut self, index: u64) -> RowsetResult<serde_json::Value> {
        let mut buf = vec![b'{'];
        let mut depth = 1u32;
        let mut in_string = false;
        let mut escaped = false;
        loop {
            let Some(byte) = self.next_byte()? else {
                return Err(RowsetError::MalformedDocument {
                    document: index,
                    message: "unexpected end of input inside document".into(),
                });
            };
            buf.push(byte);
            if in_string {
                if escaped {
                    escaped = false;
                } else if byte == b'\\' {
                    escaped = true;
                } else if byte == b'"' {
                    in_string = false;
                }
            } else {
                match byte {
                    b'"' => in_string = true,
                    b'{' => depth += 1,
                    b'}' => {
                        depth -= 1;
                        if depth == 0 {
                            return serde_json::from_slice(&buf).map_err(|e| {
                                RowsetError::MalformedDocument {
                                    document: index,
                                    message: e.to_string(),
                                }
                            });
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    fn skip_string(&mut self) -> RowsetResult<()> {
        let mut escaped = false;
        loop {
            match self.next_byte()? {
                None => return Err(self.malformed("unterminated string".into())),
                Some(b'\\') if !escaped => escaped = true,
                Some(b'"') if !escaped => return Ok(()),
                Some(_) => escaped = false,
            }
        }
    }

    /// Consumes one unquoted token run. Valid scalars are skipped
    /// silently; anything else is a malformed token.
    fn skip_scalar(&mut self, first: u8) -> RowsetResult<()> {
        let mut run = vec![first];
        loop {
            match self.next_byte()? {
                None => break,
                Some(b) if is_structural(b) => {
                    self.peeked = Some(b);
                    break;
                }
                Some(b) => run.push(b),
            }
        }
        if serde_json::from_slice::<serde_json::Value>(&run).is_ok() {
            return Ok(());
        }
        let text = String::from_utf8_lossy(&run).into_owned();
        Err(self.malformed(format!("unexpected token {text:?}")))
    }

    fn malformed(&self, message: String) -> RowsetError {
        RowsetError::MalformedDocument {
            document: self.started,
            message,
        }
    }

    fn next_byte(&mut self) -> RowsetResult<Option<u8>> {
        if let Some(b) = self.peeked.take() {
            return Ok(Some(b));
        }
        match self.bytes.next() {
            None => Ok(None),
            Some(Ok(b)) => Ok(Some(b)),
            Some(Err(e)) => Err(RowsetError::Io(e)),
        }
    }
}

fn is_structural(b: u8) -> bool {
    matches!(
        b,
        b' ' | b'\t' | b'\r' | b'\n' | b',' | b'[' | b']' | b'{' | b'}' | b'"' | b':'
    )
}

impl<R: Read> Iterator for DocumentCursor<R> {
    type Item = RowsetResult<serde_json::Value>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_document()
    }
}

impl<R: Read> fmt::Debug for DocumentCursor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentCursor")
            .field("documents_started", &self.started)
            .field("max_documents", &self.max_documents)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}
