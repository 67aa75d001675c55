//! Emission: rows to one streamed JSON array.
//!
//! The inverse of extraction. [`RowWriter`] streams rows into a sink as
//! a single JSON array, rendering each row through [`row_to_json`]: keys
//! in schema order, null columns omitted, nested values rendered by
//! their construction-time classification.

pub mod render;
pub mod writer;

pub use render::{row_to_json, value_to_json};
pub use writer::RowWriter;
