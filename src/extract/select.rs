//! Row-node selection within a materialized document.
//!
//! Only JSON objects become rows. [`select_rows`] applies the configured
//! path when there is one; otherwise an object document is itself the row
//! node and an array document contributes its immediate object elements.
//! Non-object candidates are dropped silently in every mode.

use crate::path::TreePath;

/// An ordered JSON object, the unit a row is projected from.
pub type ObjectNode = serde_json::Map<String, serde_json::Value>;

/// Selects the row nodes of one document, in document order.
#[must_use]
pub fn select_rows(doc: serde_json::Value, path: Option<&TreePath>) -> Vec<ObjectNode> {
    if let Some(path) = path {
        return path
            .evaluate(&doc)
            .into_iter()
            .filter_map(|node| node.as_object().cloned())
            .collect();
    }
    match doc {
        serde_json::Value::Object(map) => vec![map],
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::Object(map) => Some(map),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}
