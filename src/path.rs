//! Row-node selection paths.
//!
//! A [`TreePath`] is a compiled `$`-rooted path expression used to pick
//! the nodes inside a document that become rows. The supported grammar is
//! a small JSONPath subset:
//!
//! - `$` the document root,
//! - `.member` object member access,
//! - `["member"]` / `['member']` quoted member access,
//! - `[0]` array element access,
//! - `[*]` all elements of an array.
//!
//! Compilation happens once per extraction; evaluation walks borrowed
//! JSON nodes and never clones.

use std::fmt;

use crate::error::{RowsetError, RowsetResult};

/// One step of a compiled path.
#[derive(Debug, Clone, PartialEq)]
pub enum PathStep {
    /// The document root (`$`).
    Root,
    /// Object member access by name.
    Member(String),
    /// Array element access by position.
    Index(i64),
    /// All elements of an array (`[*]`).
    Wildcard,
}

/// A compiled path expression.
#[derive(Debug, Clone, PartialEq)]
pub struct TreePath {
    steps: Vec<PathStep>,
    text: String,
}

impl TreePath {
    /// Compiles a path expression.
    ///
    /// # Errors
    ///
    /// Returns [`RowsetError::InvalidPath`] if the expression is empty,
    /// does not start with `$`, or contains malformed steps.
    pub fn compile(text: &str) -> RowsetResult<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(RowsetError::InvalidPath("empty path expression".into()));
        }
        let chars: Vec<char> = trimmed.chars().collect();
        if chars[0] != '$' {
            return Err(RowsetError::InvalidPath(format!(
                "path must start with '$', got '{}'",
                chars[0]
            )));
        }

        let mut steps = vec![PathStep::Root];
        let mut pos = 1;
        while pos < chars.len() {
            match chars[pos] {
                '.' => {
                    pos += 1;
                    let start = pos;
                    while pos < chars.len()
                        && chars[pos] != '.'
                        && chars[pos] != '['
                        && !chars[pos].is_whitespace()
                    {
                        pos += 1;
                    }
                    if pos == start {
                        return Err(RowsetError::InvalidPath(format!(
                            "empty member name at position {start}"
                        )));
                    }
                    steps.push(PathStep::Member(chars[start..pos].iter().collect()));
                }
                '[' => {
                    pos += 1;
                    while pos < chars.len() && chars[pos].is_whitespace() {
                        pos += 1;
                    }
                    if pos >= chars.len() {
                        return Err(RowsetError::InvalidPath("unclosed bracket".into()));
                    }
                    match chars[pos] {
                        '*' => {
                            steps.push(PathStep::Wildcard);
                            pos += 1;
                        }
                        quote @ ('"' | '\'') => {
                            pos += 1;
                            let start = pos;
                            while pos < chars.len() && chars[pos] != quote {
                                pos += 1;
                            }
                            if pos >= chars.len() {
                                return Err(RowsetError::InvalidPath(
                                    "unclosed quoted member".into(),
                                ));
                            }
                            steps.push(PathStep::Member(chars[start..pos].iter().collect()));
                            pos += 1;
                        }
                        _ => {
                            let start = pos;
                            if chars[pos] == '-' {
                                pos += 1;
                            }
                            while pos < chars.len() && chars[pos].is_ascii_digit() {
                                pos += 1;
                            }
                            let idx_str: String = chars[start..pos].iter().collect();
                            if idx_str.is_empty() || idx_str == "-" {
                                return Err(RowsetError::InvalidPath(format!(
                                    "expected array index or '*' at position {start}"
                                )));
                            }
                            let idx: i64 = idx_str.parse().map_err(|_| {
                                RowsetError::InvalidPath(format!(
                                    "invalid array index: '{idx_str}'"
                                ))
                            })?;
                            steps.push(PathStep::Index(idx));
                        }
                    }
                    while pos < chars.len() && chars[pos].is_whitespace() {
                        pos += 1;
                    }
                    if pos >= chars.len() || chars[pos] != ']' {
                        return Err(RowsetError::InvalidPath(format!(
                            "expected ']' at position {pos}"
                        )));
                    }
                    pos += 1;
                }
                c if c.is_whitespace() => {
                    pos += 1;
                }
                c => {
                    return Err(RowsetError::InvalidPath(format!(
                        "unexpected character '{c}' at position {pos}"
                    )));
                }
            }
        }

        Ok(Self {
            steps,
            text: trimmed.to_owned(),
        })
    }

    /// Evaluates the path against a document, returning all matched nodes
    /// in document order.
    #[must_use]
    pub fn evaluate<'a>(&self, root: &'a serde_json::Value) -> Vec<&'a serde_json::Value> {
        let mut current = vec![root];
        for step in &self.steps {
            match step {
                PathStep::Root => {}
                PathStep::Member(name) => {
                    current = current
                        .into_iter()
                        .filter_map(|node| node.as_object().and_then(|m| m.get(name.as_str())))
                        .collect();
                }
                PathStep::Index(idx) => {
                    current = current
                        .into_iter()
                        .filter_map(|node| {
                            let i = usize::try_from(*idx).ok()?;
                            node.as_array().and_then(|a| a.get(i))
                        })
                        .collect();
                }
                PathStep::Wildcard => {
                    let mut next = Vec::new();
                    for node in current {
                        if let Some(items) = node.as_array() {
                            next.extend(items.iter());
                        }
                    }
                    current = next;
                }
            }
        }
        current
    }

    /// Returns `true` if the path matches at least one node.
    #[must_use]
    pub fn exists(&self, root: &serde_json::Value) -> bool {
        !self.evaluate(root).is_empty()
    }

    /// The compiled steps.
    #[must_use]
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
