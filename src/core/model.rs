//! Unified Result Model
//!
//! Every command maps its outcome to this model before rendering output.

use serde::{Deserialize, Serialize};

/// The kind of result item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    File,
    Anchor,
    Error,
}

/// What happened to the file or anchor a result describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// File rewritten on disk
    Patched,
    /// File left as it was (nothing to patch, or dry run)
    Unchanged,
    /// Anchor pointed at a resolved target
    Resolved,
    /// Anchor given the unresolved fallback handler
    Unresolved,
    /// Anchor left untouched because its markup could not be interpreted
    Skipped,
    /// Anchor listed by a read-only scan
    Found,
    /// Operation failed
    Failed,
}

/// Line-based range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeLine {
    pub start: u32,
    pub end: u32,
}

impl RangeLine {
    pub fn line(line: u32) -> Self {
        Self {
            start: line,
            end: line,
        }
    }
}

/// Metadata for a result item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    /// File size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Content hash (XXH3)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,

    /// Byte offset of an anchor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

/// Error information for a result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultError {
    pub code: String,
    pub message: String,
}

impl ResultError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// The unified result item that all commands produce
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultItem {
    /// The kind of this result
    pub kind: Kind,

    /// Path relative to root, using '/' as separator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Line range within the file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeLine>,

    /// Reference name for anchors, message otherwise
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    /// Structured payload (counts, URLs, skip reasons)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    pub status: Status,

    pub meta: Meta,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ResultError>,
}

impl ResultItem {
    /// Create a new file result
    pub fn file(path: impl Into<String>, status: Status) -> Self {
        Self {
            kind: Kind::File,
            path: Some(path.into()),
            range: None,
            excerpt: None,
            data: None,
            status,
            meta: Meta::default(),
            errors: Vec::new(),
        }
    }

    /// Create a new anchor result
    pub fn anchor(path: impl Into<String>, line: u32, status: Status) -> Self {
        Self {
            kind: Kind::Anchor,
            path: Some(path.into()),
            range: Some(RangeLine::line(line)),
            excerpt: None,
            data: None,
            status,
            meta: Meta::default(),
            errors: Vec::new(),
        }
    }

    /// Create a new error result
    pub fn error(path: Option<String>, error: ResultError) -> Self {
        Self {
            kind: Kind::Error,
            path,
            range: None,
            excerpt: Some(error.message.clone()),
            data: None,
            status: Status::Failed,
            meta: Meta::default(),
            errors: vec![error],
        }
    }

    /// Set metadata
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    /// Set the excerpt
    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    /// Set structured data payload
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Result set containing multiple result items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: ResultItem) {
        self.items.push(item);
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = ResultItem>) {
        self.items.extend(items);
    }

    /// Number of error items
    pub fn error_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.kind == Kind::Error)
            .count()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_item_serialization() {
        let item = ResultItem::anchor("diagrams/a.svg", 12, Status::Resolved)
            .with_excerpt("ns::Widget")
            .with_data(serde_json::json!({ "url": "class_widget.html" }));

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["kind"], "anchor");
        assert_eq!(json["status"], "resolved");
        assert_eq!(json["range"]["start"], 12);
        assert_eq!(json["excerpt"], "ns::Widget");
        assert!(json.get("errors").is_none());
    }

    #[test]
    fn test_error_count() {
        let mut set = ResultSet::new();
        set.push(ResultItem::file("a.svg", Status::Patched));
        set.push(ResultItem::error(
            Some("b.svg".to_string()),
            ResultError::new("READ_FAILED", "no such file"),
        ));

        assert_eq!(set.len(), 2);
        assert_eq!(set.error_count(), 1);
        assert_eq!(set.items[1].status, Status::Failed);
        assert_eq!(set.items[1].excerpt.as_deref(), Some("no such file"));
    }
}
