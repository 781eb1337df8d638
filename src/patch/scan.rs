//! Read-only listing of placeholder anchors

use serde::Serialize;

use crate::core::util::line_at;
use crate::patch::label::extract_ref_name;
use crate::patch::locate::{locate_anchor, SkipReason};
use crate::patch::sentinel::{find_sentinel, spellings_in, Spellings};

/// A placeholder anchor found by [`scan_content`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundAnchor {
    /// Byte offset of the anchor (or of the placeholder, when it could not be located)
    pub offset: usize,

    /// 1-indexed line of `offset`
    pub line: u32,

    /// Extracted reference name
    pub name: Option<String>,

    /// Spellings carried by the opening tag
    pub spellings: Spellings,

    /// Why the patcher would leave this occurrence alone
    pub problem: Option<SkipReason>,
}

/// Spelling summary for result payloads
#[derive(Debug, Serialize)]
pub struct SpellingData {
    pub href: bool,
    pub xlink_href: bool,
}

impl From<Spellings> for SpellingData {
    fn from(s: Spellings) -> Self {
        Self {
            href: s.plain,
            xlink_href: s.namespaced,
        }
    }
}

/// List every placeholder anchor in `content` without changing anything.
///
/// Uses the same location rules as the patcher. A located anchor is listed
/// once, however many placeholders its opening tag carries.
pub fn scan_content(content: &str) -> Vec<FoundAnchor> {
    let mut found = Vec::new();
    let mut search_start = 0;

    while let Some(pos) = find_sentinel(content, search_start) {
        match locate_anchor(content, pos) {
            Ok(span) => {
                let name = extract_ref_name(span.inner(content));
                let problem = name.is_none().then_some(SkipReason::MissingLabel);
                found.push(FoundAnchor {
                    offset: span.tag_start,
                    line: line_at(content, span.tag_start),
                    name,
                    spellings: spellings_in(span.open_tag(content)),
                    problem,
                });
                search_start = span.open_end + 1;
            }
            Err(reason) => {
                found.push(FoundAnchor {
                    offset: pos,
                    line: line_at(content, pos),
                    name: None,
                    spellings: Spellings::default(),
                    problem: Some(reason),
                });
                search_start = pos + 1;
            }
        }
    }

    found
}
