//! Locating the anchor around a placeholder

use std::fmt;

/// Anchor open marker
pub const ANCHOR_OPEN: &str = "<a";

/// Anchor close marker
pub const ANCHOR_CLOSE: &str = "</a>";

/// Why an occurrence was left alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No `<a` before the placeholder
    MissingOpenTag,
    /// No `</a>` after the placeholder
    MissingCloseTag,
    /// The opening tag never ends, or ends after the close marker
    UnterminatedOpenTag,
    /// The placeholder is not inside the nearest opening tag
    SentinelOutsideOpenTag,
    /// No usable text label inside the anchor
    MissingLabel,
}

impl SkipReason {
    /// Short machine-readable code for result items
    pub fn code(&self) -> &'static str {
        match self {
            SkipReason::MissingOpenTag => "MISSING_OPEN_TAG",
            SkipReason::MissingCloseTag => "MISSING_CLOSE_TAG",
            SkipReason::UnterminatedOpenTag => "UNTERMINATED_OPEN_TAG",
            SkipReason::SentinelOutsideOpenTag => "SENTINEL_OUTSIDE_OPEN_TAG",
            SkipReason::MissingLabel => "MISSING_LABEL",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            SkipReason::MissingOpenTag => "no <a before placeholder",
            SkipReason::MissingCloseTag => "no </a> after placeholder",
            SkipReason::UnterminatedOpenTag => "opening tag does not end before </a>",
            SkipReason::SentinelOutsideOpenTag => "placeholder is not inside the opening tag",
            SkipReason::MissingLabel => "could not extract reference name from anchor content",
        };
        f.write_str(msg)
    }
}

/// Byte offsets of one anchor in the buffer they were computed from.
/// Only valid until the buffer is modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorSpan {
    /// Start of `<a`
    pub tag_start: usize,
    /// Offset of the `>` ending the opening tag
    pub open_end: usize,
    /// Start of `</a>`
    pub close_start: usize,
}

impl AnchorSpan {
    /// The opening tag, `<a` through `>`
    pub fn open_tag<'a>(&self, buf: &'a str) -> &'a str {
        &buf[self.tag_start..=self.open_end]
    }

    /// Everything between the opening tag and `</a>`
    pub fn inner<'a>(&self, buf: &'a str) -> &'a str {
        &buf[self.open_end + 1..self.close_start]
    }
}

/// Find the anchor enclosing the placeholder at `pos`
pub fn locate_anchor(buf: &str, pos: usize) -> Result<AnchorSpan, SkipReason> {
    let tag_start = buf[..pos]
        .rfind(ANCHOR_OPEN)
        .ok_or(SkipReason::MissingOpenTag)?;

    let close_start = buf[pos..]
        .find(ANCHOR_CLOSE)
        .map(|i| pos + i)
        .ok_or(SkipReason::MissingCloseTag)?;

    let open_end = buf[tag_start..]
        .find('>')
        .map(|i| tag_start + i)
        .ok_or(SkipReason::UnterminatedOpenTag)?;

    if open_end > close_start {
        return Err(SkipReason::UnterminatedOpenTag);
    }
    if open_end < pos {
        return Err(SkipReason::SentinelOutsideOpenTag);
    }

    Ok(AnchorSpan {
        tag_start,
        open_end,
        close_start,
    })
}
