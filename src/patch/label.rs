//! Reference name extraction
//!
//! The renderer writes the reference name as the visible label of the link:
//! <text x="10" y="20">ns::Widget</text>

use once_cell::sync::Lazy;
use regex::Regex;

/// First text element whose content has no nested tag
pub static TEXT_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<text[^>]*>([^<]+)</text>").expect("Invalid TEXT_LABEL_RE regex")
});

/// Extract the reference name from an anchor's inner content.
///
/// Only the first matching text element counts; `None` when there is none or
/// it is blank.
pub fn extract_ref_name(inner: &str) -> Option<String> {
    let caps = TEXT_LABEL_RE.captures(inner)?;
    let name = caps.get(1)?.as_str().trim();

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_simple() {
        let inner = r##"<rect width="10"/><text fill="#000" x="5" y="9">Widget</text>"##;
        assert_eq!(extract_ref_name(inner), Some("Widget".to_string()));
    }

    #[test]
    fn test_extract_trims_whitespace() {
        let inner = "<text>\n   ns::Widget::draw  \n</text>";
        assert_eq!(extract_ref_name(inner), Some("ns::Widget::draw".to_string()));
    }

    #[test]
    fn test_extract_first_label_only() {
        let inner = "<text>First</text><text>Second</text>";
        assert_eq!(extract_ref_name(inner), Some("First".to_string()));
    }

    #[test]
    fn test_extract_skips_text_with_nested_markup() {
        let inner = "<text><tspan>a</tspan></text><text>Plain</text>";
        assert_eq!(extract_ref_name(inner), Some("Plain".to_string()));
    }

    #[test]
    fn test_extract_missing_or_blank() {
        assert_eq!(extract_ref_name("<rect/>"), None);
        assert_eq!(extract_ref_name("<text>   </text>"), None);
        assert_eq!(extract_ref_name("<text></text>"), None);
        assert_eq!(extract_ref_name(""), None);
    }
}
