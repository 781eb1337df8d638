//! Placeholder sentinel handling
//!
//! Diagram renderers that know nothing about the documentation's cross
//! references emit links of the form:
//! <a href="\ref" xlink:href="\ref" ...><text ...>Name</text></a>

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Plain attribute spelling of the placeholder
pub const PLAIN: &str = "href=\"\\ref\"";

/// XML-namespaced attribute spelling of the placeholder
pub const NAMESPACED: &str = "xlink:href=\"\\ref\"";

/// Matches either spelling; group 1 is set for the namespaced one
static SENTINEL_ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(xlink:)?href="\\ref""#).expect("Invalid SENTINEL_ATTR_RE regex")
});

/// Which spellings a piece of markup carries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Spellings {
    pub plain: bool,
    pub namespaced: bool,
}

impl Spellings {
    pub fn any(&self) -> bool {
        self.plain || self.namespaced
    }
}

/// Whether the content carries any placeholder at all
pub fn has_sentinel(content: &str) -> bool {
    content.contains(PLAIN) || content.contains(NAMESPACED)
}

/// Earliest placeholder at or after `from`, whichever spelling comes first
pub fn find_sentinel(content: &str, from: usize) -> Option<usize> {
    let haystack = content.get(from..)?;
    let plain = haystack.find(PLAIN);
    let namespaced = haystack.find(NAMESPACED);

    let pos = match (plain, namespaced) {
        (Some(p), Some(n)) => p.min(n),
        (p, n) => p.or(n)?,
    };

    Some(from + pos)
}

/// Detect each spelling independently
pub fn spellings_in(tag: &str) -> Spellings {
    let mut spellings = Spellings::default();
    for caps in SENTINEL_ATTR_RE.captures_iter(tag) {
        if caps.get(1).is_some() {
            spellings.namespaced = true;
        } else {
            spellings.plain = true;
        }
    }
    spellings
}

/// Replace the placeholder value of one spelling, leaving everything else alone
pub fn replace_spelling(tag: &str, namespaced: bool, value: &str) -> String {
    SENTINEL_ATTR_RE
        .replace_all(tag, |caps: &Captures| {
            let whole = &caps[0];
            if caps.get(1).is_some() == namespaced {
                let attr = if namespaced { "xlink:href" } else { "href" };
                format!("{}=\"{}\"", attr, value)
            } else {
                whole.to_string()
            }
        })
        .into_owned()
}

/// Replace the placeholder value of every spelling present in `tag`
pub fn replace_sentinels(tag: &str, value: &str) -> String {
    let spellings = spellings_in(tag);
    let mut out = tag.to_string();
    if spellings.plain {
        out = replace_spelling(&out, false, value);
    }
    if spellings.namespaced {
        out = replace_spelling(&out, true, value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_sentinel() {
        assert!(has_sentinel(r#"<a href="\ref">"#));
        assert!(has_sentinel(r#"<a xlink:href="\ref">"#));
        assert!(!has_sentinel(r#"<a href="page.html">"#));
        assert!(!has_sentinel(r#"<a href="\reference">"#));
    }

    #[test]
    fn test_find_sentinel_earliest_wins() {
        let content = r#"<a xlink:href="\ref" href="\ref">"#;
        assert_eq!(find_sentinel(content, 0), Some(3));
        // past the namespaced one, only the inner plain part and the plain attr remain
        assert_eq!(find_sentinel(content, 4), Some(9));
        assert_eq!(find_sentinel(content, 10), Some(21));
        assert_eq!(find_sentinel(content, 22), None);
        assert_eq!(find_sentinel(content, 1000), None);
    }

    #[test]
    fn test_spellings_in() {
        let both = spellings_in(r#"<a href="\ref" xlink:href="\ref">"#);
        assert_eq!(
            both,
            Spellings {
                plain: true,
                namespaced: true
            }
        );

        let ns_only = spellings_in(r#"<a xlink:href="\ref">"#);
        assert!(ns_only.namespaced);
        assert!(!ns_only.plain);

        let plain_only = spellings_in(r#"<a href="\ref">"#);
        assert!(plain_only.plain);
        assert!(!plain_only.namespaced);

        assert!(!spellings_in("<a>").any());
    }

    #[test]
    fn test_replace_spelling_is_selective() {
        let tag = r#"<a href="\ref" xlink:href="\ref">"#;
        assert_eq!(
            replace_spelling(tag, false, "x.html"),
            r#"<a href="x.html" xlink:href="\ref">"#
        );
        assert_eq!(
            replace_spelling(tag, true, "x.html"),
            r#"<a href="\ref" xlink:href="x.html">"#
        );
    }

    #[test]
    fn test_replace_sentinels_keeps_other_attributes() {
        let tag = r#"<a target="_top" xlink:href="\ref" title="T" href="\ref" xlink:type="simple">"#;
        assert_eq!(
            replace_sentinels(tag, "#"),
            r##"<a target="_top" xlink:href="#" title="T" href="#" xlink:type="simple">"##
        );
    }

    #[test]
    fn test_replacement_value_is_literal() {
        let tag = r#"<a href="\ref">"#;
        assert_eq!(replace_sentinels(tag, "$1.html"), r#"<a href="$1.html">"#);
    }
}
