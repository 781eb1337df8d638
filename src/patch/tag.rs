//! Replacement opening tags

use crate::patch::sentinel::replace_sentinels;

/// href value used for anchors whose reference did not resolve
pub const UNRESOLVED_HREF: &str = "#";

/// Message type posted to the hosting page for unresolved references
pub const UNRESOLVED_MESSAGE_TYPE: &str = "unresolved-ref";

/// Escape a value for a single-quoted JavaScript string literal.
///
/// Backslashes go first so the backslashes added for quotes are not doubled.
pub fn escape_js_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Keep a value from closing the double-quoted attribute it is placed in
fn escape_attr_quotes(value: &str) -> String {
    value.replace('"', "&quot;")
}

/// Click handler reporting `name` to the parent page instead of navigating
pub fn unresolved_handler(name: &str) -> String {
    format!(
        "window.parent.postMessage({{type:'{}',name:'{}'}},'*');return false;",
        UNRESOLVED_MESSAGE_TYPE,
        escape_attr_quotes(&escape_js_string(name))
    )
}

/// Opening tag pointing every placeholder at `url`
pub fn resolved_tag(open_tag: &str, url: &str) -> String {
    replace_sentinels(open_tag, &escape_attr_quotes(url))
}

/// Opening tag with every placeholder set to `#` and one onclick handler
/// inserted right before the closing `>`
pub fn unresolved_tag(open_tag: &str, name: &str) -> String {
    let mut tag = replace_sentinels(open_tag, UNRESOLVED_HREF);
    // self-closing tags keep their `/` before the handler: `<a href="#"/ onclick=...>`
    if let Some(end) = tag.rfind('>') {
        let attr = format!(" onclick=\"{}\"", unresolved_handler(name));
        tag.insert_str(end, &attr);
    }
    tag
}
