//! Reference resolution
//!
//! The patcher never decides what a reference name points to. It hands the
//! name to a [`RefResolver`] together with a [`ResolveContext`] and turns the
//! returned [`RefTarget`] into a URL.

pub mod table;

pub use table::RefTable;

/// Default document extension appended to target files without one
pub const DEFAULT_EXTENSION: &str = ".html";

/// Context passed along with every lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveContext {
    /// Relative path from the patched file back to the output root (e.g. "../")
    pub rel_path: String,

    /// Scope the reference is looked up in (e.g. "ns::Class")
    pub scope: String,
}

impl ResolveContext {
    pub fn new(rel_path: impl Into<String>, scope: impl Into<String>) -> Self {
        Self {
            rel_path: rel_path.into(),
            scope: scope.into(),
        }
    }
}

/// A resolved reference, before URL assembly
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefTarget {
    /// Prefix placed in front of the file (relative path or external project URL)
    pub prefix: Option<String>,

    /// Target document, with or without extension
    pub file: Option<String>,

    /// Fragment inside the target document
    pub anchor: Option<String>,
}

impl RefTarget {
    /// Build the navigation URL for this target.
    ///
    /// Returns `None` when the target names neither a file nor an anchor, which
    /// counts as unresolved.
    pub fn to_url(&self, extension: &str) -> Option<String> {
        let file = self.file.as_deref().filter(|f| !f.is_empty());
        let anchor = self.anchor.as_deref().filter(|a| !a.is_empty());

        if file.is_none() && anchor.is_none() {
            return None;
        }

        let mut url = self.prefix.clone().unwrap_or_default();
        if let Some(file) = file {
            url.push_str(&with_extension(file, extension));
        }
        if let Some(anchor) = anchor {
            url.push('#');
            url.push_str(anchor);
        }

        Some(url)
    }
}

/// Append `extension` unless the last path segment already has a '.'
pub fn with_extension(file: &str, extension: &str) -> String {
    let segment_start = file.rfind(['/', '\\']).map(|i| i + 1).unwrap_or(0);
    if file[segment_start..].contains('.') {
        file.to_string()
    } else {
        format!("{}{}", file, extension)
    }
}

/// Maps a reference name to a target
pub trait RefResolver {
    /// Look up `name`; `None` means the reference is unresolved
    fn resolve(&self, name: &str, ctx: &ResolveContext) -> Option<RefTarget>;
}

impl<F> RefResolver for F
where
    F: Fn(&str, &ResolveContext) -> Option<RefTarget>,
{
    fn resolve(&self, name: &str, ctx: &ResolveContext) -> Option<RefTarget> {
        self(name, ctx)
    }
}

/// Resolver that knows nothing; every reference ends up unresolved
#[derive(Debug, Clone, Copy, Default)]
pub struct NullResolver;

impl RefResolver for NullResolver {
    fn resolve(&self, _name: &str, _ctx: &ResolveContext) -> Option<RefTarget> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(prefix: Option<&str>, file: Option<&str>, anchor: Option<&str>) -> RefTarget {
        RefTarget {
            prefix: prefix.map(String::from),
            file: file.map(String::from),
            anchor: anchor.map(String::from),
        }
    }

    #[test]
    fn test_to_url_file_and_anchor() {
        let t = target(Some("../"), Some("class_foo"), Some("a1b2"));
        assert_eq!(t.to_url(".html"), Some("../class_foo.html#a1b2".to_string()));
    }

    #[test]
    fn test_to_url_file_only() {
        let t = target(None, Some("index"), None);
        assert_eq!(t.to_url(".html"), Some("index.html".to_string()));
    }

    #[test]
    fn test_to_url_anchor_only() {
        let t = target(Some(""), None, Some("sec"));
        assert_eq!(t.to_url(".html"), Some("#sec".to_string()));
    }

    #[test]
    fn test_to_url_empty_is_unresolved() {
        assert_eq!(target(Some("../"), None, None).to_url(".html"), None);
        assert_eq!(target(None, Some(""), Some("")).to_url(".html"), None);
    }

    #[test]
    fn test_with_extension() {
        assert_eq!(with_extension("page", ".html"), "page.html");
        assert_eq!(with_extension("page.xhtml", ".html"), "page.xhtml");
        assert_eq!(with_extension("v1.2/page", ".html"), "v1.2/page.html");
    }

    #[test]
    fn test_closure_resolver() {
        let resolver = |name: &str, _ctx: &ResolveContext| {
            (name == "Foo").then(|| target(None, Some("foo"), None))
        };
        let ctx = ResolveContext::default();
        assert!(resolver.resolve("Foo", &ctx).is_some());
        assert!(resolver.resolve("Bar", &ctx).is_none());
        assert!(NullResolver.resolve("Foo", &ctx).is_none());
    }
}
