//! File-backed reference table
//!
//! A JSON document mapping reference names to documentation targets:
//!
//! ```json
//! {
//!   "extension": ".html",
//!   "projects": { "std": "https://docs.example.org/std" },
//!   "targets": {
//!     "ns::Widget": { "file": "class_ns_1_1_widget" },
//!     "ns::Widget::draw": { "file": "class_ns_1_1_widget", "anchor": "a3f0" },
//!     "string": { "file": "string", "project": "std" }
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::RefTableError;
use crate::resolve::{RefResolver, RefTarget, ResolveContext};

/// Separator between scope components in reference names
const SCOPE_SEPARATOR: &str = "::";

/// One known documentation target
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,

    /// Tag of the external project this target lives in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
}

/// Reference table loaded from JSON
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefTable {
    /// Document extension for target files (falls back to the patch options)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,

    /// External project tag -> destination
    #[serde(default)]
    pub projects: HashMap<String, String>,

    /// Reference name -> target
    #[serde(default)]
    pub targets: HashMap<String, TableEntry>,
}

impl RefTable {
    /// Load a table from a JSON file
    pub fn load(path: &Path) -> Result<Self, RefTableError> {
        let content = fs::read_to_string(path).map_err(|source| RefTableError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let table: RefTable =
            serde_json::from_str(&content).map_err(|source| RefTableError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(
            path = %path.display(),
            targets = table.targets.len(),
            projects = table.projects.len(),
            "loaded reference table"
        );

        Ok(table)
    }

    /// Find the entry for `name`, walking `scope` outward.
    ///
    /// For scope `a::b` the candidates are `a::b::name`, `a::name`, `name`.
    /// A leading `::` on the name skips the scope walk.
    pub fn lookup(&self, name: &str, scope: &str) -> Option<&TableEntry> {
        if let Some(global) = name.strip_prefix(SCOPE_SEPARATOR) {
            return self.targets.get(global);
        }

        let mut scope = scope.trim_start_matches(SCOPE_SEPARATOR);
        while !scope.is_empty() {
            let qualified = format!("{}{}{}", scope, SCOPE_SEPARATOR, name);
            if let Some(entry) = self.targets.get(&qualified) {
                return Some(entry);
            }
            scope = match scope.rfind(SCOPE_SEPARATOR) {
                Some(i) => &scope[..i],
                None => "",
            };
        }

        self.targets.get(name)
    }

    /// Prefix for an entry: the relative path for local targets, the project
    /// destination for external ones
    fn prefix_for(&self, entry: &TableEntry, ctx: &ResolveContext) -> Option<String> {
        let Some(tag) = &entry.project else {
            return Some(ctx.rel_path.clone());
        };

        let Some(dest) = self.projects.get(tag) else {
            warn!(project = %tag, "unknown project tag in reference table");
            return None;
        };

        let mut prefix = if is_absolute_destination(dest) {
            dest.clone()
        } else {
            format!("{}{}", ctx.rel_path, dest)
        };
        if !prefix.is_empty() && !prefix.ends_with('/') {
            prefix.push('/');
        }

        Some(prefix)
    }
}

impl RefResolver for RefTable {
    fn resolve(&self, name: &str, ctx: &ResolveContext) -> Option<RefTarget> {
        let entry = self.lookup(name, &ctx.scope)?;
        let prefix = self.prefix_for(entry, ctx)?;

        Some(RefTarget {
            prefix: Some(prefix),
            file: entry.file.clone(),
            anchor: entry.anchor.clone(),
        })
    }
}

/// Absolute URLs and rooted paths are used without the relative prefix
fn is_absolute_destination(dest: &str) -> bool {
    dest.starts_with('/') || dest.contains("://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_table() -> RefTable {
        serde_json::from_str(
            r#"{
                "projects": { "std": "https://docs.example.org/std", "local": "ext/docs" },
                "targets": {
                    "Widget": { "file": "class_widget" },
                    "ns::Widget": { "file": "class_ns_widget" },
                    "ns::Widget::draw": { "file": "class_ns_widget", "anchor": "a3f0" },
                    "string": { "file": "string", "project": "std" },
                    "helper": { "file": "helper", "project": "local" },
                    "orphan": { "file": "orphan", "project": "missing" }
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_lookup_walks_scope_outward() {
        let table = sample_table();
        assert_eq!(
            table.lookup("draw", "ns::Widget").unwrap().anchor.as_deref(),
            Some("a3f0")
        );
        assert_eq!(
            table.lookup("Widget", "ns::Other").unwrap().file.as_deref(),
            Some("class_ns_widget")
        );
        assert_eq!(
            table.lookup("Widget", "").unwrap().file.as_deref(),
            Some("class_widget")
        );
        assert!(table.lookup("draw", "").is_none());
    }

    #[test]
    fn test_lookup_global_name() {
        let table = sample_table();
        assert_eq!(
            table.lookup("::Widget", "ns").unwrap().file.as_deref(),
            Some("class_widget")
        );
    }

    #[test]
    fn test_resolve_local_uses_rel_path() {
        let table = sample_table();
        let ctx = ResolveContext::new("../../", "");
        let target = table.resolve("Widget", &ctx).unwrap();
        assert_eq!(target.to_url(".html").unwrap(), "../../class_widget.html");
    }

    #[test]
    fn test_resolve_external_projects() {
        let table = sample_table();
        let ctx = ResolveContext::new("../", "");

        let absolute = table.resolve("string", &ctx).unwrap();
        assert_eq!(
            absolute.to_url(".html").unwrap(),
            "https://docs.example.org/std/string.html"
        );

        let relative = table.resolve("helper", &ctx).unwrap();
        assert_eq!(relative.to_url(".html").unwrap(), "../ext/docs/helper.html");
    }

    #[test]
    fn test_resolve_unknown_project_is_unresolved() {
        let table = sample_table();
        assert!(table.resolve("orphan", &ResolveContext::default()).is_none());
    }

    #[test]
    fn test_load_errors() {
        let temp = tempdir().unwrap();

        let missing = RefTable::load(&temp.path().join("nope.json"));
        assert!(matches!(missing, Err(RefTableError::Read { .. })));

        let bad = temp.path().join("bad.json");
        fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(
            RefTable::load(&bad),
            Err(RefTableError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("refs.json");
        fs::write(&path, r#"{ "targets": { "A": { "anchor": "x" } } }"#).unwrap();

        let table = RefTable::load(&path).unwrap();
        assert!(table.extension.is_none());
        assert!(table.projects.is_empty());
        assert_eq!(table.targets.len(), 1);
    }
}
