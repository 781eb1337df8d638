//! Patch API - patch and scan commands

use anyhow::{bail, Context, Result};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::discover::{discover_svg_files, WalkOptions};
use crate::core::model::{Meta, ResultError, ResultItem, ResultSet, Status};
use crate::core::paths::display_path;
use crate::core::render::{RenderConfig, Renderer};
use crate::error::PatchError;
use crate::patch::patcher::{
    AnchorOutcome, AnchorPatcher, AnchorStatus, FileReport, PatchOptions, WriteMode,
};
use crate::patch::scan::{scan_content, FoundAnchor, SpellingData};
use crate::resolve::{NullResolver, RefResolver, RefTable, ResolveContext, DEFAULT_EXTENSION};

/// Everything a patch run needs besides the root
#[derive(Debug, Clone, Default)]
pub struct PatchRequest {
    /// Files or directories, relative to root unless absolute
    pub inputs: Vec<PathBuf>,

    /// Reference table; without one every reference is unresolved
    pub refs: Option<PathBuf>,

    pub context: ResolveContext,

    /// Overrides the table's extension
    pub extension: Option<String>,

    pub dry_run: bool,

    pub atomic: bool,

    pub walk: WalkOptions,
}

/// Patch all requested files and describe the outcome
pub fn patch_to_result_set(root: &Path, request: &PatchRequest) -> Result<ResultSet> {
    let table = match &request.refs {
        Some(path) => Some(RefTable::load(path).context("loading reference table")?),
        None => None,
    };
    let resolver: &(dyn RefResolver + Sync) = match &table {
        Some(table) => table,
        None => &NullResolver,
    };

    let extension = request
        .extension
        .clone()
        .or_else(|| table.as_ref().and_then(|t| t.extension.clone()))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());

    let options = PatchOptions {
        extension,
        dry_run: request.dry_run,
        write_mode: if request.atomic {
            WriteMode::Atomic
        } else {
            WriteMode::Overwrite
        },
    };

    let files = discover_svg_files(root, &request.inputs, request.walk)?;
    let patcher = AnchorPatcher::with_options(resolver, options);

    let mut result_set = ResultSet::new();
    for result in patcher.patch_files(&files, &request.context) {
        match result {
            Ok(report) => result_set.extend(file_report_items(root, &report, request.dry_run)),
            Err(err) => result_set.push(error_item(root, &err)),
        }
    }

    Ok(result_set)
}

/// Run the patch command
pub fn run_patch(root: &Path, request: &PatchRequest, config: RenderConfig) -> Result<()> {
    let result_set = patch_to_result_set(root, request)?;

    let renderer = Renderer::with_config(config);
    println!("{}", renderer.render(&result_set));

    let failed = result_set.error_count();
    if failed > 0 {
        bail!("{} file(s) could not be patched", failed);
    }

    Ok(())
}

/// List placeholder anchors without modifying anything
pub fn scan_to_result_set(root: &Path, inputs: &[PathBuf], walk: WalkOptions) -> Result<ResultSet> {
    let files = discover_svg_files(root, inputs, walk)?;
    let mut result_set = ResultSet::new();

    for file in files {
        let content = match fs::read_to_string(&file) {
            Ok(c) => c,
            Err(source) => {
                let err = PatchError::Read { path: file, source };
                result_set.push(error_item(root, &err));
                continue;
            }
        };

        let path = display_path(&file, root);
        for found in scan_content(&content) {
            result_set.push(found_item(&path, found));
        }
    }

    Ok(result_set)
}

/// Run the scan command
pub fn run_scan(
    root: &Path,
    inputs: &[PathBuf],
    walk: WalkOptions,
    config: RenderConfig,
) -> Result<()> {
    let result_set = scan_to_result_set(root, inputs, walk)?;

    let renderer = Renderer::with_config(config);
    println!("{}", renderer.render(&result_set));

    if result_set.error_count() > 0 {
        bail!("{} file(s) could not be read", result_set.error_count());
    }

    Ok(())
}

fn file_report_items(root: &Path, file: &FileReport, dry_run: bool) -> Vec<ResultItem> {
    let path = display_path(&file.path, root);
    let report = &file.report;

    let status = if file.written {
        Status::Patched
    } else {
        Status::Unchanged
    };

    let mut items = vec![ResultItem::file(path.clone(), status)
        .with_meta(Meta {
            size: Some(report.content.len() as u64),
            hash: Some(file.hash_after.clone()),
            offset: None,
        })
        .with_data(json!({
            "resolved": report.resolved(),
            "unresolved": report.unresolved(),
            "skipped": report.skipped(),
            "written": file.written,
            "dry_run": dry_run,
            "hash_before": file.hash_before,
        }))];

    items.extend(report.anchors.iter().map(|a| outcome_item(&path, a)));
    items
}

fn outcome_item(path: &str, outcome: &AnchorOutcome) -> ResultItem {
    let (status, data) = match &outcome.status {
        AnchorStatus::Resolved { url } => (Status::Resolved, json!({ "url": url })),
        AnchorStatus::Unresolved => (Status::Unresolved, json!({ "url": "#" })),
        AnchorStatus::Skipped(reason) => (
            Status::Skipped,
            json!({ "reason": reason.code(), "message": reason.to_string() }),
        ),
    };

    let mut item = ResultItem::anchor(path, outcome.line, status)
        .with_meta(Meta {
            offset: Some(outcome.offset),
            ..Default::default()
        })
        .with_data(data);
    if let Some(name) = &outcome.name {
        item = item.with_excerpt(name.clone());
    }
    item
}

fn found_item(path: &str, found: FoundAnchor) -> ResultItem {
    let status = if found.problem.is_some() {
        Status::Skipped
    } else {
        Status::Found
    };

    let mut item = ResultItem::anchor(path, found.line, status)
        .with_meta(Meta {
            offset: Some(found.offset),
            ..Default::default()
        })
        .with_data(json!({
            "spellings": SpellingData::from(found.spellings),
            "reason": found.problem.map(|p| p.code()),
        }));
    if let Some(name) = found.name {
        item = item.with_excerpt(name);
    }
    item
}

fn error_item(root: &Path, err: &PatchError) -> ResultItem {
    ResultItem::error(
        Some(display_path(err.path(), root)),
        ResultError::new(err.code(), err.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Kind;
    use tempfile::tempdir;

    const DIAGRAM: &str = concat!(
        "<svg>\n",
        r#"<a href="\ref" xlink:href="\ref"><text>Widget</text></a>"#,
        "\n",
        r#"<a href="\ref"><text>Nowhere</text></a>"#,
        "\n</svg>\n"
    );

    fn write_refs(dir: &Path) -> PathBuf {
        let path = dir.join("refs.json");
        fs::write(
            &path,
            r#"{ "targets": { "Widget": { "file": "class_widget", "anchor": "details" } } }"#,
        )
        .unwrap();
        path
    }

    #[test]
    fn test_patch_to_result_set() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("d.svg"), DIAGRAM).unwrap();
        let request = PatchRequest {
            refs: Some(write_refs(temp.path())),
            context: ResolveContext::new("../", ""),
            ..Default::default()
        };

        let set = patch_to_result_set(temp.path(), &request).unwrap();

        assert_eq!(set.len(), 3);
        assert_eq!(set.items[0].kind, Kind::File);
        assert_eq!(set.items[0].status, Status::Patched);
        assert_eq!(set.items[1].status, Status::Resolved);
        assert_eq!(
            set.items[1].data.as_ref().unwrap()["url"],
            "../class_widget.html#details"
        );
        assert_eq!(set.items[2].status, Status::Unresolved);
        assert_eq!(set.items[2].excerpt.as_deref(), Some("Nowhere"));

        let patched = fs::read_to_string(temp.path().join("d.svg")).unwrap();
        assert!(patched.contains(r#"xlink:href="../class_widget.html#details""#));
    }

    #[test]
    fn test_patch_extension_override() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("d.svg"), DIAGRAM).unwrap();
        let request = PatchRequest {
            refs: Some(write_refs(temp.path())),
            extension: Some(".xhtml".to_string()),
            dry_run: true,
            ..Default::default()
        };

        let set = patch_to_result_set(temp.path(), &request).unwrap();

        assert_eq!(set.items[0].status, Status::Unchanged);
        assert_eq!(
            set.items[1].data.as_ref().unwrap()["url"],
            "class_widget.xhtml#details"
        );
        assert_eq!(fs::read_to_string(temp.path().join("d.svg")).unwrap(), DIAGRAM);
    }

    #[test]
    fn test_patch_missing_refs_file_is_error() {
        let temp = tempdir().unwrap();
        let request = PatchRequest {
            refs: Some(temp.path().join("nope.json")),
            ..Default::default()
        };
        assert!(patch_to_result_set(temp.path(), &request).is_err());
    }

    #[test]
    fn test_patch_missing_input_reported() {
        let temp = tempdir().unwrap();
        let request = PatchRequest {
            inputs: vec![PathBuf::from("gone.svg")],
            ..Default::default()
        };

        let set = patch_to_result_set(temp.path(), &request).unwrap();

        assert_eq!(set.error_count(), 1);
        assert_eq!(set.items[0].errors[0].code, "READ_FAILED");
        assert_eq!(set.items[0].path.as_deref(), Some("gone.svg"));
    }

    #[test]
    fn test_write_failure_item() {
        let temp = tempdir().unwrap();
        let err = PatchError::Write {
            path: temp.path().join("uml").join("a.svg"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        };

        let item = error_item(temp.path(), &err);

        assert_eq!(item.kind, Kind::Error);
        assert_eq!(item.status, Status::Failed);
        assert_eq!(item.path.as_deref(), Some("uml/a.svg"));
        assert_eq!(item.errors[0].code, "WRITE_FAILED");
        assert!(item.errors[0].message.contains("read-only"));
    }

    #[test]
    fn test_scan_to_result_set() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("d.svg"), DIAGRAM).unwrap();

        let set = scan_to_result_set(temp.path(), &[], WalkOptions::default()).unwrap();

        assert_eq!(set.len(), 2);
        assert!(set.items.iter().all(|i| i.status == Status::Found));
        assert_eq!(set.items[0].excerpt.as_deref(), Some("Widget"));
        assert_eq!(set.items[0].range.unwrap().start, 2);
        assert_eq!(fs::read_to_string(temp.path().join("d.svg")).unwrap(), DIAGRAM);
    }
}
