//! SVG file discovery
//!
//! Uses the ignore crate for traversal, so .gitignore and friends are honoured
//! unless disabled.

use anyhow::Result;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

use crate::core::paths::{is_svg, resolve_under_root};

/// Options controlling directory traversal
#[derive(Debug, Clone, Copy)]
pub struct WalkOptions {
    /// Include hidden files/directories
    pub hidden: bool,
    /// Respect ignore files
    pub ignore: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            hidden: false,
            ignore: true,
        }
    }
}

/// Collect SVG files to process.
///
/// Each input is taken relative to `root`. Directories are walked for `*.svg`
/// files; anything else is passed through as-is so that a missing file later
/// surfaces as a read failure. With no inputs, `root` itself is walked.
/// The result is sorted and free of duplicates.
pub fn discover_svg_files(
    root: &Path,
    inputs: &[PathBuf],
    options: WalkOptions,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if inputs.is_empty() {
        walk_dir(root, options, &mut files);
    }

    for input in inputs {
        let path = resolve_under_root(root, input);
        if path.is_dir() {
            walk_dir(&path, options, &mut files);
        } else {
            files.push(path);
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn walk_dir(dir: &Path, options: WalkOptions, files: &mut Vec<PathBuf>) {
    let mut builder = WalkBuilder::new(dir);
    builder
        .hidden(!options.hidden)
        .ignore(options.ignore)
        .git_ignore(options.ignore)
        .git_global(options.ignore)
        .git_exclude(options.ignore);

    for entry in builder.build() {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };

        let path = entry.path();
        if path.is_file() && is_svg(path) {
            files.push(path.to_path_buf());
        }
    }
}
