//! Anchor patcher
//!
//! Finds every placeholder anchor in a diagram, resolves the reference name
//! carried in its label, and rewrites the anchor's opening tag in place.
//! Only opening tags are ever rewritten; labels and closing tags are left as
//! they were.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::core::util::{hash_bytes, line_at};
use crate::error::PatchError;
use crate::patch::label::extract_ref_name;
use crate::patch::locate::{locate_anchor, SkipReason};
use crate::patch::sentinel::{find_sentinel, has_sentinel, spellings_in};
use crate::patch::tag::{resolved_tag, unresolved_tag};
use crate::resolve::{RefResolver, ResolveContext, DEFAULT_EXTENSION};

/// How patched content is written back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Truncate and rewrite the file in place
    #[default]
    Overwrite,
    /// Write a temporary file next to the original, then rename it over
    Atomic,
}

/// Options for a patch run
#[derive(Debug, Clone)]
pub struct PatchOptions {
    /// Extension appended to resolved target files without one
    pub extension: String,

    /// Compute everything, write nothing
    pub dry_run: bool,

    pub write_mode: WriteMode,
}

impl Default for PatchOptions {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            dry_run: false,
            write_mode: WriteMode::Overwrite,
        }
    }
}

/// What happened to one placeholder occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorStatus {
    Resolved { url: String },
    Unresolved,
    Skipped(SkipReason),
}

/// One visited placeholder occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorOutcome {
    /// Byte offset of the anchor (or of the placeholder, when skipped early)
    pub offset: usize,

    /// 1-indexed line of `offset`
    pub line: u32,

    /// Reference name, when one was extracted
    pub name: Option<String>,

    pub status: AnchorStatus,
}

impl AnchorOutcome {
    /// Whether this occurrence led to a rewrite
    pub fn is_rewrite(&self) -> bool {
        !matches!(self.status, AnchorStatus::Skipped(_))
    }
}

/// Result of patching a buffer
#[derive(Debug, Clone, Default)]
pub struct PatchReport {
    /// Patched content
    pub content: String,

    /// Visited occurrences in scan order
    pub anchors: Vec<AnchorOutcome>,
}

impl PatchReport {
    /// Report for content that needed no patching
    pub fn unchanged(content: String) -> Self {
        Self {
            content,
            anchors: Vec::new(),
        }
    }

    /// Whether any anchor was rewritten
    pub fn changed(&self) -> bool {
        self.anchors.iter().any(AnchorOutcome::is_rewrite)
    }

    pub fn resolved(&self) -> usize {
        self.count(|s| matches!(s, AnchorStatus::Resolved { .. }))
    }

    pub fn unresolved(&self) -> usize {
        self.count(|s| matches!(s, AnchorStatus::Unresolved))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, AnchorStatus::Skipped(_)))
    }

    fn count(&self, pred: impl Fn(&AnchorStatus) -> bool) -> usize {
        self.anchors.iter().filter(|a| pred(&a.status)).count()
    }
}

/// Result of load-and-patch on one file
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,

    pub report: PatchReport,

    /// Whether the file on disk was rewritten
    pub written: bool,

    /// XXH3 of the content as read
    pub hash_before: String,

    /// XXH3 of the patched content
    pub hash_after: String,
}

/// Rewrites placeholder anchors using an injected resolver
pub struct AnchorPatcher<'r, R: ?Sized> {
    resolver: &'r R,
    options: PatchOptions,
}

impl<'r, R: RefResolver + ?Sized> AnchorPatcher<'r, R> {
    pub fn new(resolver: &'r R) -> Self {
        Self::with_options(resolver, PatchOptions::default())
    }

    pub fn with_options(resolver: &'r R, options: PatchOptions) -> Self {
        Self { resolver, options }
    }

    pub fn options(&self) -> &PatchOptions {
        &self.options
    }

    /// Rewrite every placeholder anchor in `content`.
    ///
    /// Offsets are recomputed on every iteration; after a rewrite the scan
    /// resumes right after the new opening tag, so an anchor is never visited
    /// twice and its label is never rescanned. Occurrences that cannot be
    /// interpreted are skipped and left untouched.
    pub fn patch_content(&self, content: &str, ctx: &ResolveContext) -> PatchReport {
        let mut buf = content.to_string();
        let mut anchors = Vec::new();
        let mut search_start = 0;

        while let Some(pos) = find_sentinel(&buf, search_start) {
            let span = match locate_anchor(&buf, pos) {
                Ok(span) => span,
                Err(reason) => {
                    debug!(offset = pos, %reason, "skipping placeholder");
                    anchors.push(skipped(&buf, pos, reason));
                    search_start = pos + 1;
                    continue;
                }
            };

            let Some(name) = extract_ref_name(span.inner(&buf)) else {
                debug!(offset = pos, "could not extract ref name from anchor content");
                anchors.push(skipped(&buf, span.tag_start, SkipReason::MissingLabel));
                // other placeholders in this tag would hit the same label
                search_start = span.open_end + 1;
                continue;
            };

            let open_tag = span.open_tag(&buf);
            let spellings = spellings_in(open_tag);
            let url = self
                .resolver
                .resolve(&name, ctx)
                .and_then(|target| target.to_url(&self.options.extension));

            let (new_tag, status) = match url {
                Some(url) => {
                    info!(name = %name, url = %url, "resolved reference");
                    (resolved_tag(open_tag, &url), AnchorStatus::Resolved { url })
                }
                None => {
                    info!(name = %name, "unresolved reference, adding onclick handler");
                    (unresolved_tag(open_tag, &name), AnchorStatus::Unresolved)
                }
            };
            debug!(
                plain = spellings.plain,
                namespaced = spellings.namespaced,
                "rewrote opening tag"
            );

            anchors.push(AnchorOutcome {
                offset: span.tag_start,
                line: line_at(&buf, span.tag_start),
                name: Some(name),
                status,
            });

            buf.replace_range(span.tag_start..=span.open_end, &new_tag);
            search_start = span.tag_start + new_tag.len();
        }

        PatchReport {
            content: buf,
            anchors,
        }
    }

    /// Load `path`, patch it, and write it back if anything changed.
    ///
    /// Files without placeholders are never written. Only read and write
    /// failures are errors; anchors that cannot be patched are reported in
    /// the returned [`FileReport`].
    pub fn patch_file(&self, path: &Path, ctx: &ResolveContext) -> Result<FileReport, PatchError> {
        self.patch_file_with(path, ctx, write_content)
    }

    /// [`Self::patch_file`] with the final write supplied by the caller
    fn patch_file_with<W>(
        &self,
        path: &Path,
        ctx: &ResolveContext,
        write: W,
    ) -> Result<FileReport, PatchError>
    where
        W: FnOnce(&Path, &str, WriteMode) -> io::Result<()>,
    {
        debug!(path = %path.display(), "patching file");

        let content = fs::read_to_string(path).map_err(|source| PatchError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let hash_before = hash_bytes(content.as_bytes());

        if !has_sentinel(&content) {
            debug!(path = %path.display(), "no placeholder anchors found");
            return Ok(FileReport {
                path: path.to_path_buf(),
                report: PatchReport::unchanged(content),
                written: false,
                hash_after: hash_before.clone(),
                hash_before,
            });
        }

        let report = self.patch_content(&content, ctx);
        let hash_after = hash_bytes(report.content.as_bytes());

        let written = report.changed() && !self.options.dry_run;
        if written {
            write(path, &report.content, self.options.write_mode).map_err(|source| {
                PatchError::Write {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
            info!(
                path = %path.display(),
                resolved = report.resolved(),
                unresolved = report.unresolved(),
                skipped = report.skipped(),
                "patched file"
            );
        }

        Ok(FileReport {
            path: path.to_path_buf(),
            report,
            written,
            hash_before,
            hash_after,
        })
    }

    /// Patch each file independently; one failure never stops the others
    #[cfg(not(feature = "parallel"))]
    pub fn patch_files(
        &self,
        paths: &[PathBuf],
        ctx: &ResolveContext,
    ) -> Vec<Result<FileReport, PatchError>> {
        paths.iter().map(|p| self.patch_file(p, ctx)).collect()
    }

    /// Patch each file independently; one failure never stops the others
    #[cfg(feature = "parallel")]
    pub fn patch_files(
        &self,
        paths: &[PathBuf],
        ctx: &ResolveContext,
    ) -> Vec<Result<FileReport, PatchError>>
    where
        R: Sync,
    {
        use rayon::prelude::*;

        paths.par_iter().map(|p| self.patch_file(p, ctx)).collect()
    }
}

fn skipped(buf: &str, pos: usize, reason: SkipReason) -> AnchorOutcome {
    AnchorOutcome {
        offset: pos,
        line: line_at(buf, pos),
        name: None,
        status: AnchorStatus::Skipped(reason),
    }
}

fn write_content(path: &Path, content: &str, mode: WriteMode) -> io::Result<()> {
    match mode {
        WriteMode::Overwrite => fs::write(path, content),
        WriteMode::Atomic => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));

            let mut tmp = NamedTempFile::new_in(dir)?;
            tmp.write_all(content.as_bytes())?;
            tmp.as_file().sync_all()?;

            if let Ok(metadata) = fs::metadata(path) {
                fs::set_permissions(tmp.path(), metadata.permissions())?;
            }

            tmp.persist(path).map_err(|e| e.error)?;
            Ok(())
        }
    }
}
