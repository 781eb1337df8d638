//! Error types
//!
//! Library operations return these typed errors; the command layer wraps them
//! with `anyhow` context.

use std::path::PathBuf;

/// Fatal failure of a load-and-patch operation
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PatchError {
    /// Short machine-readable code for result items
    pub fn code(&self) -> &'static str {
        match self {
            PatchError::Read { .. } => "READ_FAILED",
            PatchError::Write { .. } => "WRITE_FAILED",
        }
    }

    pub fn path(&self) -> &PathBuf {
        match self {
            PatchError::Read { path, .. } | PatchError::Write { path, .. } => path,
        }
    }
}

/// Failure to load a reference table
#[derive(Debug, thiserror::Error)]
pub enum RefTableError {
    #[error("failed to read reference table {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse reference table {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
