//! Error taxonomy for the reconciliation toolset.
//!
//! Artifact-level failures always carry the identity of the file that
//! produced them; the top-level error is what library entry points and the
//! CLI propagate. Only the binary converts a failure into a process exit.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure while reading, parsing, or writing a single artifact file.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed artifact {path}: {detail}")]
    Malformed { path: PathBuf, detail: String },

    #[error("required artifact missing: {path}")]
    Missing { path: PathBuf },
}

impl ArtifactError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn malformed(path: &Path, detail: impl Into<String>) -> Self {
        ArtifactError::Malformed {
            path: path.to_path_buf(),
            detail: detail.into(),
        }
    }

    pub fn missing(path: &Path) -> Self {
        ArtifactError::Missing {
            path: path.to_path_buf(),
        }
    }
}

/// Top-level error for migration operations.
#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    /// Zero fragments merged into the parent tree; nothing was written.
    #[error("no fragment merged into the parent tree; output not written")]
    NoMergesSucceeded,
}
