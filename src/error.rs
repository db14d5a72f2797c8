//! Error taxonomy for configuration, external tools, and filesystem failures.
//!
//! Mesh parse failures are not part of [`FixError`]: stages turn them into
//! [`StageOutcome::Unreadable`](crate::stages::StageOutcome::Unreadable) so the runner can fall back.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that stop an entry (or the whole run, for configuration errors).
#[derive(Error, Debug)]
pub enum FixError {
    /// A required environment value is absent or empty and has no default.
    #[error("environment variable `{name}` is not set and has no default")]
    ConfigurationMissing { name: String },

    /// Invalid configuration value (bad suffix, unparsable worker count, empty stage list, ...).
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// External executable could not be launched, exited non-zero, or produced nothing.
    #[error("{tool} failed on {source_path} -> {target_path}: {reason}")]
    ExternalTool {
        tool: &'static str,
        source_path: PathBuf,
        target_path: PathBuf,
        reason: String,
    },

    /// Filesystem error with the path it happened on.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FixError {
    pub fn config<T: std::fmt::Display>(msg: T) -> Self {
        FixError::Configuration(msg.to_string())
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        FixError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// True for failures of the manifold/simplify executables.
    pub fn is_tool_failure(&self) -> bool {
        matches!(self, FixError::ExternalTool { .. })
    }
}

/// Errors from the mesh reader/writer.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The file is not a mesh this crate can parse (unknown suffix, garbage, empty).
    #[error("not a readable mesh: {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MeshError {
    pub fn unreadable<T: std::fmt::Display>(path: &Path, reason: T) -> Self {
        MeshError::Unreadable {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

pub type FixResult<T> = std::result::Result<T, FixError>;
