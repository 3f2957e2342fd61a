//! Path-related error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during project layout resolution and directory operations.
#[derive(Debug, Error)]
pub enum PathError {
    /// No ancestor of the starting directory looks like the host project.
    #[error(
        "Cannot find the project root: no ancestor of {start} contains a '{marker}' directory \
         (pass --root or set TPSETUP_ROOT)"
    )]
    ProjectRootNotFound { start: PathBuf, marker: &'static str },

    /// A path was expected to be a directory but was not.
    #[error("{0} exists but is not a directory")]
    NotADirectory(PathBuf),

    /// An explicitly requested directory does not exist.
    #[error("Directory {0} does not exist")]
    DirectoryNotFound(PathBuf),

    /// Failed to create a directory.
    #[error("Failed to create directory {path}: {reason}")]
    CreateFailed { path: PathBuf, reason: String },

    /// An empty path was provided.
    #[error("Path cannot be empty")]
    EmptyPath,

    /// Failed to get the current working directory.
    #[error("Cannot determine current directory: {0}")]
    CurrentDirError(String),
}
