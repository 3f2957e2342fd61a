//! Error types for provisioning operations.
//!
//! One enum covers both the build dispatcher and the version reconciler so
//! the CLI can map every failure to an exit code in one place.

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tpsetup_core::{PathError, SubmoduleStatusError, UnsupportedPlatform};

/// Errors that can occur while provisioning third-party components.
#[derive(Debug, Error)]
pub enum ProvisionError {
    // === Platform & Build ===
    /// Host OS outside the supported set
    #[error(transparent)]
    UnsupportedPlatform(#[from] UnsupportedPlatform),

    /// The static library source tree is absent
    #[error("Static library sources not found at {path} (is the submodule checked out?)")]
    MissingSource { path: PathBuf },

    /// A build command could not be started at all
    #[error("Build step '{step}' could not start `{command}`: {source}")]
    ToolchainSpawn {
        step: &'static str,
        command: String,
        #[source]
        source: io::Error,
    },

    /// A build command ran and reported failure
    #[error("Build step '{step}' failed: `{command}` exited with {}", exit_code_label(.code))]
    Toolchain {
        step: &'static str,
        command: String,
        code: Option<i32>,
    },

    // === Version control ===
    /// git could not be run, or refused the query
    #[error("git submodule query failed: {0}")]
    VersionControl(String),

    /// git answered, but not with a usable status line
    #[error("Unexpected git submodule status output: {0}")]
    SubmoduleStatus(#[from] SubmoduleStatusError),

    // === Download & Archive ===
    /// Transport failure or non-success HTTP status
    #[error("Download of {url} failed: {reason}")]
    Download { url: String, reason: String },

    /// Downloaded file is empty, truncated, or not a zip archive
    #[error("Downloaded archive {path} is not usable: {reason}")]
    InvalidArchive { path: PathBuf, reason: String },

    /// An archive entry could not be written safely
    #[error("Failed to extract archive: {0}")]
    Extraction(String),

    /// The sync library directory exists without a valid version marker
    #[error(
        "Sync library directory {path} has no valid version marker (left by an interrupted run?). \
         Remove it or rerun with --replace-stale."
    )]
    StaleDirectory { path: PathBuf },

    // === Path & IO ===
    /// Project layout resolution failed
    #[error("Path error: {0}")]
    Path(#[from] PathError),

    /// A working directory under the project could not be created
    #[error("{0}")]
    Directory(PathError),

    /// IO operation failed
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

/// Coarse grouping of [`ProvisionError`] used for exit codes and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Toolchain,
    VersionControl,
    Network,
    Archive,
    StaleState,
    Filesystem,
    Configuration,
}

impl ProvisionError {
    /// Adapter for `map_err` that attaches a human-readable context to an IO error.
    pub fn io(context: impl Into<String>) -> impl FnOnce(io::Error) -> Self {
        let context = context.into();
        move |source| Self::Io { context, source }
    }

    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::UnsupportedPlatform(_) | Self::ToolchainSpawn { .. } | Self::Toolchain { .. } => {
                ErrorCategory::Toolchain
            }
            Self::VersionControl(_) | Self::SubmoduleStatus(_) => ErrorCategory::VersionControl,
            Self::Download { .. } => ErrorCategory::Network,
            Self::InvalidArchive { .. } | Self::Extraction(_) => ErrorCategory::Archive,
            Self::StaleDirectory { .. } => ErrorCategory::StaleState,
            Self::MissingSource { .. } | Self::Directory(_) | Self::Io { .. } => {
                ErrorCategory::Filesystem
            }
            Self::Path(_) => ErrorCategory::Configuration,
        }
    }
}

#[allow(clippy::ref_option)] // called from the derived Display with a field reference
fn exit_code_label(code: &Option<i32>) -> String {
    code.map_or_else(
        || "no exit code (terminated by signal)".to_string(),
        |c| format!("exit code {c}"),
    )
}

/// Result type alias for provisioning operations
pub type ProvisionResult<T> = Result<T, ProvisionError>;
