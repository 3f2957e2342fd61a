//! CLI-specific error types and exit code mapping.
//!
//! Handlers return `anyhow::Result`; `main` looks for a [`ProvisionError`] or
//! a [`CliError`] in the chain and turns it into a process exit code.

use thiserror::Error;
use tpsetup_runtime::{ErrorCategory, ProvisionError};

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Compiler or build driver failed, or the platform is unsupported.
    #[error("{0}")]
    Toolchain(String),

    /// git, the download host or the archive was unusable.
    #[error("{0}")]
    Unavailable(String),

    /// On-disk state needs operator action before retrying.
    #[error("{0}")]
    StaleState(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("{0}")]
    Io(String),

    /// Project layout could not be resolved.
    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl CliError {
    /// Map error to an exit code.
    ///
    /// Exit codes follow sysexits.h:
    /// - 1: General error
    /// - 69: Service unavailable (git, network, archive)
    /// - 71: OS error (toolchain)
    /// - 74: IO error
    /// - 75: Temporary failure (stale state, rerun after fixing)
    /// - 78: Configuration error
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Other(_) => 1,
            Self::Unavailable(_) => 69, // EX_UNAVAILABLE
            Self::Toolchain(_) => 71,   // EX_OSERR
            Self::Io(_) => 74,          // EX_IOERR
            Self::StaleState(_) => 75,  // EX_TEMPFAIL
            Self::Config(_) => 78,      // EX_CONFIG
        }
    }

    fn from_category(category: ErrorCategory, message: String) -> Self {
        match category {
            ErrorCategory::Toolchain => Self::Toolchain(message),
            ErrorCategory::VersionControl | ErrorCategory::Network | ErrorCategory::Archive => {
                Self::Unavailable(message)
            }
            ErrorCategory::StaleState => Self::StaleState(message),
            ErrorCategory::Filesystem => Self::Io(message),
            ErrorCategory::Configuration => Self::Config(message),
        }
    }

    /// Classify a handler error, keeping the full context chain as the message.
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let message = format!("{err:#}");

        for cause in err.chain() {
            if let Some(cli) = cause.downcast_ref::<Self>() {
                return Self::from_category_of(cli, message);
            }
            if let Some(provision) = cause.downcast_ref::<ProvisionError>() {
                return Self::from_category(provision.category(), message);
            }
        }

        Self::Other(message)
    }

    fn from_category_of(other: &Self, message: String) -> Self {
        match other {
            Self::Toolchain(_) => Self::Toolchain(message),
            Self::Unavailable(_) => Self::Unavailable(message),
            Self::StaleState(_) => Self::StaleState(message),
            Self::Io(_) => Self::Io(message),
            Self::Config(_) => Self::Config(message),
            Self::Other(_) => Self::Other(message),
        }
    }
}

impl From<ProvisionError> for CliError {
    fn from(err: ProvisionError) -> Self {
        Self::from_category(err.category(), err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
