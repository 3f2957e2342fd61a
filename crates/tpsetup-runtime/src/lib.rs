//! Process, filesystem and network side of tpsetup.
//!
//! - [`boost`] - runs the platform's Boost build recipe
//! - [`flip`] - reconciles the prebuilt sync library with the pinned commit
//! - [`deps`] - preflight checks for required tools
//! - [`progress`] - progress reporting for downloads and builds
//!
//! Every fallible operation returns [`ProvisionResult`].

#![deny(unused_crate_dependencies)]

pub mod boost;
pub mod deps;
pub mod error;
pub mod flip;
pub mod progress;

#[cfg(test)]
mod test_utils;

pub use boost::{
    BuildRecipe, BuildStep, CommandRunner, SystemCommandRunner, WorkingDirGuard,
    build_static_library,
};
pub use deps::{DependencyCheck, DependencyReport, check_dependencies, install_hints};
pub use error::{ErrorCategory, ProvisionError, ProvisionResult};
pub use flip::{
    ArchiveFetcher, ExtractSummary, GitSubmoduleSource, HttpArchiveFetcher, ReconcileOutcome,
    StaleDirectoryPolicy, SubmoduleSource, SyncLibraryReconciler, SyncStatus,
};
pub use progress::{NoopProgress, ProgressReporter};

#[cfg(feature = "cli")]
pub use progress::CliProgress;

// Only the cli feature draws terminal bars
#[cfg(not(feature = "cli"))]
use indicatif as _;

// Dev-dependencies only exercised by some test modules
#[cfg(test)]
use serde_json as _;
