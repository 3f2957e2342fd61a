//! Core domain types for tpsetup.
//!
//! This crate owns everything that can be decided without spawning a process
//! or touching the network:
//!
//! - [`paths`] - project root discovery and the fixed `ThirdParty/` layout
//! - [`platform`] - the closed set of supported host platforms
//! - [`settings`] - pinned constants for the sync library archive
//! - [`commit`] - parsing of `git submodule status` output
//!
//! OS and process concerns live in `tpsetup-runtime`.

#![deny(unused_crate_dependencies)]

pub mod commit;
pub mod paths;
pub mod platform;
pub mod settings;

pub use commit::{
    COMMIT_ID_LEN, PinnedCommit, SubmoduleState, SubmoduleStatusError, is_commit_id,
    parse_submodule_status, truncate_commit,
};
pub use paths::{
    PathError, ProjectLayout, ProjectRootSource, ResolvedPaths, ensure_directory,
    find_project_root,
};
pub use platform::{Platform, UnsupportedPlatform};
pub use settings::{
    DEFAULT_ARCHIVE_BASE_URL, DEFAULT_ARCHIVE_PREFIX, DEFAULT_SUBMODULE_PATH, SyncLibrarySettings,
};

// Dev-dependencies only exercised by some test modules
#[cfg(test)]
use serde_json as _;
#[cfg(test)]
use tempfile as _;
