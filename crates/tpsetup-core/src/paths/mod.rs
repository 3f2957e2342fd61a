//! Path utilities for the host project's third-party tree.
//!
//! This module provides the canonical path resolution for every tpsetup
//! component:
//! - Project root (explicit, `TPSETUP_ROOT`, or discovered from the cwd)
//! - `ThirdParty/boost` source directory
//! - `ThirdParty/flip` sync library directory and its `config` marker
//! - Transient download and staging locations
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - No terminal I/O - the CLI decides how to present paths
//! - Environment access is confined to `ProjectLayout::resolve`

mod ensure;
mod error;
mod layout;
mod root;

pub use ensure::ensure_directory;
pub use error::PathError;
pub use layout::{
    MARKER_FILE_NAME, ProjectLayout, ResolvedPaths, STATIC_LIBRARY_DIR, SYNC_LIBRARY_DIR,
    THIRD_PARTY_DIR,
};
pub use root::{PROJECT_ROOT_ENV, ProjectRootSource, find_project_root};
