//! Fixed layout of the host project's third-party tree.
//!
//! ```text
//! <root>/
//!   ThirdParty/
//!     boost/               static library sources, built in place
//!     flip/                prebuilt sync library
//!       config             version marker
//!     .flip.partial/       extraction staging (transient)
//!     .flip.previous/      previous install during the swap (transient)
//!     flip-demo-*.zip      downloaded archive (transient)
//! ```

use serde::Serialize;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::error::PathError;
use super::root::{PROJECT_ROOT_ENV, ProjectRootSource, resolve_root};

/// Directory under the project root holding all third-party components.
pub const THIRD_PARTY_DIR: &str = "ThirdParty";

/// Static library source directory, relative to [`THIRD_PARTY_DIR`].
pub const STATIC_LIBRARY_DIR: &str = "boost";

/// Sync library directory, relative to [`THIRD_PARTY_DIR`].
pub const SYNC_LIBRARY_DIR: &str = "flip";

/// Version marker file inside the sync library directory.
pub const MARKER_FILE_NAME: &str = "config";

const STAGING_DIR_NAME: &str = ".flip.partial";

const PREVIOUS_DIR_NAME: &str = ".flip.previous";

/// Resolved locations of everything tpsetup reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
    source: ProjectRootSource,
}

impl ProjectLayout {
    /// Layout rooted at an already-known directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            source: ProjectRootSource::Explicit,
        }
    }

    /// Resolve the layout from an optional explicit root, `TPSETUP_ROOT`, or the cwd.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, PathError> {
        let cwd = env::current_dir().map_err(|e| PathError::CurrentDirError(e.to_string()))?;
        let env_value = env::var(PROJECT_ROOT_ENV).ok();

        let (root, source) = resolve_root(explicit, env_value.as_deref(), &cwd)?;
        debug!(root = %root.display(), ?source, "Resolved project root");

        Ok(Self { root, source })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub const fn source(&self) -> ProjectRootSource {
        self.source
    }

    pub fn third_party_dir(&self) -> PathBuf {
        self.root.join(THIRD_PARTY_DIR)
    }

    /// Boost source root; build commands run from here.
    pub fn static_library_dir(&self) -> PathBuf {
        self.third_party_dir().join(STATIC_LIBRARY_DIR)
    }

    pub fn sync_library_dir(&self) -> PathBuf {
        self.third_party_dir().join(SYNC_LIBRARY_DIR)
    }

    pub fn marker_path(&self) -> PathBuf {
        self.sync_library_dir().join(MARKER_FILE_NAME)
    }

    /// Scratch directory an archive is extracted into before it replaces the sync library.
    pub fn staging_dir(&self) -> PathBuf {
        self.third_party_dir().join(STAGING_DIR_NAME)
    }

    /// Where the installed sync library is moved while the staged one is renamed into place.
    pub fn previous_sync_library_dir(&self) -> PathBuf {
        self.third_party_dir().join(PREVIOUS_DIR_NAME)
    }

    /// Where a downloaded archive is kept until extraction finishes.
    pub fn download_path(&self, archive_name: &str) -> PathBuf {
        self.third_party_dir().join(archive_name)
    }

    /// Snapshot of every path for display or JSON output.
    pub fn resolved(&self) -> ResolvedPaths {
        ResolvedPaths {
            root: self.root.clone(),
            root_source: self.source,
            third_party_dir: self.third_party_dir(),
            static_library_dir: self.static_library_dir(),
            sync_library_dir: self.sync_library_dir(),
            marker_path: self.marker_path(),
        }
    }
}

/// All resolved paths captured in a single struct, as shown by `tpsetup paths`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPaths {
    pub root: PathBuf,
    pub root_source: ProjectRootSource,
    pub third_party_dir: PathBuf,
    pub static_library_dir: PathBuf,
    pub sync_library_dir: PathBuf,
    pub marker_path: PathBuf,
}

impl std::fmt::Display for ResolvedPaths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "root = {}", self.root.display())?;
        writeln!(f, "root_source = {:?}", self.root_source)?;
        writeln!(f, "third_party_dir = {}", self.third_party_dir.display())?;
        writeln!(
            f,
            "static_library_dir = {}",
            self.static_library_dir.display()
        )?;
        writeln!(f, "sync_library_dir = {}", self.sync_library_dir.display())?;
        write!(f, "marker_path = {}", self.marker_path.display())
    }
}
