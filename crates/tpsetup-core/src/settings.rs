//! Pinned settings for the sync library.
//!
//! Built once at startup and passed by reference; nothing mutates them
//! afterwards.

use serde::Serialize;

use crate::platform::Platform;

/// Submodule path, relative to the project root, whose pinned commit selects the archive.
pub const DEFAULT_SUBMODULE_PATH: &str = "flip";

/// Base URL the prebuilt archives are served from.
pub const DEFAULT_ARCHIVE_BASE_URL: &str =
    "http://developer.irisate.com.s3-website-us-east-1.amazonaws.com/files/";

/// Leading component of every archive name.
pub const DEFAULT_ARCHIVE_PREFIX: &str = "flip-demo";

/// Where the sync library comes from and how its archives are named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncLibrarySettings {
    pub submodule_path: String,
    pub archive_base_url: String,
    pub archive_prefix: String,
}

impl Default for SyncLibrarySettings {
    fn default() -> Self {
        Self {
            submodule_path: DEFAULT_SUBMODULE_PATH.to_string(),
            archive_base_url: DEFAULT_ARCHIVE_BASE_URL.to_string(),
            archive_prefix: DEFAULT_ARCHIVE_PREFIX.to_string(),
        }
    }
}

impl SyncLibrarySettings {
    /// Serve archives from a mirror instead of the default host.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.archive_base_url = url.into();
        self
    }

    /// Track a different submodule path.
    #[must_use]
    pub fn with_submodule_path(mut self, path: impl Into<String>) -> Self {
        self.submodule_path = path.into();
        self
    }

    /// `<prefix>-<platform>-<commit>.zip`
    pub fn archive_name(&self, platform: Platform, commit: &str) -> String {
        format!(
            "{}-{}-{}.zip",
            self.archive_prefix,
            platform.archive_tag(),
            commit
        )
    }

    /// Full download URL for an archive name; tolerant of a missing trailing slash.
    pub fn archive_url(&self, archive_name: &str) -> String {
        format!(
            "{}/{}",
            self.archive_base_url.trim_end_matches('/'),
            archive_name
        )
    }
}
