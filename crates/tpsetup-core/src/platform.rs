//! Host platform identification.
//!
//! The set of platforms is closed: every `match` on [`Platform`] is checked
//! for exhaustiveness, and any other OS is an explicit error.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Returned when the host OS is outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported platform '{0}': expected one of macos, windows, linux")]
pub struct UnsupportedPlatform(pub String);

/// Supported host operating systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    MacOs,
    Windows,
    Linux,
}

impl Platform {
    pub const ALL: [Self; 3] = [Self::MacOs, Self::Windows, Self::Linux];

    /// Identify the platform this binary is running on.
    pub fn detect() -> Result<Self, UnsupportedPlatform> {
        Self::from_os(std::env::consts::OS)
    }

    /// Map an OS identifier (as in `std::env::consts::OS`) to a platform.
    pub fn from_os(os: &str) -> Result<Self, UnsupportedPlatform> {
        match os {
            "macos" => Ok(Self::MacOs),
            "windows" => Ok(Self::Windows),
            "linux" => Ok(Self::Linux),
            other => Err(UnsupportedPlatform(other.to_string())),
        }
    }

    /// Token used in prebuilt archive names (`flip-demo-<token>-<commit>.zip`).
    pub const fn archive_tag(self) -> &'static str {
        match self {
            Self::MacOs => "macos",
            Self::Windows => "windows",
            Self::Linux => "linux",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::MacOs => "macOS",
            Self::Windows => "Windows",
            Self::Linux => "Linux",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Platform {
    type Err = UnsupportedPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_os(&s.to_ascii_lowercase())
    }
}
