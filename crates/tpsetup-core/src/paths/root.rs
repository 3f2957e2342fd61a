//! Project root discovery.

use serde::Serialize;
use std::path::{Path, PathBuf};

use super::error::PathError;
use super::layout::THIRD_PARTY_DIR;

/// Environment variable that pins the project root.
pub const PROJECT_ROOT_ENV: &str = "TPSETUP_ROOT";

/// Upper bound on how many ancestors are inspected during discovery.
const MAX_ANCESTOR_DEPTH: usize = 16;

/// How the project root was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectRootSource {
    /// Passed by the caller (`--root`).
    Explicit,
    /// Read from `TPSETUP_ROOT` (possibly via `.env`).
    EnvVar,
    /// Nearest ancestor of the working directory holding `ThirdParty/`.
    Discovered,
}

/// Walk up from `start` and return the first directory that contains `ThirdParty/`.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .take(MAX_ANCESTOR_DEPTH)
        .find(|dir| dir.join(THIRD_PARTY_DIR).is_dir())
        .map(Path::to_path_buf)
}

/// Resolve the project root without touching process state.
///
/// Resolution order:
/// 1. Explicit path provided by caller (highest priority)
/// 2. `TPSETUP_ROOT` value, if non-blank
/// 3. Discovery from `cwd`
pub(super) fn resolve_root(
    explicit: Option<&Path>,
    env_value: Option<&str>,
    cwd: &Path,
) -> Result<(PathBuf, ProjectRootSource), PathError> {
    if let Some(path) = explicit {
        return Ok((existing_dir(path, cwd)?, ProjectRootSource::Explicit));
    }

    if let Some(value) = env_value.map(str::trim).filter(|v| !v.is_empty()) {
        return Ok((
            existing_dir(Path::new(value), cwd)?,
            ProjectRootSource::EnvVar,
        ));
    }

    find_project_root(cwd)
        .map(|root| (root, ProjectRootSource::Discovered))
        .ok_or_else(|| PathError::ProjectRootNotFound {
            start: cwd.to_path_buf(),
            marker: THIRD_PARTY_DIR,
        })
}

fn existing_dir(path: &Path, cwd: &Path) -> Result<PathBuf, PathError> {
    if path.as_os_str().is_empty() {
        return Err(PathError::EmptyPath);
    }

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };

    if !absolute.exists() {
        return Err(PathError::DirectoryNotFound(absolute));
    }
    if !absolute.is_dir() {
        return Err(PathError::NotADirectory(absolute));
    }
    Ok(absolute)
}
