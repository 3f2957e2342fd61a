//! Querying git for the commit the host project pins.

use std::path::PathBuf;
use std::process::Command;
use tpsetup_core::{PinnedCommit, SubmoduleState, parse_submodule_status};
use tracing::{debug, warn};

use crate::error::{ProvisionError, ProvisionResult};

/// Source of raw `git submodule status` output for one submodule path.
#[cfg_attr(test, mockall::automock)]
pub trait SubmoduleSource: Send + Sync {
    fn status(&self, submodule_path: &str) -> ProvisionResult<String>;
}

/// Runs `git -C <root> submodule status -- <path>`.
#[derive(Debug, Clone)]
pub struct GitSubmoduleSource {
    root: PathBuf,
}

impl GitSubmoduleSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SubmoduleSource for GitSubmoduleSource {
    fn status(&self, submodule_path: &str) -> ProvisionResult<String> {
        debug!(root = %self.root.display(), submodule_path, "Querying submodule status");

        let output = Command::new("git")
            .arg("-C")
            .arg(&self.root)
            .args(["submodule", "status", "--", submodule_path])
            .output()
            .map_err(|e| ProvisionError::VersionControl(format!("could not run git: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProvisionError::VersionControl(format!(
                "`git submodule status -- {submodule_path}` exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Ask `source` for the status of `submodule_path` and extract the pinned commit.
pub fn get_pinned_commit(
    source: &dyn SubmoduleSource,
    submodule_path: &str,
) -> ProvisionResult<PinnedCommit> {
    let output = source.status(submodule_path)?;
    let pinned = parse_submodule_status(&output)?;

    match pinned.state {
        SubmoduleState::InSync => {}
        SubmoduleState::Uninitialized => {
            debug!(submodule_path, "Submodule is not initialized, using recorded commit");
        }
        SubmoduleState::Modified => {
            warn!(
                submodule_path,
                commit = %pinned.commit,
                "Submodule checkout differs from the recorded commit"
            );
        }
    }

    Ok(pinned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    #[test]
    fn test_pinned_commit_comes_from_the_status_line() {
        let mut source = MockSubmoduleSource::new();
        source
            .expect_status()
            .with(eq("flip"))
            .times(1)
            .returning(|_| Ok(" c47e41da05b1e9f0a4a1d6a4f3e43c8f0d6c2b71 flip (heads/master)\n".into()));

        let pinned = get_pinned_commit(&source, "flip").unwrap();
        assert_eq!(pinned.commit, "c47e41da05");
        assert_eq!(pinned.state, SubmoduleState::InSync);
    }

    #[test]
    fn test_git_failure_propagates() {
        let mut source = MockSubmoduleSource::new();
        source
            .expect_status()
            .returning(|_| Err(ProvisionError::VersionControl("not a git repository".into())));

        let err = get_pinned_commit(&source, "flip").unwrap_err();
        assert!(matches!(err, ProvisionError::VersionControl(_)));
    }

    #[test]
    fn test_malformed_output_is_a_status_error() {
        let mut source = MockSubmoduleSource::new();
        source.expect_status().returning(|_| Ok(String::new()));

        let err = get_pinned_commit(&source, "flip").unwrap_err();
        assert!(matches!(err, ProvisionError::SubmoduleStatus(_)));
    }

    #[test]
    fn test_git_outside_a_repository_fails() {
        let dir = tempfile::tempdir().unwrap();
        let source = GitSubmoduleSource::new(dir.path());

        // Either git is missing or it refuses a non-repository; both are errors
        let err = source.status("flip").unwrap_err();
        assert!(matches!(err, ProvisionError::VersionControl(_)));
    }
}
