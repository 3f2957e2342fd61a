//! Scoped change of the process working directory.

use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{ProvisionError, ProvisionResult};

/// Enters a directory on creation and returns to the previous one on drop.
///
/// The restore happens on every exit path, including `?` and panics. The
/// working directory is process-wide, so only one guard should be live at a time.
#[derive(Debug)]
pub struct WorkingDirGuard {
    original: PathBuf,
}

impl WorkingDirGuard {
    pub fn enter(dir: &Path) -> ProvisionResult<Self> {
        let original = env::current_dir()
            .map_err(ProvisionError::io("Failed to read current directory"))?;
        env::set_current_dir(dir).map_err(ProvisionError::io(format!(
            "Failed to enter {}",
            dir.display()
        )))?;
        debug!(from = %original.display(), to = %dir.display(), "Changed working directory");
        Ok(Self { original })
    }

    /// Directory that will be restored on drop.
    pub fn original(&self) -> &Path {
        &self.original
    }
}

impl Drop for WorkingDirGuard {
    fn drop(&mut self) {
        if let Err(e) = env::set_current_dir(&self.original) {
            warn!(
                dir = %self.original.display(),
                error = %e,
                "Failed to restore working directory"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::lock_cwd;
    use tempfile::tempdir;

    #[test]
    fn test_restores_directory_on_drop() {
        let _lock = lock_cwd();
        let before = env::current_dir().unwrap();
        let target = tempdir().unwrap();

        {
            let guard = WorkingDirGuard::enter(target.path()).unwrap();
            assert_eq!(guard.original(), before);
            assert_eq!(
                env::current_dir().unwrap().canonicalize().unwrap(),
                target.path().canonicalize().unwrap()
            );
        }

        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[test]
    fn test_restores_directory_after_panic() {
        let _lock = lock_cwd();
        let before = env::current_dir().unwrap();
        let target = tempdir().unwrap();
        let path = target.path().to_path_buf();

        let result = std::panic::catch_unwind(move || {
            let _guard = WorkingDirGuard::enter(&path).unwrap();
            panic!("step blew up");
        });

        assert!(result.is_err());
        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[test]
    fn test_missing_directory_leaves_cwd_untouched() {
        let _lock = lock_cwd();
        let before = env::current_dir().unwrap();
        let target = tempdir().unwrap();

        let err = WorkingDirGuard::enter(&target.path().join("nope")).unwrap_err();
        assert!(matches!(err, ProvisionError::Io { .. }));
        assert_eq!(env::current_dir().unwrap(), before);
    }
}
