//! The version marker recording which sync library commit is on disk.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tpsetup_core::truncate_commit;
use tracing::{debug, warn};

use crate::error::{ProvisionError, ProvisionResult};

/// Commit recorded in the marker, or an empty string if there is none.
///
/// Only the first line counts, with trailing whitespace removed, and it is
/// cut to the commit id length. A
/// marker that exists but cannot be read is treated as absent, which forces
/// a fresh fetch rather than failing the run.
pub fn read_local_commit(marker: &Path) -> String {
    match fs::read_to_string(marker) {
        Ok(contents) => {
            let first = contents.lines().next().unwrap_or_default().trim_end();
            truncate_commit(first)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %marker.display(), "No version marker");
            String::new()
        }
        Err(e) => {
            warn!(
                path = %marker.display(),
                error = %e,
                "Version marker is unreadable, treating it as absent"
            );
            String::new()
        }
    }
}

/// Overwrite the marker with exactly `commit`.
pub fn write_local_commit(marker: &Path, commit: &str) -> ProvisionResult<()> {
    if let Some(parent) = marker.parent() {
        fs::create_dir_all(parent).map_err(ProvisionError::io(format!(
            "Failed to create {}",
            parent.display()
        )))?;
    }
    fs::write(marker, commit).map_err(ProvisionError::io(format!(
        "Failed to write version marker {}",
        marker.display()
    )))?;
    debug!(path = %marker.display(), commit, "Wrote version marker");
    Ok(())
}
