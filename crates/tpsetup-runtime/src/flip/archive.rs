//! Validation and extraction of downloaded zip archives.
//!
//! The download is untrusted: it is checked for the zip signature and a
//! readable central directory before anything is written, and every entry
//! name must stay inside the destination directory.

use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

use crate::error::{ProvisionError, ProvisionResult};

/// Leading bytes of a zip local file header.
const ZIP_SIGNATURE: [u8; 4] = *b"PK\x03\x04";

/// What an extraction produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ExtractSummary {
    pub files: usize,
    pub directories: usize,
}

/// Check that `path` holds a readable zip archive with at least one entry.
pub fn validate_archive(path: &Path) -> ProvisionResult<()> {
    let invalid = |reason: String| ProvisionError::InvalidArchive {
        path: path.to_path_buf(),
        reason,
    };

    let mut file = File::open(path).map_err(|e| invalid(format!("cannot open: {e}")))?;

    let mut header = [0u8; 4];
    let mut read = 0;
    while read < header.len() {
        match file.read(&mut header[read..]) {
            Ok(0) => break,
            Ok(n) => read += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(invalid(format!("cannot read: {e}"))),
        }
    }

    if read == 0 {
        return Err(invalid("file is empty".to_string()));
    }
    if read < header.len() || header != ZIP_SIGNATURE {
        return Err(invalid("missing zip signature".to_string()));
    }

    let archive = ZipArchive::new(file).map_err(|e| invalid(format!("corrupt zip: {e}")))?;
    if archive.is_empty() {
        return Err(invalid("archive has no entries".to_string()));
    }

    debug!(path = %path.display(), entries = archive.len(), "Archive validated");
    Ok(())
}

/// Extract every entry of `archive` into `dest`, creating it if needed.
///
/// Fails with [`ProvisionError::Extraction`] on the first entry that cannot be
/// read or whose name would land outside `dest`. Entries already written are
/// left behind; callers extract into a scratch directory.
pub fn extract_archive(archive: &Path, dest: &Path) -> ProvisionResult<ExtractSummary> {
    let file = File::open(archive).map_err(ProvisionError::io(format!(
        "Failed to open {}",
        archive.display()
    )))?;
    let mut zip = ZipArchive::new(file)
        .map_err(|e| ProvisionError::Extraction(format!("failed to read zip archive: {e}")))?;

    fs::create_dir_all(dest).map_err(ProvisionError::io(format!(
        "Failed to create {}",
        dest.display()
    )))?;

    let mut summary = ExtractSummary::default();

    for i in 0..zip.len() {
        let mut entry = zip
            .by_index(i)
            .map_err(|e| ProvisionError::Extraction(format!("failed to read entry {i}: {e}")))?;

        let Some(relative) = entry.enclosed_name() else {
            return Err(ProvisionError::Extraction(format!(
                "entry '{}' escapes the destination directory",
                entry.name()
            )));
        };
        let out_path = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(ProvisionError::io(format!(
                "Failed to create {}",
                out_path.display()
            )))?;
            summary.directories += 1;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(ProvisionError::io(format!(
                "Failed to create {}",
                parent.display()
            )))?;
        }

        let mut out = File::create(&out_path).map_err(ProvisionError::io(format!(
            "Failed to create {}",
            out_path.display()
        )))?;
        io::copy(&mut entry, &mut out).map_err(|e| {
            ProvisionError::Extraction(format!("failed to extract '{}': {e}", entry.name()))
        })?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&out_path, fs::Permissions::from_mode(mode & 0o7777)).map_err(
                ProvisionError::io(format!("Failed to set permissions on {}", out_path.display())),
            )?;
        }

        summary.files += 1;
    }

    debug!(
        dest = %dest.display(),
        files = summary.files,
        directories = summary.directories,
        "Archive extracted"
    );
    Ok(summary)
}
