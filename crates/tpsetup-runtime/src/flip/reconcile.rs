//! Keeping `ThirdParty/flip` at the commit the host project pins.

use serde::Serialize;
use std::fs;
use std::path::Path;
use tpsetup_core::{
    PinnedCommit, Platform, ProjectLayout, SyncLibrarySettings, ensure_directory, is_commit_id,
};
use tracing::{debug, info, warn};

use super::archive::{ExtractSummary, extract_archive, validate_archive};
use super::fetch::ArchiveFetcher;
use super::marker;
use super::submodule::{SubmoduleSource, get_pinned_commit};
use crate::error::{ProvisionError, ProvisionResult};
use crate::progress::{NoopProgress, ProgressReporter};

/// What to do when the sync library directory exists but has no valid marker.
///
/// A directory whose marker names an older commit is a previous install and
/// is always replaced; the policy only governs directories nothing vouches for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleDirectoryPolicy {
    /// Fail with [`ProvisionError::StaleDirectory`] before downloading anything.
    #[default]
    Abort,
    /// Swap in the freshly extracted directory once extraction has succeeded.
    Replace,
}

/// Result of a successful [`SyncLibraryReconciler::reconcile`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReconcileOutcome {
    /// Marker already matched the pinned commit; nothing was fetched.
    UpToDate { commit: String },
    /// A new archive was fetched and extracted.
    Updated {
        /// Marker value before the update, `None` on a first fetch.
        previous: Option<String>,
        current: String,
        archive: String,
    },
}

/// Read-only snapshot used by `tpsetup status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncStatus {
    pub platform: Platform,
    pub pinned: PinnedCommit,
    /// Marker contents, `None` when there is no marker.
    pub local: Option<String>,
    pub needs_fetch: bool,
    pub sync_dir_exists: bool,
    /// The directory exists without a valid marker and needs `--replace-stale`.
    pub stale: bool,
    pub archive_name: String,
    pub archive_url: String,
}

/// Compares the pinned submodule commit with the on-disk marker and fetches
/// the matching prebuilt archive when they differ.
pub struct SyncLibraryReconciler<'a> {
    layout: &'a ProjectLayout,
    settings: &'a SyncLibrarySettings,
    platform: Platform,
    submodules: &'a dyn SubmoduleSource,
    fetcher: &'a dyn ArchiveFetcher,
    stale_policy: StaleDirectoryPolicy,
    progress: &'a dyn ProgressReporter,
}

impl<'a> SyncLibraryReconciler<'a> {
    pub fn new(
        layout: &'a ProjectLayout,
        settings: &'a SyncLibrarySettings,
        platform: Platform,
        submodules: &'a dyn SubmoduleSource,
        fetcher: &'a dyn ArchiveFetcher,
    ) -> Self {
        Self {
            layout,
            settings,
            platform,
            submodules,
            fetcher,
            stale_policy: StaleDirectoryPolicy::default(),
            progress: &NoopProgress,
        }
    }

    #[must_use]
    pub const fn with_stale_policy(mut self, policy: StaleDirectoryPolicy) -> Self {
        self.stale_policy = policy;
        self
    }

    #[must_use]
    pub fn with_progress(mut self, progress: &'a dyn ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    pub fn get_pinned_commit(&self) -> ProvisionResult<PinnedCommit> {
        get_pinned_commit(self.submodules, &self.settings.submodule_path)
    }

    pub fn read_local_commit(&self) -> String {
        marker::read_local_commit(&self.layout.marker_path())
    }

    pub fn write_local_commit(&self, commit: &str) -> ProvisionResult<()> {
        marker::write_local_commit(&self.layout.marker_path(), commit)
    }

    /// Report what [`reconcile`](Self::reconcile) would do, without touching anything.
    pub fn status(&self) -> ProvisionResult<SyncStatus> {
        let pinned = self.get_pinned_commit()?;
        let local = self.read_local_commit();
        let archive_name = self.settings.archive_name(self.platform, &pinned.commit);
        let archive_url = self.settings.archive_url(&archive_name);
        let sync_dir_exists = self.layout.sync_library_dir().exists();

        Ok(SyncStatus {
            platform: self.platform,
            needs_fetch: pinned.commit != local,
            stale: sync_dir_exists && !is_commit_id(&local),
            sync_dir_exists,
            local: (!local.is_empty()).then_some(local),
            pinned,
            archive_name,
            archive_url,
        })
    }

    /// Bring the sync library to the pinned commit.
    ///
    /// The marker is only written after the new directory is in place, so any
    /// failure leaves both the previous directory and the previous marker as
    /// they were.
    pub async fn reconcile(&self) -> ProvisionResult<ReconcileOutcome> {
        let pinned = self.get_pinned_commit()?;
        let local = self.read_local_commit();

        if pinned.commit == local {
            info!(commit = %local, "Sync library is up to date");
            return Ok(ReconcileOutcome::UpToDate { commit: local });
        }

        let sync_dir = self.layout.sync_library_dir();
        if sync_dir.exists() {
            if is_commit_id(&local) {
                info!(
                    path = %sync_dir.display(),
                    previous = %local,
                    "Previous sync library will be replaced"
                );
            } else {
                match self.stale_policy {
                    StaleDirectoryPolicy::Abort => {
                        return Err(ProvisionError::StaleDirectory { path: sync_dir });
                    }
                    StaleDirectoryPolicy::Replace => {
                        warn!(
                            path = %sync_dir.display(),
                            marker = %local,
                            "Sync library without a valid marker will be replaced"
                        );
                    }
                }
            }
        }

        ensure_directory(&self.layout.third_party_dir()).map_err(ProvisionError::Directory)?;

        let archive_name = self.settings.archive_name(self.platform, &pinned.commit);
        let url = self.settings.archive_url(&archive_name);
        let archive_path = self.layout.download_path(&archive_name);
        info!(
            pinned = %pinned.commit,
            local = %local,
            url = %url,
            "Fetching sync library"
        );

        let installed = self.fetch_and_install(&url, &archive_path).await;
        remove_file_quietly(&archive_path);
        let summary = installed?;

        self.write_local_commit(&pinned.commit)?;
        info!(
            commit = %pinned.commit,
            files = summary.files,
            "Sync library updated"
        );

        Ok(ReconcileOutcome::Updated {
            previous: (!local.is_empty()).then_some(local),
            current: pinned.commit,
            archive: archive_name,
        })
    }

    async fn fetch_and_install(
        &self,
        url: &str,
        archive_path: &Path,
    ) -> ProvisionResult<ExtractSummary> {
        let bytes = self.fetcher.fetch(url, archive_path).await?;
        debug!(bytes, path = %archive_path.display(), "Archive downloaded");

        validate_archive(archive_path)?;

        let staging = self.layout.staging_dir();
        if staging.exists() {
            debug!(path = %staging.display(), "Removing leftover staging directory");
            fs::remove_dir_all(&staging).map_err(ProvisionError::io(format!(
                "Failed to remove {}",
                staging.display()
            )))?;
        }

        self.progress.message("Extracting sync library...");
        let summary = match extract_archive(archive_path, &staging) {
            Ok(summary) => summary,
            Err(e) => {
                remove_dir_quietly(&staging);
                return Err(e);
            }
        };

        swap_into_place(
            &staging,
            &self.layout.sync_library_dir(),
            &self.layout.previous_sync_library_dir(),
        )?;

        Ok(summary)
    }
}

/// Replace `target` with `staged`.
///
/// The current `target` is first renamed to `aside` and is only deleted once
/// `staged` has taken its place. If that rename fails it is moved back.
fn swap_into_place(staged: &Path, target: &Path, aside: &Path) -> ProvisionResult<()> {
    if aside.exists() {
        debug!(path = %aside.display(), "Removing leftover previous install");
        fs::remove_dir_all(aside).map_err(ProvisionError::io(format!(
            "Failed to remove {}",
            aside.display()
        )))?;
    }

    let had_previous = target.exists();
    if had_previous {
        fs::rename(target, aside).map_err(ProvisionError::io(format!(
            "Failed to move {} aside",
            target.display()
        )))?;
    }

    if let Err(e) = fs::rename(staged, target) {
        if had_previous {
            if let Err(restore) = fs::rename(aside, target) {
                warn!(
                    path = %aside.display(),
                    error = %restore,
                    "Failed to restore previous sync library"
                );
            }
        }
        remove_dir_quietly(staged);
        return Err(ProvisionError::io(format!(
            "Failed to move {} into place",
            target.display()
        ))(e));
    }

    if had_previous {
        remove_dir_quietly(aside);
    }
    Ok(())
}

fn remove_file_quietly(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "Removed downloaded archive"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove downloaded archive"),
    }
}

fn remove_dir_quietly(path: &Path) {
    match fs::remove_dir_all(path) {
        Ok(()) => debug!(path = %path.display(), "Removed directory"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove directory"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flip::fetch::MockArchiveFetcher;
    use crate::flip::submodule::MockSubmoduleSource;
    use std::io::Write;
    use tempfile::tempdir;
    use zip::write::SimpleFileOptions;

    fn pinned_at(commit: &'static str) -> MockSubmoduleSource {
        let mut source = MockSubmoduleSource::new();
        source
            .expect_status()
            .returning(move |_| Ok(format!(" {commit}0123456789abcdef0123456789 flip (heads/master)")));
        source
    }

    fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        for (name, data) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(data.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    /// Fetcher that writes `body` to the destination and counts calls.
    fn serving(body: Vec<u8>) -> MockArchiveFetcher {
        let mut fetcher = MockArchiveFetcher::new();
        fetcher.expect_fetch().times(1).returning(move |_, dest| {
            fs::write(dest, &body).unwrap();
            Ok(body.len() as u64)
        });
        fetcher
    }

    #[tokio::test]
    async fn test_matching_marker_performs_no_fetch() {
        let dir = tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        let settings = SyncLibrarySettings::default();
        marker::write_local_commit(&layout.marker_path(), "c47e41da05").unwrap();

        let source = pinned_at("c47e41da05");
        let mut fetcher = MockArchiveFetcher::new();
        fetcher.expect_fetch().never();

        let reconciler =
            SyncLibraryReconciler::new(&layout, &settings, Platform::Linux, &source, &fetcher);
        let outcome = reconciler.reconcile().await.unwrap();

        assert_eq!(
            outcome,
            ReconcileOutcome::UpToDate {
                commit: "c47e41da05".into()
            }
        );
    }

    #[tokio::test]
    async fn test_first_fetch_extracts_and_writes_marker() {
        let dir = tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        let settings = SyncLibrarySettings::default();

        let source = pinned_at("aaaaaaaaaa");
        let mut fetcher = MockArchiveFetcher::new();
        let body = zip_bytes(&[("include/flip/Document.h", "#pragma once\n")]);
        fetcher
            .expect_fetch()
            .withf(|url, _| url.ends_with("/flip-demo-macos-aaaaaaaaaa.zip"))
            .times(1)
            .returning(move |_, dest| {
                fs::write(dest, &body).unwrap();
                Ok(body.len() as u64)
            });

        let reconciler =
            SyncLibraryReconciler::new(&layout, &settings, Platform::MacOs, &source, &fetcher);
        let outcome = reconciler.reconcile().await.unwrap();

        assert_eq!(
            outcome,
            ReconcileOutcome::Updated {
                previous: None,
                current: "aaaaaaaaaa".into(),
                archive: "flip-demo-macos-aaaaaaaaaa.zip".into(),
            }
        );
        assert_eq!(reconciler.read_local_commit(), "aaaaaaaaaa");
        assert!(layout.sync_library_dir().join("include/flip/Document.h").is_file());
        assert!(!layout.download_path("flip-demo-macos-aaaaaaaaaa.zip").exists());
        assert!(!layout.staging_dir().exists());
    }

    #[tokio::test]
    async fn test_older_install_is_replaced_by_default() {
        let dir = tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        let settings = SyncLibrarySettings::default();
        marker::write_local_commit(&layout.marker_path(), "bbbbbbbbbb").unwrap();
        fs::write(layout.sync_library_dir().join("old.h"), "old").unwrap();

        let source = pinned_at("aaaaaaaaaa");
        let fetcher = serving(zip_bytes(&[("new.h", "new")]));

        let reconciler =
            SyncLibraryReconciler::new(&layout, &settings, Platform::Linux, &source, &fetcher);
        let outcome = reconciler.reconcile().await.unwrap();

        assert!(matches!(
            outcome,
            ReconcileOutcome::Updated { previous: Some(ref p), .. } if p == "bbbbbbbbbb"
        ));
        assert!(layout.sync_library_dir().join("new.h").is_file());
        assert!(!layout.sync_library_dir().join("old.h").exists());
        assert!(!layout.previous_sync_library_dir().exists());
        assert_eq!(reconciler.read_local_commit(), "aaaaaaaaaa");
    }

    #[tokio::test]
    async fn test_directory_without_marker_aborts_before_download_by_default() {
        let dir = tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        let settings = SyncLibrarySettings::default();
        fs::create_dir_all(layout.sync_library_dir()).unwrap();
        fs::write(layout.sync_library_dir().join("half.h"), "partial").unwrap();

        let source = pinned_at("aaaaaaaaaa");
        let mut fetcher = MockArchiveFetcher::new();
        fetcher.expect_fetch().never();

        let reconciler =
            SyncLibraryReconciler::new(&layout, &settings, Platform::Linux, &source, &fetcher);
        let err = reconciler.reconcile().await.unwrap_err();

        assert!(matches!(err, ProvisionError::StaleDirectory { .. }), "{err}");
        assert!(layout.sync_library_dir().join("half.h").is_file());
    }

    #[tokio::test]
    async fn test_corrupt_marker_counts_as_stale() {
        let dir = tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        let settings = SyncLibrarySettings::default();
        marker::write_local_commit(&layout.marker_path(), "not-a-hash").unwrap();

        let source = pinned_at("aaaaaaaaaa");
        let mut fetcher = MockArchiveFetcher::new();
        fetcher.expect_fetch().never();

        let reconciler =
            SyncLibraryReconciler::new(&layout, &settings, Platform::Linux, &source, &fetcher);
        let err = reconciler.reconcile().await.unwrap_err();

        assert!(matches!(err, ProvisionError::StaleDirectory { .. }), "{err}");
        assert_eq!(reconciler.read_local_commit(), "not-a-hash");
    }

    #[tokio::test]
    async fn test_replace_policy_swaps_unmarked_directory() {
        let dir = tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        let settings = SyncLibrarySettings::default();
        fs::create_dir_all(layout.sync_library_dir()).unwrap();
        fs::write(layout.sync_library_dir().join("half.h"), "partial").unwrap();

        let source = pinned_at("aaaaaaaaaa");
        let fetcher = serving(zip_bytes(&[("new.h", "new")]));

        let reconciler =
            SyncLibraryReconciler::new(&layout, &settings, Platform::Linux, &source, &fetcher)
                .with_stale_policy(StaleDirectoryPolicy::Replace);
        let outcome = reconciler.reconcile().await.unwrap();

        assert!(matches!(outcome, ReconcileOutcome::Updated { previous: None, .. }));
        assert!(layout.sync_library_dir().join("new.h").is_file());
        assert!(!layout.sync_library_dir().join("half.h").exists());
    }

    #[test]
    fn test_failed_swap_restores_previous_directory() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("flip");
        let aside = dir.path().join(".flip.previous");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("config"), "bbbbbbbbbb").unwrap();

        // Staged directory is missing, so the second rename fails
        let err = swap_into_place(&dir.path().join(".flip.partial"), &target, &aside).unwrap_err();

        assert!(matches!(err, ProvisionError::Io { .. }), "{err}");
        assert_eq!(fs::read_to_string(target.join("config")).unwrap(), "bbbbbbbbbb");
        assert!(!aside.exists());
    }

    #[test]
    fn test_swap_clears_leftover_aside_directory() {
        let dir = tempdir().unwrap();
        let staged = dir.path().join(".flip.partial");
        let target = dir.path().join("flip");
        let aside = dir.path().join(".flip.previous");
        fs::create_dir_all(&staged).unwrap();
        fs::write(staged.join("new.h"), "new").unwrap();
        fs::create_dir_all(&aside).unwrap();
        fs::write(aside.join("junk.h"), "junk").unwrap();

        swap_into_place(&staged, &target, &aside).unwrap();

        assert!(target.join("new.h").is_file());
        assert!(!staged.exists());
        assert!(!aside.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unwritable_project_root_is_a_filesystem_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let root = dir.path().join("host");
        fs::create_dir_all(&root).unwrap();
        fs::set_permissions(&root, fs::Permissions::from_mode(0o555)).unwrap();
        // Permission bits do not bind root
        if fs::create_dir(root.join("write-check")).is_ok() {
            return;
        }

        let layout = ProjectLayout::new(&root);
        let settings = SyncLibrarySettings::default();
        let source = pinned_at("aaaaaaaaaa");
        let mut fetcher = MockArchiveFetcher::new();
        fetcher.expect_fetch().never();

        let err = SyncLibraryReconciler::new(&layout, &settings, Platform::Linux, &source, &fetcher)
            .reconcile()
            .await
            .unwrap_err();
        fs::set_permissions(&root, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(matches!(err, ProvisionError::Directory(_)), "{err}");
        assert_eq!(err.category(), crate::ErrorCategory::Filesystem);
    }

    #[tokio::test]
    async fn test_invalid_download_keeps_previous_state() {
        let dir = tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        let settings = SyncLibrarySettings::default();
        marker::write_local_commit(&layout.marker_path(), "bbbbbbbbbb").unwrap();

        let source = pinned_at("aaaaaaaaaa");
        let fetcher = serving(b"<Error><Code>NoSuchKey</Code></Error>".to_vec());

        let reconciler =
            SyncLibraryReconciler::new(&layout, &settings, Platform::Windows, &source, &fetcher)
                .with_stale_policy(StaleDirectoryPolicy::Replace);
        let err = reconciler.reconcile().await.unwrap_err();

        assert!(matches!(err, ProvisionError::InvalidArchive { .. }), "{err}");
        assert_eq!(reconciler.read_local_commit(), "bbbbbbbbbb");
        assert!(!layout
            .download_path("flip-demo-windows-aaaaaaaaaa.zip")
            .exists());
    }

    #[tokio::test]
    async fn test_leftover_staging_directory_is_cleared() {
        let dir = tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        let settings = SyncLibrarySettings::default();
        fs::create_dir_all(layout.staging_dir()).unwrap();
        fs::write(layout.staging_dir().join("junk.txt"), "junk").unwrap();

        let source = pinned_at("aaaaaaaaaa");
        let fetcher = serving(zip_bytes(&[("flip.h", "ok")]));

        let reconciler =
            SyncLibraryReconciler::new(&layout, &settings, Platform::Linux, &source, &fetcher);
        reconciler.reconcile().await.unwrap();

        assert!(layout.sync_library_dir().join("flip.h").is_file());
        assert!(!layout.sync_library_dir().join("junk.txt").exists());
    }

    #[test]
    fn test_status_reports_pending_fetch() {
        let dir = tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        let settings = SyncLibrarySettings::default();

        let source = pinned_at("aaaaaaaaaa");
        let fetcher = MockArchiveFetcher::new();

        let status =
            SyncLibraryReconciler::new(&layout, &settings, Platform::Linux, &source, &fetcher)
                .status()
                .unwrap();

        assert!(status.needs_fetch);
        assert_eq!(status.local, None);
        assert!(!status.sync_dir_exists);
        assert!(!status.stale);
        assert_eq!(status.archive_name, "flip-demo-linux-aaaaaaaaaa.zip");
        assert!(status.archive_url.ends_with("/files/flip-demo-linux-aaaaaaaaaa.zip"));
    }

    #[test]
    fn test_outcome_serializes_with_tag() {
        let json = serde_json::to_value(ReconcileOutcome::UpToDate {
            commit: "c47e41da05".into(),
        })
        .unwrap();
        assert_eq!(json["outcome"], "up_to_date");
        assert_eq!(json["commit"], "c47e41da05");
    }
}
