//! Version tracking and fetching of the prebuilt `flip` sync library.
//!
//! The commit pinned by the host project's submodule decides which archive
//! is wanted; the marker file inside `ThirdParty/flip` records which one is
//! on disk. See [`SyncLibraryReconciler`].

mod archive;
mod fetch;
mod marker;
mod reconcile;
mod submodule;

pub use archive::{ExtractSummary, extract_archive, validate_archive};
pub use fetch::{ArchiveFetcher, HttpArchiveFetcher};
pub use marker::{read_local_commit, write_local_commit};
pub use reconcile::{ReconcileOutcome, StaleDirectoryPolicy, SyncLibraryReconciler, SyncStatus};
pub use submodule::{GitSubmoduleSource, SubmoduleSource, get_pinned_commit};
