//! Static build of the Boost sources shipped under `ThirdParty/boost`.
//!
//! The platform picks a [`BuildRecipe`]; every step then runs in the source
//! directory through a [`CommandRunner`]. The first failing step stops the
//! build and nothing is cleaned up: a half-built tree is left for inspection.

mod recipe;
mod runner;
mod workdir;

pub use recipe::{BuildRecipe, BuildStep};
pub use runner::{CommandRunner, SystemCommandRunner};
pub use workdir::WorkingDirGuard;

#[cfg(test)]
pub use runner::MockCommandRunner;

use std::path::Path;
use tpsetup_core::Platform;
use tracing::info;

use crate::error::{ProvisionError, ProvisionResult};
use crate::progress::ProgressReporter;

/// Build Boost for `platform` inside `source_dir`.
///
/// The process working directory is switched to `source_dir` for the
/// duration of the build and restored before this returns, whatever the outcome.
pub fn build_static_library(
    source_dir: &Path,
    platform: Platform,
    runner: &dyn CommandRunner,
    progress: &dyn ProgressReporter,
) -> ProvisionResult<BuildRecipe> {
    if !source_dir.is_dir() {
        return Err(ProvisionError::MissingSource {
            path: source_dir.to_path_buf(),
        });
    }

    let recipe = BuildRecipe::for_platform(platform);
    info!(
        platform = %platform,
        toolset = recipe.toolset,
        dir = %source_dir.display(),
        "Building Boost"
    );

    let _cwd = WorkingDirGuard::enter(source_dir)?;
    let total = recipe.steps.len();

    for (index, step) in recipe.steps.iter().enumerate() {
        progress.message(&format!("[{}/{}] {}: {}", index + 1, total, step.label, step));
        if let Err(e) = runner.run(step) {
            progress.finish_with_error(&format!("✗ Boost {} step failed", step.label));
            return Err(e);
        }
    }

    info!(steps = total, "Boost build finished");
    Ok(recipe)
}
