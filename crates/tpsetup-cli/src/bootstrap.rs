//! CLI bootstrap - the composition root.
//!
//! This is the only place where concrete collaborators are chosen:
//! - the real process runner for the Boost toolchain
//! - `git` as the submodule source
//! - the `reqwest` fetcher with a terminal progress bar
//!
//! Handlers receive a [`CliContext`] and never construct these themselves.
//! Tests swap any of them through the `with_*` methods.

use std::path::PathBuf;
use std::sync::Arc;

use tpsetup_core::{Platform, ProjectLayout, SyncLibrarySettings};
use tpsetup_runtime::{
    ArchiveFetcher, BuildRecipe, CliProgress, CommandRunner, GitSubmoduleSource,
    HttpArchiveFetcher, ProvisionError, StaleDirectoryPolicy, SubmoduleSource,
    SyncLibraryReconciler, SystemCommandRunner,
};
use tracing::debug;

use crate::parser::Cli;

/// Settings taken from flags and environment for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    pub root: Option<PathBuf>,
    pub base_url: Option<String>,
    pub submodule: Option<String>,
    pub replace_stale: bool,
}

impl CliConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            root: cli.root.clone(),
            base_url: cli.base_url.clone(),
            submodule: cli.submodule.clone(),
            replace_stale: cli.replace_stale,
        }
    }

    pub fn resolve_layout(&self) -> Result<ProjectLayout, ProvisionError> {
        ProjectLayout::resolve(self.root.as_deref()).map_err(ProvisionError::from)
    }

    /// Defaults with any mirror or submodule override applied.
    pub fn settings(&self) -> SyncLibrarySettings {
        let mut settings = SyncLibrarySettings::default();
        if let Some(url) = self.base_url.as_deref().filter(|u| !u.trim().is_empty()) {
            settings = settings.with_base_url(url.trim());
        }
        if let Some(path) = self.submodule.as_deref().filter(|p| !p.trim().is_empty()) {
            settings = settings.with_submodule_path(path.trim());
        }
        settings
    }

    pub const fn stale_policy(&self) -> StaleDirectoryPolicy {
        if self.replace_stale {
            StaleDirectoryPolicy::Replace
        } else {
            StaleDirectoryPolicy::Abort
        }
    }
}

/// Fully composed context for command handlers.
pub struct CliContext {
    pub layout: ProjectLayout,
    pub settings: SyncLibrarySettings,
    pub platform: Platform,
    pub stale_policy: StaleDirectoryPolicy,
    pub runner: Box<dyn CommandRunner>,
    pub submodules: Box<dyn SubmoduleSource>,
    pub fetcher: Box<dyn ArchiveFetcher>,
    pub progress: Arc<CliProgress>,
}

impl CliContext {
    #[must_use]
    pub fn with_runner(mut self, runner: impl CommandRunner + 'static) -> Self {
        self.runner = Box::new(runner);
        self
    }

    #[must_use]
    pub fn with_submodules(mut self, submodules: impl SubmoduleSource + 'static) -> Self {
        self.submodules = Box::new(submodules);
        self
    }

    #[must_use]
    pub fn with_fetcher(mut self, fetcher: impl ArchiveFetcher + 'static) -> Self {
        self.fetcher = Box::new(fetcher);
        self
    }

    pub const fn recipe(&self) -> BuildRecipe {
        BuildRecipe::for_platform(self.platform)
    }

    /// Reconciler wired to the context's submodule source, fetcher and progress bar.
    pub fn reconciler(&self) -> SyncLibraryReconciler<'_> {
        SyncLibraryReconciler::new(
            &self.layout,
            &self.settings,
            self.platform,
            self.submodules.as_ref(),
            self.fetcher.as_ref(),
        )
        .with_stale_policy(self.stale_policy)
        .with_progress(self.progress.as_ref())
    }
}

/// Bootstrap the CLI context.
///
/// Fails if the host platform is unsupported or no project root can be found.
pub fn bootstrap(config: &CliConfig) -> Result<CliContext, ProvisionError> {
    let platform = Platform::detect()?;
    let layout = config.resolve_layout()?;
    let settings = config.settings();
    let progress = Arc::new(CliProgress::new());

    debug!(
        %platform,
        root = %layout.root().display(),
        submodule = %settings.submodule_path,
        base_url = %settings.archive_base_url,
        "Bootstrapped CLI context"
    );

    Ok(CliContext {
        submodules: Box::new(GitSubmoduleSource::new(layout.root())),
        fetcher: Box::new(HttpArchiveFetcher::new().with_progress(progress.clone())),
        runner: Box::new(SystemCommandRunner),
        stale_policy: config.stale_policy(),
        layout,
        settings,
        platform,
        progress,
    })
}
