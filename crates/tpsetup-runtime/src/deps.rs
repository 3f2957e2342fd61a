//! Preflight checks for the tools a provisioning run needs.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tpsetup_core::Platform;
use tracing::debug;

use crate::boost::BuildRecipe;

/// One required tool or file and where it was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyCheck {
    pub name: String,
    /// What the dependency is needed for, shown next to missing entries.
    pub purpose: &'static str,
    pub location: Option<PathBuf>,
}

impl DependencyCheck {
    pub const fn is_present(&self) -> bool {
        self.location.is_some()
    }
}

/// Result of [`check_dependencies`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyReport {
    pub platform: Platform,
    pub checks: Vec<DependencyCheck>,
}

impl DependencyReport {
    pub fn all_present(&self) -> bool {
        self.checks.iter().all(DependencyCheck::is_present)
    }

    pub fn missing(&self) -> impl Iterator<Item = &DependencyCheck> {
        self.checks.iter().filter(|c| !c.is_present())
    }
}

/// Look for git, the recipe's compiler on `PATH`, and the Boost bootstrap script.
pub fn check_dependencies(recipe: &BuildRecipe, static_library_dir: &Path) -> DependencyReport {
    let bootstrap = static_library_dir.join(recipe.bootstrap_script);

    let checks = vec![
        on_path("git", "reading the pinned submodule commit"),
        on_path(recipe.compiler, "building Boost"),
        DependencyCheck {
            name: recipe.bootstrap_script.to_string(),
            purpose: "bootstrapping the Boost build (is the boost submodule checked out?)",
            location: bootstrap.is_file().then_some(bootstrap),
        },
    ];

    DependencyReport {
        platform: recipe.platform,
        checks,
    }
}

fn on_path(program: &str, purpose: &'static str) -> DependencyCheck {
    let location = which::which(program).ok();
    debug!(program, found = location.is_some(), "Checked for program");
    DependencyCheck {
        name: program.to_string(),
        purpose,
        location,
    }
}

/// Suggested commands for installing the toolchain on `platform`.
pub const fn install_hints(platform: Platform) -> &'static [&'static str] {
    match platform {
        Platform::MacOs => &["xcode-select --install", "brew install git"],
        Platform::Linux => &[
            "Ubuntu/Debian: sudo apt install build-essential git",
            "Fedora/RHEL:   sudo dnf install gcc-c++ git",
            "Arch Linux:    sudo pacman -S base-devel git",
        ],
        Platform::Windows => &[
            "Install Visual Studio 2022 with the C++ workload: https://visualstudio.microsoft.com/downloads/",
            "Run tpsetup from a Developer Command Prompt so cl.exe is on PATH",
            "Install Git: https://git-scm.com/download/win",
        ],
    }
}
