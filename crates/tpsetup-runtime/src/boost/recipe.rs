//! Per-platform Boost build recipes.
//!
//! Each recipe is static data: the build driver is told which toolset to
//! bootstrap with, then headers are staged, then only `Boost.System` is
//! built as a static library.

use serde::Serialize;
use std::fmt;
use tpsetup_core::Platform;

/// One external command in a recipe, run from the Boost source directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuildStep {
    /// Short name used in progress lines and errors.
    pub label: &'static str,
    pub program: &'static str,
    pub args: &'static [&'static str],
}

impl BuildStep {
    /// Shell-style rendering for logs and error messages.
    pub fn command_line(&self) -> String {
        let mut line = self.program.to_string();
        for arg in self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// The ordered build steps for one platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuildRecipe {
    pub platform: Platform,
    /// Toolset id handed to the Boost bootstrap (`clang`, `gcc`, `msvc`).
    pub toolset: &'static str,
    /// C++ compiler the toolset drives; checked by `check-deps`.
    pub compiler: &'static str,
    /// Bootstrap script expected at the top of the source tree.
    pub bootstrap_script: &'static str,
    pub steps: &'static [BuildStep],
}

const MACOS_STEPS: &[BuildStep] = &[
    BuildStep {
        label: "bootstrap",
        program: "./bootstrap.sh",
        args: &[
            "toolset=clang",
            "macosx-version-min=10.8",
            "architecture=combined",
            "link=static",
        ],
    },
    BuildStep {
        label: "headers",
        program: "./b2",
        args: &["headers"],
    },
    BuildStep {
        label: "build",
        program: "./b2",
        args: &["address-model=32_64", "--with-system", "stage"],
    },
];

const LINUX_STEPS: &[BuildStep] = &[
    BuildStep {
        label: "bootstrap",
        program: "./bootstrap.sh",
        args: &["toolset=gcc", "link=static"],
    },
    BuildStep {
        label: "headers",
        program: "./b2",
        args: &["headers"],
    },
    BuildStep {
        label: "build",
        program: "./b2",
        args: &["--with-system", "stage"],
    },
];

// bootstrap.bat is a batch file, so it goes through cmd
const WINDOWS_STEPS: &[BuildStep] = &[
    BuildStep {
        label: "bootstrap",
        program: "cmd",
        args: &["/C", "bootstrap.bat", "msvc"],
    },
    BuildStep {
        label: "headers",
        program: r".\b2.exe",
        args: &["headers"],
    },
    BuildStep {
        label: "build",
        program: r".\b2.exe",
        args: &["toolset=msvc", "link=static", "--with-system", "stage"],
    },
];

impl BuildRecipe {
    pub const fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::MacOs => Self {
                platform,
                toolset: "clang",
                compiler: "clang++",
                bootstrap_script: "bootstrap.sh",
                steps: MACOS_STEPS,
            },
            Platform::Linux => Self {
                platform,
                toolset: "gcc",
                compiler: "g++",
                bootstrap_script: "bootstrap.sh",
                steps: LINUX_STEPS,
            },
            Platform::Windows => Self {
                platform,
                toolset: "msvc",
                compiler: "cl",
                bootstrap_script: "bootstrap.bat",
                steps: WINDOWS_STEPS,
            },
        }
    }
}
