//! Subcommands of `tpsetup`.

use clap::Subcommand;

/// Individual provisioning steps and diagnostics.
///
/// Running `tpsetup` with no subcommand performs `boost` then `flip`.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Build the static Boost libraries in ThirdParty/boost
    Boost,

    /// Fetch the prebuilt flip library if the pinned commit changed
    Flip,

    /// Show the pinned and local flip commits and what a run would do
    Status {
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that git, the C++ compiler and the Boost sources are available
    CheckDeps,

    /// Show resolved paths for the project layout
    Paths,
}
