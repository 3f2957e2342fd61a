//! Main CLI parser and top-level argument handling.
//!
//! Every option is global so it can be given before or after a subcommand.

use clap::Parser;
use std::path::PathBuf;

use crate::commands::Commands;

/// Provision the third-party components of the host project.
///
/// Without a subcommand, builds Boost and then brings the prebuilt flip
/// library in line with the pinned submodule commit.
#[derive(Parser)]
#[command(name = "tpsetup")]
#[command(about = "Build Boost and fetch the pinned flip library for the host project")]
#[command(version)]
pub struct Cli {
    /// Project root containing ThirdParty/ (defaults to TPSETUP_ROOT, then discovery from the cwd)
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Replace an existing ThirdParty/flip that has no valid version marker
    #[arg(long, global = true)]
    pub replace_stale: bool,

    /// Serve flip archives from this base URL instead of the default host
    #[arg(long, global = true, env = "TPSETUP_FLIP_URL", value_name = "URL")]
    pub base_url: Option<String>,

    /// Submodule path whose pinned commit selects the flip archive
    #[arg(long, global = true, env = "TPSETUP_FLIP_SUBMODULE", value_name = "PATH")]
    pub submodule: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
