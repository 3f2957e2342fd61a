//! Command handlers.
//!
//! Handlers follow one pattern:
//! - Signature: `execute(ctx: &CliContext, ...) -> Result<()>` (async when they download)
//! - Thin wrappers that call into `tpsetup-runtime` and format terminal output
//! - No provisioning logic of their own

pub mod boost;
pub mod check_deps;
pub mod flip;
pub mod paths;
pub mod run;
pub mod status;
