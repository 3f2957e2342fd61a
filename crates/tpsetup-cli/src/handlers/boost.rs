//! Boost command handler.

use anyhow::{Context, Result};
use tpsetup_runtime::build_static_library;

use crate::bootstrap::CliContext;

/// Build the static Boost libraries for the host platform.
pub fn execute(ctx: &CliContext) -> Result<()> {
    let source_dir = ctx.layout.static_library_dir();
    let recipe = ctx.recipe();

    println!(
        "Building Boost for {} with {}...",
        ctx.platform, recipe.toolset
    );

    build_static_library(&source_dir, ctx.platform, ctx.runner.as_ref(), ctx.progress.as_ref())
        .context("Failed to build Boost")?;

    println!("✓ Boost built in {}", source_dir.display());
    Ok(())
}
