//! Check-deps command handler.

use anyhow::Result;
use tpsetup_runtime::{check_dependencies, install_hints};

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Verify the tools a full run needs and print install hints for anything missing.
pub fn execute(ctx: &CliContext) -> Result<()> {
    let recipe = ctx.recipe();
    println!(
        "Checking dependencies for {} ({})...",
        ctx.platform, recipe.toolset
    );

    let report = check_dependencies(&recipe, &ctx.layout.static_library_dir());

    for check in &report.checks {
        match &check.location {
            Some(path) => println!("✓ {:<14} {}", check.name, path.display()),
            None => println!("✗ {:<14} not found (needed for {})", check.name, check.purpose),
        }
    }

    if report.all_present() {
        println!();
        println!("✓ All dependencies found");
        return Ok(());
    }

    println!();
    println!("Missing dependencies detected. Suggested fixes:");
    for hint in install_hints(report.platform) {
        println!("  {hint}");
    }

    let missing: Vec<&str> = report.missing().map(|c| c.name.as_str()).collect();
    Err(CliError::Toolchain(format!("Missing required dependencies: {}", missing.join(", "))).into())
}
