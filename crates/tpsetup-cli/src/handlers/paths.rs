//! Paths command handler.
//!
//! Prints the resolved layout in `key = value` form; useful when discovery
//! picks an unexpected project root.

use anyhow::Result;

use crate::bootstrap::CliConfig;

/// Resolve and print every path tpsetup reads or writes.
///
/// Only the layout is resolved, so this also works on unsupported platforms.
pub fn execute(config: &CliConfig) -> Result<()> {
    let layout = config.resolve_layout()?;
    println!("{}", layout.resolved());
    Ok(())
}
