//! Flip command handler.

use anyhow::{Context, Result};
use tpsetup_runtime::ReconcileOutcome;

use crate::bootstrap::CliContext;

/// Bring `ThirdParty/flip` in line with the pinned submodule commit.
pub async fn execute(ctx: &CliContext) -> Result<()> {
    let outcome = ctx
        .reconciler()
        .reconcile()
        .await
        .context("Failed to update flip")?;

    match outcome {
        ReconcileOutcome::UpToDate { commit } => {
            println!("✓ flip is up to date ({commit})");
        }
        ReconcileOutcome::Updated {
            previous,
            current,
            archive,
        } => {
            let previous = previous.as_deref().unwrap_or("none");
            println!("✓ flip updated {previous} -> {current} from {archive}");
        }
    }

    Ok(())
}
