//! Status command handler.
//!
//! Read-only: queries git and the marker but never downloads or builds.

use anyhow::{Context, Result};
use serde_json::json;
use tpsetup_runtime::{BuildRecipe, SyncStatus};

use crate::bootstrap::CliContext;

/// Report the build recipe and what a flip reconcile would do.
pub fn execute(ctx: &CliContext, as_json: bool) -> Result<()> {
    let recipe = ctx.recipe();
    let sync = ctx
        .reconciler()
        .status()
        .context("Failed to read flip status")?;

    if as_json {
        let report = json!({
            "root": ctx.layout.root(),
            "recipe": recipe,
            "flip": sync,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render(&recipe, &sync));
    }

    Ok(())
}

fn render(recipe: &BuildRecipe, sync: &SyncStatus) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Platform:       {} (toolset {})\n",
        recipe.platform, recipe.toolset
    ));
    out.push_str("Boost steps:\n");
    for (i, step) in recipe.steps.iter().enumerate() {
        out.push_str(&format!("  {}. {}: {}\n", i + 1, step.label, step));
    }
    out.push_str(&format!(
        "Pinned commit:  {} ({:?})\n",
        sync.pinned.commit, sync.pinned.state
    ));
    out.push_str(&format!(
        "Local commit:   {}\n",
        sync.local.as_deref().unwrap_or("(none)")
    ));
    if sync.needs_fetch {
        out.push_str(&format!("Action:         fetch {}\n", sync.archive_name));
        out.push_str(&format!("Archive URL:    {}\n", sync.archive_url));
        if sync.stale {
            out.push_str(
                "Note:           ThirdParty/flip has no valid marker; pass --replace-stale to overwrite it\n",
            );
        } else if sync.sync_dir_exists {
            out.push_str("Note:           the previous install will be replaced\n");
        }
    } else {
        out.push_str("Action:         none, flip is up to date\n");
    }
    out
}
