//! Default handler: the full provisioning sequence.

use anyhow::Result;

use super::{boost, flip};
use crate::bootstrap::CliContext;

/// Build Boost, then reconcile flip. The first failure stops the run.
pub async fn execute(ctx: &CliContext) -> Result<()> {
    boost::execute(ctx)?;
    flip::execute(ctx).await
}
