//! Approve command implementation.

use super::{CommandContext, report_mutation};
use crate::cli::IdArgs;
use crate::config;
use crate::error::Result;

/// Approve a pending closure.
///
/// # Errors
///
/// Returns an error if the ID does not resolve, the actor lacks permission,
/// the bug is in the wrong state, or the store rejects the write.
pub fn execute(args: &IdArgs, json: bool, cli: &config::CliOverrides) -> Result<()> {
    let mut ctx = CommandContext::open(cli)?;
    let id = ctx.resolve(&args.id)?;

    let actor = ctx.actor.clone();
    ctx.dashboard.approve(&actor, &id)?;
    report_mutation(&ctx, "approve", &id, json)
}
