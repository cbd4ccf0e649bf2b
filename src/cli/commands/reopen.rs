//! Reopen command implementation.

use super::{CommandContext, report_mutation};
use crate::cli::IdArgs;
use crate::config;
use crate::error::Result;

/// Send a pending closure back to open.
///
/// # Errors
///
/// Returns an error if the ID does not resolve, the actor lacks permission,
/// the bug is in the wrong state, or the store rejects the write.
pub fn execute(args: &IdArgs, json: bool, cli: &config::CliOverrides) -> Result<()> {
    let mut ctx = CommandContext::open(cli)?;
    let id = ctx.resolve(&args.id)?;

    let actor = ctx.actor.clone();
    ctx.dashboard.reopen(&actor, &id)?;
    report_mutation(&ctx, "reopen", &id, json)
}
