//! Update command implementation.

use super::{CommandContext, report_mutation};
use crate::cli::UpdateArgs;
use crate::config;
use crate::error::{BugError, Result};
use crate::model::BugEdit;
use crate::util::parse_due_date;
use chrono::Utc;

/// Build an edit from CLI arguments. An empty `--assignee` or `--due`
/// clears the field.
///
/// # Errors
///
/// Returns an error if a value does not parse or nothing would change.
pub fn edit_from_args(args: &UpdateArgs) -> Result<BugEdit> {
    let edit = BugEdit {
        title: args.title.clone(),
        description: args.description.clone(),
        status: args.status.as_deref().map(str::parse).transpose()?,
        priority: args.priority.as_deref().map(str::parse).transpose()?,
        project: args.project.clone(),
        assignee: args.assignee.as_deref().map(|a| {
            let a = a.trim();
            (!a.is_empty()).then(|| a.to_string())
        }),
        due_date: args
            .due
            .as_deref()
            .map(|due| parse_due_date(due, Utc::now().date_naive()))
            .transpose()?,
    };

    if edit.is_empty() {
        return Err(BugError::validation("update", "no fields to update"));
    }
    Ok(edit)
}

/// Execute the update command.
///
/// # Errors
///
/// Returns an error if the ID does not resolve, the actor did not create the
/// bug, validation fails, or the store rejects the write.
pub fn execute(args: &UpdateArgs, json: bool, cli: &config::CliOverrides) -> Result<()> {
    let edit = edit_from_args(args)?;
    let mut ctx = CommandContext::open(cli)?;
    let id = ctx.resolve(&args.id)?;

    let actor = ctx.actor.clone();
    ctx.dashboard.update(&actor, &id, &edit)?;
    report_mutation(&ctx, "update", &id, json)
}
