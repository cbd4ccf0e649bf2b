//! Create command implementation.

use super::{CommandContext, print_json};
use crate::cli::CreateArgs;
use crate::config;
use crate::error::Result;
use crate::model::{BugDraft, Status};
use crate::util::parse_due_date;
use chrono::Utc;
use std::str::FromStr;
use tracing::info;

/// Build a draft from CLI arguments.
///
/// # Errors
///
/// Returns an error if priority, status or due date do not parse.
pub fn draft_from_args(args: &CreateArgs, ctx: &CommandContext) -> Result<BugDraft> {
    let mut draft = BugDraft::new(args.title.clone(), args.project.clone());
    draft.description = args.description.clone().unwrap_or_default();
    draft.priority = match args.priority.as_deref() {
        Some(p) => p.parse()?,
        None => config::default_priority_from_layer(&ctx.layer)?,
    };
    if let Some(status) = args.status.as_deref() {
        draft.status = Status::from_str(status)?;
    }
    draft.assignee = args
        .assignee
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string);
    if let Some(due) = args.due.as_deref() {
        draft.due_date = parse_due_date(due, Utc::now().date_naive())?;
    }
    draft.labels = args
        .labels
        .iter()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();
    Ok(draft)
}

/// Execute the create command.
///
/// # Errors
///
/// Returns an error if the workspace cannot be opened, the actor may not
/// create bugs, validation fails, or the store rejects the write.
pub fn execute(args: &CreateArgs, json: bool, cli: &config::CliOverrides) -> Result<()> {
    let mut ctx = CommandContext::open(cli)?;
    let draft = draft_from_args(args, &ctx)?;

    let actor = ctx.actor.clone();
    let id = ctx.dashboard.create(&actor, &draft)?;
    info!(%id, "create command finished");

    if ctx.json(json) {
        match ctx.dashboard.get(&id) {
            Some(bug) => print_json(bug)?,
            None => print_json(&serde_json::json!({ "id": id }))?,
        }
    } else {
        println!("Created {id}: {}", draft.title.trim());
    }
    Ok(())
}
