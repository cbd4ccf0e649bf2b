//! Show command implementation.

use super::{CommandContext, print_json};
use crate::config;
use crate::error::Result;
use crate::format::{BugDetails, format_priority_label, format_status_icon, format_status_label};
use std::fmt::Write as FmtWrite;

/// Execute the show command.
///
/// Developers may only see bugs they created or are assigned; anything else
/// reports `BugNotFound`, as the dashboard never lists it for them.
///
/// # Errors
///
/// Returns an error if the workspace cannot be opened or the ID does not
/// resolve to a visible bug.
pub fn execute(id: &str, json: bool, cli: &config::CliOverrides) -> Result<()> {
    let ctx = CommandContext::open(cli)?;
    let id = ctx.resolve(id)?;
    let record = ctx.record(&id)?;
    if !crate::view::visible_to(record, &ctx.actor) {
        return Err(crate::error::BugError::BugNotFound { id });
    }

    let details = BugDetails::for_actor(record, &ctx.actor);
    if ctx.json(json) {
        return print_json(&details);
    }

    print!("{}", render_details(&details, ctx.text_options().use_color));
    Ok(())
}

fn render_details(details: &BugDetails, use_color: bool) -> String {
    let bug = &details.bug;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} {}: {}",
        format_status_icon(bug.status),
        bug.id,
        bug.title
    );
    let _ = writeln!(
        out,
        "Status: {}  Priority: {}",
        format_status_label(bug.status, use_color),
        format_priority_label(bug.priority, use_color)
    );
    let _ = writeln!(out, "Project: {}", bug.project);
    let _ = writeln!(
        out,
        "Assignee: {}",
        bug.assignee.as_deref().unwrap_or("Unassigned")
    );
    let _ = writeln!(out, "Created by: {}", bug.created_by);
    if let Some(created_at) = bug.created_at {
        let _ = writeln!(out, "Created: {}", created_at.format("%Y-%m-%d %H:%M UTC"));
    }
    if let Some(updated_at) = bug.updated_at {
        let _ = writeln!(out, "Updated: {}", updated_at.format("%Y-%m-%d %H:%M UTC"));
    }
    if let Some(due) = bug.due_date {
        let _ = writeln!(out, "Due: {due}");
    }
    if !bug.labels.is_empty() {
        let _ = writeln!(out, "Labels: {}", bug.labels.join(", "));
    }
    if let (Some(by), Some(at)) = (&bug.closed_by, bug.closed_at) {
        let _ = writeln!(out, "Closed by {by} at {}", at.format("%Y-%m-%d %H:%M UTC"));
    }
    if let (Some(by), Some(at)) = (&bug.approved_by, bug.approved_at) {
        let _ = writeln!(out, "Approved by {by} at {}", at.format("%Y-%m-%d %H:%M UTC"));
    }
    if !bug.description.is_empty() {
        let _ = writeln!(out, "\n{}", bug.description);
    }

    let mut actions: Vec<&str> = details.actions.iter().map(|a| a.as_str()).collect();
    if details.can_edit {
        actions.extend(["update", "delete"]);
    }
    if !actions.is_empty() {
        let _ = writeln!(out, "\nActions: {}", actions.join(", "));
    }
    out
}
