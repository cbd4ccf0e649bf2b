//! Stats command implementation.
//!
//! The manager dashboard's stat cards: counts per status over every bug.
//! JSON output also carries the trend series the dashboard charts beside them.

use super::{CommandContext, print_json, require_manager};
use crate::config;
use crate::error::Result;
use crate::format::{StatsSummary, format_status_counts};
use crate::view::{SortConfig, ViewFilter};
use tracing::info;

/// Execute the stats command.
///
/// # Errors
///
/// Returns `PermissionDenied` for developers, or an error if the workspace
/// cannot be opened.
pub fn execute(json: bool, cli: &config::CliOverrides) -> Result<()> {
    let ctx = CommandContext::open(cli)?;
    require_manager(&ctx.actor, "view stats")?;

    let view = ctx
        .dashboard
        .view(&ctx.actor, &ViewFilter::default(), &SortConfig::default());
    let summary = StatsSummary::from_view(&view);
    info!(total = summary.total, "computed stats");

    if ctx.json(json) {
        return print_json(&summary);
    }
    print!(
        "{}",
        format_status_counts(&summary.counts, ctx.text_options().use_color)
    );
    Ok(())
}
