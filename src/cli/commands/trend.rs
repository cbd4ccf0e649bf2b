//! Trend command implementation.
//!
//! One row per creation day, counting each bug under its current status.

use super::{CommandContext, print_json, require_manager};
use crate::config;
use crate::error::Result;
use crate::format::format_trend;
use crate::view::{SortConfig, ViewFilter};

/// Execute the trend command.
///
/// # Errors
///
/// Returns `PermissionDenied` for developers, or an error if the workspace
/// cannot be opened.
pub fn execute(json: bool, cli: &config::CliOverrides) -> Result<()> {
    let ctx = CommandContext::open(cli)?;
    require_manager(&ctx.actor, "view trend")?;

    let view = ctx
        .dashboard
        .view(&ctx.actor, &ViewFilter::default(), &SortConfig::default());

    if ctx.json(json) {
        return print_json(&view.trend);
    }
    if view.trend.is_empty() {
        println!("No bugs yet.");
    } else {
        print!("{}", format_trend(&view.trend));
    }
    Ok(())
}
