//! List command implementation.
//!
//! Role-scoped, filtered and sorted view of the dashboard.

use super::{CommandContext, print_json};
use crate::cli::ListArgs;
use crate::config;
use crate::error::Result;
use crate::format::format_bug_table;
use crate::view::{SortConfig, SortDirection, SortKey, ViewFilter};

/// Build the sort config from CLI arguments.
///
/// Without `--sort` the default (newest first) applies and `--desc` is
/// implied.
///
/// # Errors
///
/// Returns `InvalidSortKey` for an unknown key.
pub fn sort_from_args(args: &ListArgs) -> Result<SortConfig> {
    let Some(key) = args.sort.as_deref() else {
        return Ok(SortConfig::default());
    };
    let key: SortKey = key.parse()?;
    let direction = if args.desc {
        SortDirection::Desc
    } else {
        SortDirection::Asc
    };
    Ok(SortConfig::new(key, direction))
}

/// Execute the list command.
///
/// # Errors
///
/// Returns an error if the workspace cannot be opened or a filter or sort
/// value is invalid.
pub fn execute(args: &ListArgs, json: bool, cli: &config::CliOverrides) -> Result<()> {
    let filter = ViewFilter::from_strs(&args.status, &args.priority, &args.project)?;
    let sort = sort_from_args(args)?;

    let ctx = CommandContext::open(cli)?;
    let view = ctx.dashboard.view(&ctx.actor, &filter, &sort);

    if ctx.json(json) {
        return print_json(&view.bugs);
    }

    if view.bugs.is_empty() {
        println!("No bugs found.");
    } else {
        print!("{}", format_bug_table(&view.bugs, ctx.text_options()));
        println!("\n{} bug(s)", view.bugs.len());
    }
    Ok(())
}
