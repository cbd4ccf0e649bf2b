//! Output formatting for `bugboard`.
//!
//! Supports human-readable text output and machine-parseable JSON.
//! JSON goes to stdout; diagnostics go to stderr.
//!
//! # Output Types
//!
//! - [`BugDetails`] - Record plus the actions the current actor may take (show)
//! - [`StatsSummary`] - Stat cards and trend series (stats/trend)

mod output;
mod text;

pub use output::{BugDetails, StatsSummary};
pub use text::{
    TextFormatOptions, format_bug_line, format_bug_line_with, format_bug_table,
    format_priority_label, format_status_counts, format_status_icon, format_status_label,
    format_trend, icons, terminal_width, truncate_title,
};
