//! Text formatting functions for `bugboard`.
//!
//! Plain text with optional color:
//! - Status icons (○ ◐ ◑ ✓)
//! - Status and priority labels
//! - Bug lines and tables
//! - Trend and stat-card blocks

use crate::model::{BugRecord, Priority, Status};
use crate::view::{StatusCounts, TrendBucket};
use colored::Colorize;
use std::fmt::Write as _;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Status icon characters.
pub mod icons {
    /// Open (hollow circle).
    pub const OPEN: &str = "○";
    /// In progress (half-filled).
    pub const IN_PROGRESS: &str = "◐";
    /// Waiting for a manager.
    pub const PENDING_APPROVAL: &str = "◑";
    /// Closed (checkmark).
    pub const CLOSED: &str = "✓";
}

/// Formatting options for text output.
#[derive(Debug, Clone, Copy)]
pub struct TextFormatOptions {
    pub use_color: bool,
    pub max_width: Option<usize>,
}

impl TextFormatOptions {
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            use_color: false,
            max_width: None,
        }
    }
}

/// Color `text` the way `status` is shown everywhere else.
fn paint_status(text: &str, status: Status, use_color: bool) -> String {
    if !use_color {
        return text.to_string();
    }

    match status {
        Status::Open => text.green().to_string(),
        Status::InProgress => text.yellow().to_string(),
        Status::PendingApproval => text.magenta().to_string(),
        Status::Closed => text.bright_black().to_string(),
    }
}

/// Return the icon character for a status.
#[must_use]
pub const fn format_status_icon(status: Status) -> &'static str {
    match status {
        Status::Open => icons::OPEN,
        Status::InProgress => icons::IN_PROGRESS,
        Status::PendingApproval => icons::PENDING_APPROVAL,
        Status::Closed => icons::CLOSED,
    }
}

/// Format status label with optional color.
#[must_use]
pub fn format_status_label(status: Status, use_color: bool) -> String {
    paint_status(status.as_str(), status, use_color)
}

/// Format priority label with optional color.
#[must_use]
pub fn format_priority_label(priority: Priority, use_color: bool) -> String {
    let label = priority.as_str();
    if !use_color {
        return label.to_string();
    }

    match priority {
        Priority::Critical => label.red().bold().to_string(),
        Priority::High => label.red().to_string(),
        Priority::Medium => label.yellow().to_string(),
        Priority::Low => label.blue().to_string(),
    }
}

/// Determine terminal width from environment (falls back to 80).
#[must_use]
pub fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|columns| columns.trim().parse::<usize>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(80)
}

/// Truncate text to fit within `max_len` visible columns.
///
/// Handles wide characters (emojis, CJK) using `unicode-width`.
#[must_use]
pub fn truncate_title(title: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    if UnicodeWidthStr::width(title) <= max_len {
        return title.to_string();
    }

    let (target_len, ellipsis) = if max_len <= 3 {
        (max_len, "")
    } else {
        (max_len - 3, "...")
    };

    let mut w = 0;
    let mut s = String::new();
    for c in title.chars() {
        let cw = UnicodeWidthChar::width(c).unwrap_or(0);
        if w + cw > target_len {
            break;
        }
        w += cw;
        s.push(c);
    }
    s.push_str(ellipsis);
    s
}

fn pad(text: &str, width: usize) -> String {
    let visible = UnicodeWidthStr::width(text);
    format!("{text}{}", " ".repeat(width.saturating_sub(visible)))
}

/// Format a single-line bug summary with options.
///
/// Format: `{icon} {id} [{priority}] {title} ({project})`
#[must_use]
pub fn format_bug_line_with(bug: &BugRecord, options: TextFormatOptions) -> String {
    let icon_plain = format_status_icon(bug.status);
    let badge_plain = format!("[{}]", bug.priority.as_str());
    let suffix = format!(" ({})", bug.project);

    let prefix_len = UnicodeWidthStr::width(icon_plain)
        + 1
        + UnicodeWidthStr::width(bug.id.as_str())
        + 1
        + UnicodeWidthStr::width(badge_plain.as_str())
        + 1;

    let title = options.max_width.map_or_else(
        || bug.title.clone(),
        |width| {
            truncate_title(
                &bug.title,
                width.saturating_sub(prefix_len + UnicodeWidthStr::width(suffix.as_str())),
            )
        },
    );

    let icon = paint_status(icon_plain, bug.status, options.use_color);
    let badge = format!("[{}]", format_priority_label(bug.priority, options.use_color));

    format!("{icon} {} {badge} {title}{suffix}", bug.id)
}

/// Format a single-line bug summary.
#[must_use]
pub fn format_bug_line(bug: &BugRecord) -> String {
    format_bug_line_with(bug, TextFormatOptions::plain())
}

/// Format the dashboard table: title, project, status, priority, assignee,
/// creator.
#[must_use]
pub fn format_bug_table(bugs: &[BugRecord], options: TextFormatOptions) -> String {
    const HEADERS: [&str; 7] = [
        "ID",
        "Title",
        "Project",
        "Status",
        "Priority",
        "Assignee",
        "Created By",
    ];

    let rows: Vec<[String; 7]> = bugs
        .iter()
        .map(|bug| {
            [
                bug.id.clone(),
                bug.title.clone(),
                bug.project.clone(),
                bug.status.as_str().to_string(),
                bug.priority.as_str().to_string(),
                bug.assignee
                    .clone()
                    .unwrap_or_else(|| "Unassigned".to_string()),
                bug.created_by.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(UnicodeWidthStr::width);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(UnicodeWidthStr::width(cell.as_str()));
        }
    }

    // Shrink the title column to fit the terminal.
    if let Some(max_width) = options.max_width {
        let others: usize = widths
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != 1)
            .map(|(_, w)| w + 2)
            .sum();
        widths[1] = widths[1].min(max_width.saturating_sub(others).max(8));
    }

    let mut out = String::new();
    let header: Vec<String> = HEADERS
        .iter()
        .zip(widths.iter())
        .map(|(h, w)| pad(h, *w))
        .collect();
    let _ = writeln!(out, "{}", header.join("  ").trim_end());

    for (row, bug) in rows.iter().zip(bugs) {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let text = if i == 1 {
                    truncate_title(cell, widths[i])
                } else {
                    cell.clone()
                };
                let padded = pad(&text, widths[i]);
                match i {
                    3 => paint_status(&padded, bug.status, options.use_color),
                    4 => {
                        let label = format_priority_label(bug.priority, options.use_color);
                        format!("{label}{}", &padded[bug.priority.as_str().len()..])
                    }
                    _ => padded,
                }
            })
            .collect();
        let _ = writeln!(out, "{}", cells.join("  ").trim_end());
    }

    out
}

/// Format the four stat cards as aligned lines.
#[must_use]
pub fn format_status_counts(counts: &StatusCounts, use_color: bool) -> String {
    let mut out = String::new();
    for (label, status) in [
        ("Open Bugs", Status::Open),
        ("In Progress", Status::InProgress),
        ("Pending Approval", Status::PendingApproval),
        ("Closed", Status::Closed),
    ] {
        let count = counts.get(status).to_string();
        let _ = writeln!(
            out,
            "{} {}",
            pad(label, 17),
            paint_status(&count, status, use_color)
        );
    }
    let _ = writeln!(out, "{} {}", pad("Total", 17), counts.total());
    out
}

/// Format the trend series as a table, one row per day.
#[must_use]
pub fn format_trend(trend: &[TrendBucket]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10}  {:>5}  {:>11}  {:>16}  {:>6}",
        "Date", "Open", "In Progress", "Pending Approval", "Closed"
    );
    for bucket in trend {
        let _ = writeln!(
            out,
            "{:<10}  {:>5}  {:>11}  {:>16}  {:>6}",
            bucket.date.to_string(),
            bucket.open,
            bucket.in_progress,
            bucket.pending_approval,
            bucket.closed
        );
    }
    out
}
