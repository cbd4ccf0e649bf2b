//! Derived dashboard views.
//!
//! Everything here is a pure function of the record set, the actor, the
//! filter and sort settings, and the caller's notion of "today".

pub mod filter;
pub mod sort;
pub mod trend;

pub use filter::{ViewFilter, visible_to};
pub use sort::{SortConfig, SortDirection, SortKey, sort_records};
pub use trend::{StatusCounts, TrendBucket, aggregate_trend};

use crate::model::{Actor, BugRecord};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

/// Everything the dashboard renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    /// Role-scoped, filtered and sorted records.
    pub bugs: Vec<BugRecord>,
    /// Trend over the full record set.
    pub trend: Vec<TrendBucket>,
    /// Status counts over the full record set.
    pub counts: StatusCounts,
}

/// Re-derive the dashboard from scratch.
#[must_use]
pub fn recompute(
    records: &[BugRecord],
    actor: &Actor,
    filter: &ViewFilter,
    sort: &SortConfig,
    today: NaiveDate,
) -> DashboardView {
    let mut visible = filter::apply(records, actor, filter);
    sort_records(&mut visible, sort);

    let view = DashboardView {
        bugs: visible.into_iter().cloned().collect(),
        trend: aggregate_trend(records, today),
        counts: StatusCounts::from_records(records),
    };
    debug!(
        total = records.len(),
        shown = view.bugs.len(),
        days = view.trend.len(),
        "recomputed view"
    );
    view
}
