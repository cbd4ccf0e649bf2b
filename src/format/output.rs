use crate::engine::{self, Action};
use crate::model::{Actor, BugRecord};
use crate::view::{DashboardView, StatusCounts, TrendBucket};
use serde::Serialize;

/// Bug details for the show view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BugDetails {
    #[serde(flatten)]
    pub bug: BugRecord,
    /// Lifecycle actions the current actor may take.
    pub actions: Vec<Action>,
    /// Whether the current actor may edit or delete the record.
    pub can_edit: bool,
}

impl BugDetails {
    #[must_use]
    pub fn for_actor(bug: &BugRecord, actor: &Actor) -> Self {
        Self {
            bug: bug.clone(),
            actions: engine::available_actions(bug, actor),
            can_edit: engine::can_modify(bug, actor),
        }
    }
}

/// Stat cards plus the trend series, as the manager dashboard shows them.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSummary {
    pub total: usize,
    pub counts: StatusCounts,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trend: Vec<TrendBucket>,
}

impl StatsSummary {
    #[must_use]
    pub fn from_view(view: &DashboardView) -> Self {
        Self {
            total: view.counts.total(),
            counts: view.counts,
            trend: view.trend.clone(),
        }
    }
}
