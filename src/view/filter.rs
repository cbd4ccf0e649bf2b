//! Record filtering and role scoping.

use crate::error::Result;
use crate::model::{Actor, BugRecord, Priority, Status};
use serde::Serialize;

/// Conjunctive filter; `None` fields place no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewFilter {
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub project: Option<String>,
}

impl ViewFilter {
    /// Parse the string form used by dropdowns, where `""` means "all".
    ///
    /// # Errors
    ///
    /// Returns `InvalidStatus` or `InvalidPriority` for unknown values.
    pub fn from_strs(status: &str, priority: &str, project: &str) -> Result<Self> {
        Ok(Self {
            status: non_empty(status).map(str::parse).transpose()?,
            priority: non_empty(priority).map(str::parse).transpose()?,
            project: non_empty(project).map(str::to_string),
        })
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.status.is_none() && self.priority.is_none() && self.project.is_none()
    }

    #[must_use]
    pub fn matches(&self, record: &BugRecord) -> bool {
        self.status.is_none_or(|s| record.status == s)
            && self.priority.is_none_or(|p| record.priority == p)
            && self
                .project
                .as_deref()
                .is_none_or(|p| record.project == p)
    }
}

/// Role scoping: developers see what they created or are assigned; managers
/// see everything.
#[must_use]
pub fn visible_to(record: &BugRecord, actor: &Actor) -> bool {
    actor.is_manager() || actor.is_creator_of(record) || actor.is_assignee_of(record)
}

/// Records visible to the actor that pass the filter, in input order.
#[must_use]
pub fn apply<'a>(
    records: &'a [BugRecord],
    actor: &Actor,
    filter: &ViewFilter,
) -> Vec<&'a BugRecord> {
    records
        .iter()
        .filter(|record| visible_to(record, actor) && filter.matches(record))
        .collect()
}

fn non_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}
