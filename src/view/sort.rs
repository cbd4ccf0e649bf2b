//! Sort keys and stable ordering of records.

use crate::error::{BugError, Result};
use crate::model::BugRecord;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Field a list is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Title,
    Project,
    Status,
    Priority,
    Assignee,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
    DueDate,
}

impl SortKey {
    pub const ALL: [Self; 9] = [
        Self::Title,
        Self::Project,
        Self::Status,
        Self::Priority,
        Self::Assignee,
        Self::CreatedBy,
        Self::CreatedAt,
        Self::UpdatedAt,
        Self::DueDate,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Project => "project",
            Self::Status => "status",
            Self::Priority => "priority",
            Self::Assignee => "assignee",
            Self::CreatedBy => "created_by",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::DueDate => "due_date",
        }
    }

    /// Compare two records by this key in ascending order.
    ///
    /// Missing values order before present ones.
    #[must_use]
    pub fn compare(&self, a: &BugRecord, b: &BugRecord) -> Ordering {
        match self {
            Self::Title => a.title.cmp(&b.title),
            Self::Project => a.project.cmp(&b.project),
            Self::Status => a.status.cmp(&b.status),
            Self::Priority => a.priority.cmp(&b.priority),
            Self::Assignee => a.assignee.cmp(&b.assignee),
            Self::CreatedBy => a.created_by.cmp(&b.created_by),
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
            Self::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            Self::DueDate => a.due_date.cmp(&b.due_date),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = BugError;

    /// Accepts `created_at`, `created-at` and `createdAt` spellings.
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "title" => Ok(Self::Title),
            "project" => Ok(Self::Project),
            "status" => Ok(Self::Status),
            "priority" => Ok(Self::Priority),
            "assignee" => Ok(Self::Assignee),
            "createdby" | "creator" => Ok(Self::CreatedBy),
            "createdat" | "created" => Ok(Self::CreatedAt),
            "updatedat" | "updated" => Ok(Self::UpdatedAt),
            "duedate" | "due" => Ok(Self::DueDate),
            _ => Err(BugError::InvalidSortKey { key: s.to_string() }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            key: SortKey::CreatedAt,
            direction: SortDirection::Desc,
        }
    }
}

impl SortConfig {
    #[must_use]
    pub const fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    #[must_use]
    pub const fn asc(key: SortKey) -> Self {
        Self::new(key, SortDirection::Asc)
    }

    #[must_use]
    pub const fn desc(key: SortKey) -> Self {
        Self::new(key, SortDirection::Desc)
    }

    /// Column-header click: the same key flips direction, a new key starts
    /// ascending.
    pub fn toggle(&mut self, key: SortKey) {
        if self.key == key {
            self.direction = self.direction.flipped();
        } else {
            self.key = key;
            self.direction = SortDirection::Asc;
        }
    }

    #[must_use]
    pub fn compare(&self, a: &BugRecord, b: &BugRecord) -> Ordering {
        let ordering = self.key.compare(a, b);
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Stable sort: records comparing equal keep their input order.
pub fn sort_records(records: &mut [&BugRecord], config: &SortConfig) {
    records.sort_by(|a, b| config.compare(a, b));
}
