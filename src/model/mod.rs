//! Core data types for `bugboard`.
//!
//! This module defines the fundamental types used throughout the application:
//! - `BugRecord` - The tracked unit of work
//! - `Status` - Bug lifecycle states
//! - `Priority` - Urgency levels
//! - `Actor` / `Role` - The current user and what they may do
//! - `BugDraft`, `BugEdit`, `BugPatch` - Inputs to create/update operations
//!
//! Wire names use camelCase fields and kebab-case enum values so exported
//! records keep the shape of the original dashboard documents.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bug lifecycle status.
///
/// Declaration order is lifecycle order and drives sorting.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    Open,
    InProgress,
    PendingApproval,
    Closed,
}

impl Status {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::Open,
        Self::InProgress,
        Self::PendingApproval,
        Self::Closed,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in-progress",
            Self::PendingApproval => "pending-approval",
            Self::Closed => "closed",
        }
    }

    /// Statuses a developer may pick directly (on create or edit).
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Open | Self::InProgress)
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Status {
    type Err = crate::error::BugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "in-progress" | "in_progress" | "inprogress" => Ok(Self::InProgress),
            "pending-approval" | "pending_approval" | "pending" => Ok(Self::PendingApproval),
            "closed" => Ok(Self::Closed),
            other => Err(crate::error::BugError::InvalidStatus {
                status: other.to_string(),
            }),
        }
    }
}

/// Bug priority, ordered from least to most urgent.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = crate::error::BugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" | "med" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" | "crit" => Ok(Self::Critical),
            other => Err(crate::error::BugError::InvalidPriority {
                priority: other.to_string(),
            }),
        }
    }
}

/// Actor role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Developer,
    Manager,
}

impl Role {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Developer => "developer",
            Self::Manager => "manager",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = crate::error::BugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "developer" | "dev" => Ok(Self::Developer),
            "manager" | "mgr" => Ok(Self::Manager),
            other => Err(crate::error::BugError::InvalidRole {
                role: other.to_string(),
            }),
        }
    }
}

/// The user performing an operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    pub name: String,
    pub role: Role,
}

impl Actor {
    #[must_use]
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }

    #[must_use]
    pub fn developer(name: impl Into<String>) -> Self {
        Self::new(name, Role::Developer)
    }

    #[must_use]
    pub fn manager(name: impl Into<String>) -> Self {
        Self::new(name, Role::Manager)
    }

    #[must_use]
    pub fn is_manager(&self) -> bool {
        self.role == Role::Manager
    }

    /// True if this actor created the record.
    #[must_use]
    pub fn is_creator_of(&self, record: &BugRecord) -> bool {
        record.created_by == self.name
    }

    /// True if this actor is the record's assignee.
    #[must_use]
    pub fn is_assignee_of(&self, record: &BugRecord) -> bool {
        record.assignee.as_deref() == Some(self.name.as_str())
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.role)
    }
}

/// The primary bug entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BugRecord {
    /// Store-assigned identifier.
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub status: Status,

    #[serde(default)]
    pub priority: Priority,

    pub project: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,

    /// Name of the creating actor. Never changes after creation.
    pub created_by: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,

    /// Store-assigned; `None` until the store has stamped the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
}

impl BugRecord {
    /// Build the record a store persists for a new draft.
    #[must_use]
    pub fn from_draft(
        id: impl Into<String>,
        draft: &BugDraft,
        created_by: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: draft.title.trim().to_string(),
            description: draft.description.clone(),
            status: draft.status,
            priority: draft.priority,
            project: draft.project.clone(),
            assignee: draft.assignee.clone(),
            created_by: created_by.to_string(),
            due_date: draft.due_date,
            labels: draft.labels.clone(),
            created_at: Some(now),
            updated_at: Some(now),
            closed_by: None,
            closed_at: None,
            approved_by: None,
            approved_at: None,
        }
    }
}

/// Creator-supplied fields of a new bug.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BugDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub priority: Priority,
    pub project: String,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl BugDraft {
    #[must_use]
    pub fn new(title: impl Into<String>, project: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            status: Status::Open,
            priority: Priority::Medium,
            project: project.into(),
            assignee: None,
            due_date: None,
            labels: Vec::new(),
        }
    }
}

/// A creator's direct edit of a record.
///
/// `None` leaves a field untouched. Clearable fields use a nested option.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BugEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub project: Option<String>,
    pub assignee: Option<Option<String>>,
    pub due_date: Option<Option<NaiveDate>>,
}

impl BugEdit {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.project.is_none()
            && self.assignee.is_none()
            && self.due_date.is_none()
    }
}

/// Partial record persisted by `RecordStore::update`.
///
/// `created_by` is deliberately absent: it cannot be patched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BugPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl BugPatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.project.is_none()
            && self.assignee.is_none()
            && self.due_date.is_none()
            && self.closed_by.is_none()
            && self.closed_at.is_none()
            && self.approved_by.is_none()
            && self.approved_at.is_none()
            && self.updated_at.is_none()
    }

    /// Apply the patch to a record in place.
    pub fn apply_to(&self, record: &mut BugRecord) {
        if let Some(title) = &self.title {
            record.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            record.description.clone_from(description);
        }
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(priority) = self.priority {
            record.priority = priority;
        }
        if let Some(project) = &self.project {
            record.project.clone_from(project);
        }
        if let Some(assignee) = &self.assignee {
            record.assignee.clone_from(assignee);
        }
        if let Some(due_date) = self.due_date {
            record.due_date = due_date;
        }
        if let Some(closed_by) = &self.closed_by {
            record.closed_by = Some(closed_by.clone());
        }
        if let Some(closed_at) = self.closed_at {
            record.closed_at = Some(closed_at);
        }
        if let Some(approved_by) = &self.approved_by {
            record.approved_by = Some(approved_by.clone());
        }
        if let Some(approved_at) = self.approved_at {
            record.approved_at = Some(approved_at);
        }
        if let Some(updated_at) = self.updated_at {
            record.updated_at = Some(updated_at);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> BugRecord {
        let draft = BugDraft::new("Login fails", "Project A");
        BugRecord::from_draft(
            "bug-1",
            &draft,
            "Alice",
            Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
        )
    }

    #[test]
    fn status_wire_names_are_kebab_case() {
        let json = serde_json::to_string(&Status::PendingApproval).unwrap();
        assert_eq!(json, "\"pending-approval\"");
        let parsed: Status = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(parsed, Status::InProgress);
    }

    #[test]
    fn status_parse_accepts_aliases() {
        assert_eq!("in_progress".parse::<Status>().unwrap(), Status::InProgress);
        assert_eq!("Pending".parse::<Status>().unwrap(), Status::PendingApproval);
        assert!("blocked".parse::<Status>().is_err());
    }

    #[test]
    fn priority_orders_by_urgency() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::High < Priority::Critical);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn role_parse() {
        assert_eq!("Manager".parse::<Role>().unwrap(), Role::Manager);
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn record_serializes_camel_case_and_skips_empty() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(json.contains("\"createdBy\":\"Alice\""));
        assert!(json.contains("\"status\":\"open\""));
        assert!(!json.contains("closedBy"));
        assert!(!json.contains("labels"));
    }

    #[test]
    fn record_deserialize_defaults_missing_fields() {
        let json = r#"{
            "id": "bug-9",
            "title": "Imported",
            "project": "Project B",
            "createdBy": "Bob"
        }"#;
        let record: BugRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.status, Status::Open);
        assert_eq!(record.priority, Priority::Medium);
        assert!(record.created_at.is_none());
    }

    #[test]
    fn patch_apply_clears_assignee_and_keeps_creator() {
        let mut record = sample();
        record.assignee = Some("Bob".to_string());
        let patch = BugPatch {
            assignee: Some(None),
            status: Some(Status::InProgress),
            ..Default::default()
        };
        patch.apply_to(&mut record);
        assert!(record.assignee.is_none());
        assert_eq!(record.status, Status::InProgress);
        assert_eq!(record.created_by, "Alice");
    }

    #[test]
    fn actor_relationships() {
        let mut record = sample();
        record.assignee = Some("Bob".to_string());
        assert!(Actor::developer("Alice").is_creator_of(&record));
        assert!(Actor::developer("Bob").is_assignee_of(&record));
        assert!(!Actor::developer("Charlie").is_assignee_of(&record));
    }
}
