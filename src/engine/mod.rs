//! Bug lifecycle and permission rules.
//!
//! ```text
//!   open ──┐
//!          ├─ close (creator/assignee) ─▶ pending-approval ─ approve (manager) ─▶ closed
//!   in-progress ┘                              │
//!          ▲                                   │
//!          └──────── reopen (manager) ─────────┘  (to open)
//! ```
//!
//! Every `plan_*` function is pure: it takes the current record, the acting
//! user and a timestamp, and returns the patch to persist. Permission is
//! checked before state, so a manager trying to close an already-closed bug
//! sees `PermissionDenied`, not `InvalidTransition`.

use crate::config::Vocabulary;
use crate::error::{BugError, Result};
use crate::model::{Actor, BugDraft, BugEdit, BugPatch, BugRecord, Status};
use crate::validation::BugValidator;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Lifecycle actions offered on a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Close,
    Approve,
    Reopen,
}

impl Action {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Close => "close",
            Self::Approve => "approve",
            Self::Reopen => "reopen",
        }
    }

    /// Status the record is in after the action.
    #[must_use]
    pub const fn target(&self) -> Status {
        match self {
            Self::Close => Status::PendingApproval,
            Self::Approve => Status::Closed,
            Self::Reopen => Status::Open,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check a create request and return the draft to persist.
///
/// # Errors
///
/// Returns `PermissionDenied` for managers, or validation errors for the draft.
pub fn plan_create(actor: &Actor, draft: &BugDraft, vocabulary: &Vocabulary) -> Result<BugDraft> {
    if actor.is_manager() {
        return Err(BugError::permission_denied(
            &actor.name,
            "create",
            "only developers file bugs",
        ));
    }

    BugValidator::validate_draft(draft, vocabulary).map_err(BugError::from_validation_errors)?;

    let mut planned = draft.clone();
    planned.title = draft.title.trim().to_string();
    debug!(actor = %actor, title = %planned.title, "planned create");
    Ok(planned)
}

/// Plan a close: `open`/`in-progress` to `pending-approval`.
///
/// # Errors
///
/// Returns `PermissionDenied` unless the actor is a developer who created or
/// is assigned the record, then `InvalidTransition` from any other status.
pub fn plan_close(record: &BugRecord, actor: &Actor, now: DateTime<Utc>) -> Result<BugPatch> {
    check_close_permission(record, actor)?;
    require_status(record, Action::Close, &[Status::Open, Status::InProgress])?;

    debug!(id = %record.id, actor = %actor, "planned close");
    Ok(BugPatch {
        status: Some(Status::PendingApproval),
        closed_by: Some(actor.name.clone()),
        closed_at: Some(now),
        updated_at: Some(now),
        ..Default::default()
    })
}

/// Plan an approval: `pending-approval` to `closed`.
///
/// # Errors
///
/// Returns `PermissionDenied` for developers, then `InvalidTransition` unless
/// the record is pending approval.
pub fn plan_approve(record: &BugRecord, actor: &Actor, now: DateTime<Utc>) -> Result<BugPatch> {
    require_manager(actor, "approve")?;
    require_status(record, Action::Approve, &[Status::PendingApproval])?;

    debug!(id = %record.id, actor = %actor, "planned approve");
    Ok(BugPatch {
        status: Some(Status::Closed),
        approved_by: Some(actor.name.clone()),
        approved_at: Some(now),
        updated_at: Some(now),
        ..Default::default()
    })
}

/// Plan a reopen: `pending-approval` back to `open`.
///
/// Closure and approval history is left in place.
///
/// # Errors
///
/// Returns `PermissionDenied` for developers, then `InvalidTransition` unless
/// the record is pending approval.
pub fn plan_reopen(record: &BugRecord, actor: &Actor, now: DateTime<Utc>) -> Result<BugPatch> {
    require_manager(actor, "reopen")?;
    require_status(record, Action::Reopen, &[Status::PendingApproval])?;

    debug!(id = %record.id, actor = %actor, "planned reopen");
    Ok(BugPatch {
        status: Some(Status::Open),
        updated_at: Some(now),
        ..Default::default()
    })
}

/// Plan a creator's direct edit.
///
/// A status in the edit must be `open` or `in-progress`, or the record's
/// current status when that is `pending-approval`. An edit without a status
/// is accepted in any state.
///
/// # Errors
///
/// Returns `PermissionDenied` unless the actor is the developer who created
/// the record, validation errors for bad fields, or `InvalidTransition` for
/// a disallowed status.
pub fn plan_update(
    record: &BugRecord,
    actor: &Actor,
    edit: &BugEdit,
    vocabulary: &Vocabulary,
    now: DateTime<Utc>,
) -> Result<BugPatch> {
    require_creator(record, actor, "update")?;
    BugValidator::validate_edit(edit, vocabulary).map_err(BugError::from_validation_errors)?;

    if let Some(status) = edit.status {
        let keeps_pending =
            record.status == Status::PendingApproval && status == Status::PendingApproval;
        if !status.is_active() && !keeps_pending {
            return Err(BugError::InvalidTransition {
                from: record.status,
                to: status,
            });
        }
    }

    debug!(id = %record.id, actor = %actor, "planned update");
    Ok(BugPatch {
        title: edit.title.as_ref().map(|t| t.trim().to_string()),
        description: edit.description.clone(),
        status: edit.status,
        priority: edit.priority,
        project: edit.project.clone(),
        assignee: edit.assignee.clone(),
        due_date: edit.due_date,
        updated_at: Some(now),
        ..Default::default()
    })
}

/// Check that the actor may delete the record. Any status is allowed.
///
/// # Errors
///
/// Returns `PermissionDenied` unless the actor is the developer who created
/// the record.
pub fn check_delete(record: &BugRecord, actor: &Actor) -> Result<()> {
    require_creator(record, actor, "delete")
}

/// Actions the actor may take on the record right now.
#[must_use]
pub fn available_actions(record: &BugRecord, actor: &Actor) -> Vec<Action> {
    let mut actions = Vec::new();
    if check_close_permission(record, actor).is_ok() && record.status.is_active() {
        actions.push(Action::Close);
    }
    if actor.is_manager() && record.status == Status::PendingApproval {
        actions.push(Action::Approve);
        actions.push(Action::Reopen);
    }
    actions
}

/// True if the actor may edit or delete the record.
#[must_use]
pub fn can_modify(record: &BugRecord, actor: &Actor) -> bool {
    !actor.is_manager() && actor.is_creator_of(record)
}

fn check_close_permission(record: &BugRecord, actor: &Actor) -> Result<()> {
    if actor.is_manager() {
        return Err(BugError::permission_denied(
            &actor.name,
            "close",
            "managers approve or reopen; developers close",
        ));
    }
    if !actor.is_creator_of(record) && !actor.is_assignee_of(record) {
        return Err(BugError::permission_denied(
            &actor.name,
            "close",
            format!("not the creator or assignee of {}", record.id),
        ));
    }
    Ok(())
}

fn require_manager(actor: &Actor, operation: &str) -> Result<()> {
    if actor.is_manager() {
        Ok(())
    } else {
        Err(BugError::permission_denied(
            &actor.name,
            operation,
            "manager role required",
        ))
    }
}

fn require_creator(record: &BugRecord, actor: &Actor, operation: &str) -> Result<()> {
    if can_modify(record, actor) {
        Ok(())
    } else {
        Err(BugError::permission_denied(
            &actor.name,
            operation,
            format!("only the creator ({}) may {operation} this bug", record.created_by),
        ))
    }
}

fn require_status(record: &BugRecord, action: Action, allowed: &[Status]) -> Result<()> {
    if allowed.contains(&record.status) {
        Ok(())
    } else {
        Err(BugError::InvalidTransition {
            from: record.status,
            to: action.target(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap()
    }

    fn record(status: Status) -> BugRecord {
        let mut record = BugRecord::from_draft(
            "bug-1",
            &BugDraft::new("Crash", "Project A"),
            "Alice",
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        );
        record.assignee = Some("Bob".to_string());
        record.status = status;
        record
    }

    #[test]
    fn close_by_creator_and_assignee() {
        for who in ["Alice", "Bob"] {
            let patch = plan_close(&record(Status::Open), &Actor::developer(who), now()).unwrap();
            assert_eq!(patch.status, Some(Status::PendingApproval));
            assert_eq!(patch.closed_by.as_deref(), Some(who));
            assert_eq!(patch.closed_at, Some(now()));
            assert_eq!(patch.updated_at, Some(now()));
        }
    }

    #[test]
    fn close_by_stranger_or_manager_is_denied() {
        let err = plan_close(&record(Status::Open), &Actor::developer("Charlie"), now()).unwrap_err();
        assert!(matches!(err, BugError::PermissionDenied { .. }));
        let err = plan_close(&record(Status::Open), &Actor::manager("Diana"), now()).unwrap_err();
        assert!(matches!(err, BugError::PermissionDenied { .. }));
    }

    #[test]
    fn close_from_wrong_state_is_invalid_transition() {
        let err = plan_close(&record(Status::Closed), &Actor::developer("Alice"), now()).unwrap_err();
        assert!(matches!(
            err,
            BugError::InvalidTransition {
                from: Status::Closed,
                to: Status::PendingApproval
            }
        ));
    }

    #[test]
    fn permission_is_checked_before_state() {
        let err = plan_close(&record(Status::Closed), &Actor::manager("Diana"), now()).unwrap_err();
        assert!(matches!(err, BugError::PermissionDenied { .. }));
        let err = plan_approve(&record(Status::Open), &Actor::developer("Alice"), now()).unwrap_err();
        assert!(matches!(err, BugError::PermissionDenied { .. }));
    }

    #[test]
    fn approve_and_reopen_require_pending() {
        let manager = Actor::manager("Diana");
        let patch = plan_approve(&record(Status::PendingApproval), &manager, now()).unwrap();
        assert_eq!(patch.status, Some(Status::Closed));
        assert_eq!(patch.approved_by.as_deref(), Some("Diana"));

        let patch = plan_reopen(&record(Status::PendingApproval), &manager, now()).unwrap();
        assert_eq!(patch.status, Some(Status::Open));
        assert!(patch.closed_by.is_none() && patch.approved_by.is_none());

        let err = plan_approve(&record(Status::Open), &manager, now()).unwrap_err();
        assert!(matches!(
            err,
            BugError::InvalidTransition {
                from: Status::Open,
                to: Status::Closed
            }
        ));
        assert!(plan_reopen(&record(Status::Closed), &manager, now()).is_err());
    }

    #[test]
    fn create_requires_developer_and_valid_draft() {
        let vocab = Vocabulary::default();
        let draft = BugDraft::new("  Spaced  ", "Project A");
        let planned = plan_create(&Actor::developer("Alice"), &draft, &vocab).unwrap();
        assert_eq!(planned.title, "Spaced");

        let err = plan_create(&Actor::manager("Diana"), &draft, &vocab).unwrap_err();
        assert!(matches!(err, BugError::PermissionDenied { .. }));

        let mut bad = draft;
        bad.status = Status::Closed;
        let err = plan_create(&Actor::developer("Alice"), &bad, &vocab).unwrap_err();
        assert!(matches!(err, BugError::Validation { .. }));
    }

    #[test]
    fn update_status_rules() {
        let vocab = Vocabulary::default();
        let alice = Actor::developer("Alice");
        let edit = |status| BugEdit {
            status: Some(status),
            ..Default::default()
        };

        assert!(plan_update(&record(Status::Open), &alice, &edit(Status::InProgress), &vocab, now()).is_ok());
        assert!(
            plan_update(
                &record(Status::PendingApproval),
                &alice,
                &edit(Status::PendingApproval),
                &vocab,
                now()
            )
            .is_ok()
        );
        assert!(matches!(
            plan_update(&record(Status::Open), &alice, &edit(Status::PendingApproval), &vocab, now()),
            Err(BugError::InvalidTransition { .. })
        ));
        assert!(matches!(
            plan_update(&record(Status::Open), &alice, &edit(Status::Closed), &vocab, now()),
            Err(BugError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn update_without_status_is_accepted_when_closed() {
        let edit = BugEdit {
            title: Some(" New title ".to_string()),
            assignee: Some(None),
            ..Default::default()
        };
        let patch = plan_update(
            &record(Status::Closed),
            &Actor::developer("Alice"),
            &edit,
            &Vocabulary::default(),
            now(),
        )
        .unwrap();
        assert_eq!(patch.title.as_deref(), Some("New title"));
        assert_eq!(patch.assignee, Some(None));
        assert!(patch.status.is_none());
    }

    #[test]
    fn update_and_delete_are_creator_only() {
        let vocab = Vocabulary::default();
        let bob = Actor::developer("Bob");
        assert!(matches!(
            plan_update(&record(Status::Open), &bob, &BugEdit::default(), &vocab, now()),
            Err(BugError::PermissionDenied { .. })
        ));
        assert!(check_delete(&record(Status::Open), &bob).is_err());
        assert!(check_delete(&record(Status::Closed), &Actor::developer("Alice")).is_ok());
        assert!(check_delete(&record(Status::Open), &Actor::manager("Alice")).is_err());
    }

    #[test]
    fn available_actions_per_role() {
        assert_eq!(
            available_actions(&record(Status::InProgress), &Actor::developer("Bob")),
            vec![Action::Close]
        );
        assert!(available_actions(&record(Status::PendingApproval), &Actor::developer("Alice")).is_empty());
        assert_eq!(
            available_actions(&record(Status::PendingApproval), &Actor::manager("Diana")),
            vec![Action::Approve, Action::Reopen]
        );
        assert!(available_actions(&record(Status::Closed), &Actor::manager("Diana")).is_empty());
    }
}
