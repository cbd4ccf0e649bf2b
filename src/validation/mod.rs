//! Validation helpers for `bugboard`.
//!
//! These routines check drafts and edits against field limits and the
//! configured vocabularies. They collect every failure and never touch the
//! record store.

use crate::config::Vocabulary;
use crate::error::ValidationError;
use crate::model::{BugDraft, BugEdit};
use std::collections::HashSet;

/// Maximum title length, in characters.
pub const MAX_TITLE_CHARS: usize = 200;

/// Maximum description length, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 10_000;

/// Validates bug drafts and edits.
pub struct BugValidator;

impl BugValidator {
    /// Validate a new bug draft and return all validation errors found.
    ///
    /// # Errors
    ///
    /// Returns a `Vec<ValidationError>` if any validation rules are violated.
    pub fn validate_draft(
        draft: &BugDraft,
        vocabulary: &Vocabulary,
    ) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        check_title(&draft.title, &mut errors);
        check_description(&draft.description, &mut errors);
        check_project(&draft.project, vocabulary, &mut errors);
        if let Some(assignee) = draft.assignee.as_deref() {
            check_assignee(assignee, vocabulary, &mut errors);
        }
        check_labels(&draft.labels, vocabulary, &mut errors);

        if !draft.status.is_active() {
            errors.push(ValidationError::new(
                "status",
                format!("new bugs must be open or in-progress, not {}", draft.status),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate the fields touched by an edit.
    ///
    /// Status rules depend on the record's current status and are enforced by
    /// the transition engine, not here.
    ///
    /// # Errors
    ///
    /// Returns a `Vec<ValidationError>` if any validation rules are violated.
    pub fn validate_edit(edit: &BugEdit, vocabulary: &Vocabulary) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Some(title) = edit.title.as_deref() {
            check_title(title, &mut errors);
        }
        if let Some(description) = edit.description.as_deref() {
            check_description(description, &mut errors);
        }
        if let Some(project) = edit.project.as_deref() {
            check_project(project, vocabulary, &mut errors);
        }
        if let Some(Some(assignee)) = edit.assignee.as_ref() {
            check_assignee(assignee, vocabulary, &mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn check_title(title: &str, errors: &mut Vec<ValidationError>) {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        errors.push(ValidationError::new("title", "cannot be empty"));
    } else if trimmed.chars().count() > MAX_TITLE_CHARS {
        errors.push(ValidationError::new(
            "title",
            format!("exceeds {MAX_TITLE_CHARS} characters"),
        ));
    }
}

fn check_description(description: &str, errors: &mut Vec<ValidationError>) {
    if description.chars().count() > MAX_DESCRIPTION_CHARS {
        errors.push(ValidationError::new(
            "description",
            format!("exceeds {MAX_DESCRIPTION_CHARS} characters"),
        ));
    }
}

fn check_project(project: &str, vocabulary: &Vocabulary, errors: &mut Vec<ValidationError>) {
    if project.trim().is_empty() {
        errors.push(ValidationError::new("project", "is required"));
    } else if !vocabulary.has_project(project) {
        errors.push(ValidationError::new(
            "project",
            format!("unknown project '{project}'"),
        ));
    }
}

fn check_assignee(assignee: &str, vocabulary: &Vocabulary, errors: &mut Vec<ValidationError>) {
    if !vocabulary.has_member(assignee) {
        errors.push(ValidationError::new(
            "assignee",
            format!("'{assignee}' is not a team member"),
        ));
    }
}

fn check_labels(labels: &[String], vocabulary: &Vocabulary, errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();
    for label in labels {
        if !vocabulary.has_label(label) {
            errors.push(ValidationError::new(
                "labels",
                format!("unknown label '{label}'"),
            ));
        }
        if !seen.insert(label.as_str()) {
            errors.push(ValidationError::new(
                "labels",
                format!("duplicate label '{label}'"),
            ));
        }
    }
}
