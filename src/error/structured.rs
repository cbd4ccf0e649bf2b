//! Structured error output for scripts and agents.
//!
//! Provides machine-parseable error information with:
//! - Error codes for categorization
//! - Hints for self-correction
//! - Retryability flags
//! - Context for debugging
//!
//! Intent detection maps common near-misses ("done", "wip", "urgent") onto
//! the closed status and priority vocabularies.

#![allow(clippy::option_if_let_else)]

use crate::error::BugError;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Machine-readable error codes.
///
/// These codes are stable and can be used for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // === Store Errors (exit code 2) ===
    /// Record store call failed
    StoreUnavailable,
    /// Workspace not initialized
    NotInitialized,
    /// Already initialized
    AlreadyInitialized,

    // === Bug Errors (exit code 3) ===
    /// Bug with specified ID not found
    BugNotFound,

    // === Validation Errors (exit code 4) ===
    /// Field validation failed
    ValidationFailed,
    /// Invalid status value
    InvalidStatus,
    /// Invalid priority value
    InvalidPriority,
    /// Invalid role value
    InvalidRole,
    /// Invalid sort key
    InvalidSortKey,

    // === Lifecycle Errors (exit code 5) ===
    /// Actor lacks permission
    PermissionDenied,
    /// Transition not allowed from the current status
    InvalidTransition,

    // === Config Errors (exit code 7) ===
    /// Configuration error
    ConfigError,
    /// No current actor
    NoActor,

    // === I/O Errors (exit code 8) ===
    /// File I/O error
    IoError,
    /// JSON serialization error
    JsonError,
    /// YAML parsing error
    YamlError,
}

impl ErrorCode {
    /// Get the string representation for JSON output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::StoreUnavailable => "STORE_UNAVAILABLE",
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::AlreadyInitialized => "ALREADY_INITIALIZED",
            Self::BugNotFound => "BUG_NOT_FOUND",
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::InvalidStatus => "INVALID_STATUS",
            Self::InvalidPriority => "INVALID_PRIORITY",
            Self::InvalidRole => "INVALID_ROLE",
            Self::InvalidSortKey => "INVALID_SORT_KEY",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::InvalidTransition => "INVALID_TRANSITION",
            Self::ConfigError => "CONFIG_ERROR",
            Self::NoActor => "NO_ACTOR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::YamlError => "YAML_ERROR",
        }
    }

    /// Whether fixing the input and running again might succeed.
    ///
    /// Store failures are reported as-is; the caller decides whether to retry.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::StoreUnavailable
                | Self::ValidationFailed
                | Self::InvalidStatus
                | Self::InvalidPriority
                | Self::InvalidRole
                | Self::InvalidSortKey
                | Self::NoActor
        )
    }

    /// Get the exit code for this error category.
    ///
    /// - 2: Store errors
    /// - 3: Bug lookup errors
    /// - 4: Validation errors
    /// - 5: Permission/transition errors
    /// - 7: Config errors
    /// - 8: I/O errors
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::StoreUnavailable | Self::NotInitialized | Self::AlreadyInitialized => 2,
            Self::BugNotFound => 3,
            Self::ValidationFailed
            | Self::InvalidStatus
            | Self::InvalidPriority
            | Self::InvalidRole
            | Self::InvalidSortKey => 4,
            Self::PermissionDenied | Self::InvalidTransition => 5,
            Self::ConfigError | Self::NoActor => 7,
            Self::IoError | Self::JsonError | Self::YamlError => 8,
        }
    }
}

/// Structured error for machine-parseable output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Machine-readable error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional hint for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether the operation can be retried
    pub retryable: bool,
    /// Additional context data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl StructuredError {
    /// Create a new structured error from a `BugError`.
    #[must_use]
    pub fn from_error(err: &BugError) -> Self {
        let (code, context) = Self::extract_code_and_context(err);
        let hint = Self::generate_hint(err);

        Self {
            code,
            message: err.to_string(),
            hint,
            retryable: code.is_retryable(),
            context,
        }
    }

    /// Create a structured error with similar ID suggestions.
    #[must_use]
    pub fn bug_not_found(searched_id: &str, existing_ids: &[String]) -> Self {
        let similar = find_similar_ids(searched_id, existing_ids, 3);

        let hint = if similar.is_empty() {
            Some("Run 'bugboard list' to see available bugs.".to_string())
        } else if similar.len() == 1 {
            Some(format!("Did you mean '{}'?", similar[0]))
        } else {
            Some(format!("Did you mean one of: {}?", similar.join(", ")))
        };

        Self {
            code: ErrorCode::BugNotFound,
            message: format!("Bug not found: {searched_id}"),
            hint,
            retryable: false,
            context: Some(json!({
                "searched_id": searched_id,
                "similar_ids": similar,
            })),
        }
    }

    /// Serialize to JSON value.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "error": {
                "code": self.code.as_str(),
                "message": self.message,
                "hint": self.hint,
                "retryable": self.retryable,
                "context": self.context,
            }
        })
    }

    /// Format for human-readable output.
    #[must_use]
    pub fn to_human(&self, color: bool) -> String {
        let mut output = String::new();

        if color {
            output.push_str("\x1b[31mError:\x1b[0m ");
        } else {
            output.push_str("Error: ");
        }

        output.push_str(&self.message);

        if let Some(hint) = &self.hint {
            output.push('\n');
            if color {
                output.push_str("\x1b[33mHint:\x1b[0m ");
            } else {
                output.push_str("Hint: ");
            }
            output.push_str(hint);
        }

        output
    }

    fn extract_code_and_context(err: &BugError) -> (ErrorCode, Option<Value>) {
        match err {
            BugError::InvalidTransition { from, to } => (
                ErrorCode::InvalidTransition,
                Some(json!({"from": from.as_str(), "to": to.as_str()})),
            ),
            BugError::PermissionDenied {
                actor,
                operation,
                reason,
            } => (
                ErrorCode::PermissionDenied,
                Some(json!({"actor": actor, "operation": operation, "reason": reason})),
            ),
            BugError::Validation { field, reason } => (
                ErrorCode::ValidationFailed,
                Some(json!({"field": field, "reason": reason})),
            ),
            BugError::ValidationErrors { errors } => (
                ErrorCode::ValidationFailed,
                Some(json!({
                    "errors": errors.iter()
                        .map(|e| json!({"field": e.field, "message": e.message}))
                        .collect::<Vec<_>>()
                })),
            ),
            BugError::InvalidStatus { status } => (
                ErrorCode::InvalidStatus,
                Some(json!({"provided": status, "valid_values": VALID_STATUSES})),
            ),
            BugError::InvalidPriority { priority } => (
                ErrorCode::InvalidPriority,
                Some(json!({"provided": priority, "valid_values": VALID_PRIORITIES})),
            ),
            BugError::InvalidRole { role } => {
                (ErrorCode::InvalidRole, Some(json!({"provided": role})))
            }
            BugError::InvalidSortKey { key } => {
                (ErrorCode::InvalidSortKey, Some(json!({"provided": key})))
            }
            BugError::StoreUnavailable { reason } => {
                (ErrorCode::StoreUnavailable, Some(json!({"reason": reason})))
            }
            BugError::BugNotFound { id } => {
                (ErrorCode::BugNotFound, Some(json!({"searched_id": id})))
            }
            BugError::NoActor => (ErrorCode::NoActor, None),
            BugError::Config(_) => (ErrorCode::ConfigError, None),
            BugError::NotInitialized => (ErrorCode::NotInitialized, None),
            BugError::AlreadyInitialized { path } => (
                ErrorCode::AlreadyInitialized,
                Some(json!({"path": path.display().to_string()})),
            ),
            BugError::Io(_) => (ErrorCode::IoError, None),
            BugError::Json(_) => (ErrorCode::JsonError, None),
            BugError::Yaml(_) => (ErrorCode::YamlError, None),
        }
    }

    /// Generate context-aware hint from error.
    fn generate_hint(err: &BugError) -> Option<String> {
        match err {
            BugError::InvalidStatus { status } => {
                if let Some(detected) = detect_status_intent(status) {
                    return Some(format!("Did you mean --status {detected}?"));
                }
            }
            BugError::InvalidPriority { priority } => {
                if let Some(detected) = detect_priority_intent(priority) {
                    return Some(format!("Did you mean --priority {detected}?"));
                }
            }
            BugError::InvalidTransition { from, .. } => {
                return Some(format!(
                    "From '{from}' the allowed moves are: {}",
                    allowed_moves(*from)
                ));
            }
            _ => {}
        }

        err.suggestion().map(str::to_string)
    }
}

fn allowed_moves(from: crate::model::Status) -> &'static str {
    use crate::model::Status;
    match from {
        Status::Open | Status::InProgress => "close (creator or assignee)",
        Status::PendingApproval => "approve or reopen (manager)",
        Status::Closed => "none; edit the bug to reopen it",
    }
}

// === Valid Values ===

const VALID_STATUSES: [&str; 4] = ["open", "in-progress", "pending-approval", "closed"];

const VALID_PRIORITIES: [&str; 4] = ["low", "medium", "high", "critical"];

/// Status synonyms for intent detection.
static STATUS_SYNONYMS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    [
        ("done", "closed"),
        ("complete", "closed"),
        ("completed", "closed"),
        ("resolved", "closed"),
        ("wip", "in-progress"),
        ("working", "in-progress"),
        ("active", "in-progress"),
        ("started", "in-progress"),
        ("new", "open"),
        ("todo", "open"),
        ("review", "pending-approval"),
        ("awaiting-approval", "pending-approval"),
        ("approval", "pending-approval"),
    ]
    .into_iter()
    .collect()
});

/// Priority synonyms for intent detection.
static PRIORITY_SYNONYMS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    [
        ("urgent", "critical"),
        ("highest", "critical"),
        ("blocker", "critical"),
        ("p0", "critical"),
        ("p1", "high"),
        ("important", "high"),
        ("p2", "medium"),
        ("normal", "medium"),
        ("default", "medium"),
        ("p3", "low"),
        ("minor", "low"),
        ("trivial", "low"),
    ]
    .into_iter()
    .collect()
});

// === Intent Detection ===

/// Detect what status the user likely meant.
fn detect_status_intent(input: &str) -> Option<&'static str> {
    let lower = input.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }

    if let Some(&status) = VALID_STATUSES.iter().find(|s| **s == lower) {
        return Some(status);
    }

    if let Some(&canonical) = STATUS_SYNONYMS.get(lower.as_str()) {
        return Some(canonical);
    }

    VALID_STATUSES
        .iter()
        .copied()
        .find(|status| status.starts_with(&lower))
}

/// Detect what priority the user likely meant.
fn detect_priority_intent(input: &str) -> Option<&'static str> {
    let lower = input.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }

    if let Some(&priority) = VALID_PRIORITIES.iter().find(|p| **p == lower) {
        return Some(priority);
    }

    if let Some(&canonical) = PRIORITY_SYNONYMS.get(lower.as_str()) {
        return Some(canonical);
    }

    VALID_PRIORITIES
        .iter()
        .copied()
        .find(|priority| priority.starts_with(&lower))
}

// === Levenshtein Distance ===

/// Calculate the Levenshtein distance between two strings.
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0; b_chars.len() + 1];

    for (i, a_char) in a_chars.iter().enumerate() {
        current[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}

/// Find IDs similar to the searched ID using Levenshtein distance.
///
/// Returns up to `max_suggestions` IDs with distance <= 3.
#[must_use]
pub fn find_similar_ids(searched: &str, existing: &[String], max_suggestions: usize) -> Vec<String> {
    let mut candidates: Vec<(usize, &str)> = existing
        .iter()
        .map(|id| (levenshtein_distance(searched, id), id.as_str()))
        .filter(|(dist, _)| *dist <= 3)
        .collect();

    candidates.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));

    candidates
        .into_iter()
        .take(max_suggestions)
        .map(|(_, id)| id.to_string())
        .collect()
}
