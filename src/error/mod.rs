//! Error types and handling for `bugboard`.
//!
//! # Design
//!
//! - Uses `thiserror` for derive-based error types
//! - Permission and transition failures are distinct variants so callers can
//!   tell "not allowed for you" from "not allowed from this state"
//! - Every store failure surfaces as `StoreUnavailable`; nothing retries
//! - Provides recovery hints and structured JSON output for the CLI

mod structured;

pub use structured::{ErrorCode, StructuredError};

use crate::model::Status;
use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for `bugboard` operations.
#[derive(Error, Debug)]
pub enum BugError {
    // === Lifecycle Errors ===
    /// The requested status change is not in the transition table.
    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition { from: Status, to: Status },

    /// The actor lacks the role or ownership for the operation.
    #[error("Permission denied: {actor} cannot {operation}: {reason}")]
    PermissionDenied {
        actor: String,
        operation: String,
        reason: String,
    },

    // === Validation Errors ===
    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Multiple validation errors occurred.
    #[error("Validation errors: {errors:?}")]
    ValidationErrors { errors: Vec<ValidationError> },

    /// Invalid status value.
    #[error("Invalid status: {status}")]
    InvalidStatus { status: String },

    /// Invalid priority value.
    #[error("Invalid priority: {priority}")]
    InvalidPriority { priority: String },

    /// Invalid role value.
    #[error("Invalid role: {role}")]
    InvalidRole { role: String },

    /// Unknown sort key.
    #[error("Invalid sort key: {key}")]
    InvalidSortKey { key: String },

    // === Store Errors ===
    /// The record store call failed.
    #[error("Record store unavailable: {reason}")]
    StoreUnavailable { reason: String },

    /// Bug with the specified ID was not found.
    #[error("Bug not found: {id}")]
    BugNotFound { id: String },

    // === Session / Configuration Errors ===
    /// No current actor could be resolved.
    #[error("No current actor: set --actor or BUGBOARD_ACTOR")]
    NoActor,

    /// Configuration file error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Workspace not initialized.
    #[error("Bugboard not initialized: run 'bugboard init' first")]
    NotInitialized,

    /// Already initialized.
    #[error("Already initialized at '{path}'")]
    AlreadyInitialized { path: PathBuf },

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl From<rusqlite::Error> for BugError {
    fn from(err: rusqlite::Error) -> Self {
        Self::StoreUnavailable {
            reason: err.to_string(),
        }
    }
}

/// A single field validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// The reason for the validation failure.
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

impl BugError {
    /// Can the user fix this without code changes?
    #[must_use]
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotInitialized
                | Self::NoActor
                | Self::BugNotFound { .. }
                | Self::Validation { .. }
                | Self::ValidationErrors { .. }
                | Self::InvalidStatus { .. }
                | Self::InvalidPriority { .. }
                | Self::InvalidRole { .. }
                | Self::InvalidSortKey { .. }
        )
    }

    /// True for errors raised before any store call was attempted.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidTransition { .. }
                | Self::PermissionDenied { .. }
                | Self::Validation { .. }
                | Self::ValidationErrors { .. }
        )
    }

    /// Human-friendly suggestion for fixing this error.
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run: bugboard init"),
            Self::NoActor => Some("Pass --actor <name> --role <developer|manager>"),
            Self::AlreadyInitialized { .. } => Some("Use --force to reinitialize"),
            Self::BugNotFound { .. } => Some("Run 'bugboard list' to see available bugs"),
            Self::InvalidStatus { .. } => {
                Some("Valid statuses: open, in-progress, pending-approval, closed")
            }
            Self::InvalidPriority { .. } => Some("Valid priorities: low, medium, high, critical"),
            Self::InvalidRole { .. } => Some("Valid roles: developer, manager"),
            Self::InvalidSortKey { .. } => Some(
                "Valid sort keys: title, project, status, priority, assignee, created-by, created-at, updated-at, due-date",
            ),
            _ => None,
        }
    }

    /// Create a validation error for a specific field.
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a permission error.
    #[must_use]
    pub fn permission_denied(
        actor: impl Into<String>,
        operation: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::PermissionDenied {
            actor: actor.into(),
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Create from multiple validation errors.
    #[must_use]
    pub fn from_validation_errors(errors: Vec<ValidationError>) -> Self {
        if errors.len() == 1 {
            let err = &errors[0];
            Self::Validation {
                field: err.field.clone(),
                reason: err.message.clone(),
            }
        } else {
            Self::ValidationErrors { errors }
        }
    }
}

/// Result type using `BugError`.
pub type Result<T> = std::result::Result<T, BugError>;
