//! Command implementations.
//!
//! Every command that reads or writes bugs goes through [`CommandContext`],
//! which discovers the workspace, merges config, resolves the current actor
//! and loads the dashboard cache.

pub mod approve;
pub mod close;
pub mod completions;
pub mod create;
pub mod delete;
pub mod init;
pub mod list;
pub mod reopen;
pub mod show;
pub mod stats;
pub mod trend;
pub mod update;

use crate::config::{self, CliOverrides, ConfigLayer};
use crate::dashboard::Dashboard;
use crate::error::{BugError, Result};
use crate::format::{TextFormatOptions, terminal_width};
use crate::model::{Actor, BugRecord};
use crate::storage::{RecordStore, SqliteStore};
use crate::util::resolve_id;
use serde::Serialize;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Everything a command needs after startup.
pub struct CommandContext {
    pub bugboard_dir: PathBuf,
    pub db_path: PathBuf,
    pub layer: ConfigLayer,
    pub actor: Actor,
    pub dashboard: Dashboard<SqliteStore>,
}

impl CommandContext {
    /// Open the workspace found from the current directory.
    ///
    /// # Errors
    ///
    /// Returns `NotInitialized`, `NoActor`, config errors, or store errors.
    pub fn open(cli: &CliOverrides) -> Result<Self> {
        Self::open_in(Path::new("."), cli)
    }

    /// Open the workspace found from `start`.
    ///
    /// # Errors
    ///
    /// Returns `NotInitialized`, `NoActor`, config errors, or store errors.
    pub fn open_in(start: &Path, cli: &CliOverrides) -> Result<Self> {
        let bugboard_dir = config::discover_bugboard_dir(Some(start))?;
        let layer = config::load_config(&bugboard_dir, cli)?;

        // No actor means nothing is rendered at all.
        let actor = config::resolve_actor(&layer)?;
        let vocabulary = config::vocabulary_from_layer(&layer);
        let sync_mode = config::sync_mode_from_layer(&layer)?;

        let (store, db_path) = config::open_store(&bugboard_dir, &layer)?;
        let dashboard = Dashboard::open(store, vocabulary, sync_mode)?;
        debug!(
            dir = %bugboard_dir.display(),
            db = %db_path.display(),
            actor = %actor,
            records = dashboard.records().len(),
            "opened workspace"
        );

        Ok(Self {
            bugboard_dir,
            db_path,
            layer,
            actor,
            dashboard,
        })
    }

    /// True if JSON output was requested by flag or config.
    #[must_use]
    pub fn json(&self, flag: bool) -> bool {
        flag || config::json_from_layer(&self.layer)
    }

    #[must_use]
    pub fn text_options(&self) -> TextFormatOptions {
        TextFormatOptions {
            use_color: config::should_use_color(&self.layer),
            max_width: std::io::stdout().is_terminal().then(terminal_width),
        }
    }

    /// Resolve a full ID or unique prefix against the cached records.
    ///
    /// # Errors
    ///
    /// Returns `BugNotFound` or an ambiguity error.
    pub fn resolve(&self, input: &str) -> Result<String> {
        resolve_id(
            input,
            self.dashboard.records().iter().map(|record| record.id.as_str()),
        )
    }

    /// The cached record for an already-resolved ID.
    ///
    /// # Errors
    ///
    /// Returns `BugNotFound` if the record disappeared from the cache.
    pub fn record(&self, id: &str) -> Result<&BugRecord> {
        self.dashboard
            .get(id)
            .ok_or_else(|| BugError::BugNotFound { id: id.to_string() })
    }
}

/// IDs in the current workspace, for "did you mean" hints.
///
/// Best effort: any failure yields an empty list.
#[must_use]
pub fn known_ids(cli: &CliOverrides) -> Vec<String> {
    config::discover_bugboard_dir(Some(Path::new(".")))
        .and_then(|dir| {
            let layer = config::load_config(&dir, cli)?;
            let (store, _) = config::open_store(&dir, &layer)?;
            store.list_all()
        })
        .map(|records| records.into_iter().map(|record| record.id).collect())
        .unwrap_or_default()
}

/// Stats and trend cover every bug, so only managers see them.
///
/// # Errors
///
/// Returns `PermissionDenied` for developers.
pub fn require_manager(actor: &Actor, operation: &str) -> Result<()> {
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

/// Print a value as pretty JSON on stdout.
///
/// # Errors
///
/// Returns a JSON error if serialization fails.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Result of a single-bug mutation, for JSON output.
#[derive(Debug, Serialize)]
pub struct MutationResult<'a> {
    pub action: &'static str,
    pub id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bug: Option<&'a BugRecord>,
}

/// Report a completed mutation in the requested format.
///
/// # Errors
///
/// Returns a JSON error if serialization fails.
pub fn report_mutation(
    ctx: &CommandContext,
    action: &'static str,
    id: &str,
    json: bool,
) -> Result<()> {
    let bug = ctx.dashboard.get(id);
    if ctx.json(json) {
        return print_json(&MutationResult { action, id, bug });
    }

    match bug {
        Some(bug) => println!(
            "{} {id}: {} ({})",
            past_tense(action),
            bug.title,
            bug.status
        ),
        None => println!("{} {id}", past_tense(action)),
    }
    Ok(())
}

fn past_tense(action: &str) -> String {
    let mut chars = action.chars();
    let head: String = chars
        .next()
        .map(|c| c.to_uppercase().collect::<String>())
        .unwrap_or_default();
    let rest = chars.as_str();
    if rest.ends_with('e') {
        format!("{head}{rest}d")
    } else {
        format!("{head}{rest}ed")
    }
}
