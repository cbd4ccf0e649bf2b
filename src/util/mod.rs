//! Shared utilities for `bugboard`.
//!
//! - ID generation and prefix resolution
//! - Due-date parsing
//! - Workspace directory helpers

pub mod id;
pub mod time;

pub use id::{generate_id, resolve_id};
pub use time::{parse_due_date, utc_date};

use std::path::{Path, PathBuf};

/// Name of the workspace directory.
pub const WORKSPACE_DIR: &str = ".bugboard";

/// Default database file name inside the workspace directory.
pub const DB_FILE: &str = "bugboard.db";

/// Default config file name inside the workspace directory.
pub const CONFIG_FILE: &str = "config.yaml";

/// Build the default database path from the workspace directory.
#[must_use]
pub fn default_db_path(bugboard_dir: &Path) -> PathBuf {
    bugboard_dir.join(DB_FILE)
}

/// Build the project config path from the workspace directory.
#[must_use]
pub fn project_config_path(bugboard_dir: &Path) -> PathBuf {
    bugboard_dir.join(CONFIG_FILE)
}
