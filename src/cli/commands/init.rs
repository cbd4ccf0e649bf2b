//! Init command implementation.

use crate::config::CONFIG_TEMPLATE;
use crate::error::{BugError, Result};
use crate::storage::SqliteStore;
use crate::util::{DB_FILE, WORKSPACE_DIR, default_db_path, project_config_path};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

const GITIGNORE: &str = "\
# Database
*.db
*.db-shm
*.db-wal
";

#[derive(Debug, Serialize)]
struct InitResult {
    workspace: String,
    database: String,
}

/// Execute the init command.
///
/// # Errors
///
/// Returns `AlreadyInitialized` if a database exists and `force` is not set,
/// or an error if the directory or database cannot be created.
pub fn execute(force: bool, json: bool, root_dir: Option<&Path>) -> Result<()> {
    let base_dir = root_dir.unwrap_or_else(|| Path::new("."));
    let bugboard_dir = base_dir.join(WORKSPACE_DIR);
    let db_path = default_db_path(&bugboard_dir);

    if bugboard_dir.exists() {
        if db_path.exists() && !force {
            return Err(BugError::AlreadyInitialized { path: db_path });
        }
        if force && db_path.exists() {
            fs::remove_file(&db_path)?;
            for suffix in ["-wal", "-shm"] {
                let sidecar = db_path.with_file_name(format!("{DB_FILE}{suffix}"));
                if sidecar.exists() {
                    fs::remove_file(sidecar)?;
                }
            }
        }
    } else {
        fs::create_dir_all(&bugboard_dir)?;
    }

    // Opening applies the schema.
    SqliteStore::open(&db_path)?;

    let config_path = project_config_path(&bugboard_dir);
    if !config_path.exists() {
        fs::write(&config_path, CONFIG_TEMPLATE)?;
    }

    let gitignore_path = bugboard_dir.join(".gitignore");
    if !gitignore_path.exists() {
        fs::write(gitignore_path, GITIGNORE)?;
    }

    info!(path = %bugboard_dir.display(), force, "initialized workspace");

    if json {
        let result = InitResult {
            workspace: bugboard_dir.display().to_string(),
            database: db_path.display().to_string(),
        };
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Initialized bugboard workspace in {WORKSPACE_DIR}/");
    }
    Ok(())
}
