//! Database schema definitions.

use rusqlite::{Connection, Result};

pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// The complete SQL schema for the bugboard database.
pub const SCHEMA_SQL: &str = r"
    -- Bugs table
    -- Timestamps are RFC3339 text; created_at/updated_at may be NULL for
    -- records that were never stamped by a store.
    CREATE TABLE IF NOT EXISTS bugs (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        status TEXT NOT NULL DEFAULT 'open',
        priority TEXT NOT NULL DEFAULT 'medium',
        project TEXT NOT NULL,
        assignee TEXT,
        created_by TEXT NOT NULL,
        due_date TEXT,
        created_at TEXT,
        updated_at TEXT,
        closed_by TEXT,
        closed_at TEXT,
        approved_by TEXT,
        approved_at TEXT,
        CHECK (length(title) >= 1),
        CHECK (status IN ('open', 'in-progress', 'pending-approval', 'closed')),
        CHECK (priority IN ('low', 'medium', 'high', 'critical'))
    );

    CREATE INDEX IF NOT EXISTS idx_bugs_status ON bugs(status);
    CREATE INDEX IF NOT EXISTS idx_bugs_project ON bugs(project);
    CREATE INDEX IF NOT EXISTS idx_bugs_created_by ON bugs(created_by);
    CREATE INDEX IF NOT EXISTS idx_bugs_assignee ON bugs(assignee);

    -- Labels keep their insertion order via position
    CREATE TABLE IF NOT EXISTS labels (
        bug_id TEXT NOT NULL,
        position INTEGER NOT NULL,
        label TEXT NOT NULL,
        PRIMARY KEY (bug_id, label),
        FOREIGN KEY (bug_id) REFERENCES bugs(id) ON DELETE CASCADE
    );

    CREATE INDEX IF NOT EXISTS idx_labels_label ON labels(label);
";

/// Apply the schema to the database.
///
/// # Errors
///
/// Returns an error if the SQL execution fails.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    // WAL is not available for in-memory databases; SQLite reports "memory"
    // and carries on.
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.pragma_update(None, "user_version", CURRENT_SCHEMA_VERSION)?;

    Ok(())
}
