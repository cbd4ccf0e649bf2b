//! `SQLite` record store.

use crate::error::{BugError, Result};
use crate::model::{BugDraft, BugPatch, BugRecord};
use crate::storage::RecordStore;
use crate::storage::schema::apply_schema;
use crate::util::generate_id;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

const SELECT_COLUMNS: &str = "id, title, description, status, priority, project, assignee, \
     created_by, due_date, created_at, updated_at, closed_by, closed_at, approved_by, approved_at";

/// SQLite-based record store.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a new connection to the database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema application fails.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_timeout(path, None)
    }

    /// Open a new connection with an optional busy timeout (ms).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema application fails.
    pub fn open_with_timeout(path: &Path, lock_timeout_ms: Option<u64>) -> Result<Self> {
        let conn = Connection::open(path)?;
        if let Some(timeout) = lock_timeout_ms {
            conn.busy_timeout(Duration::from_millis(timeout))?;
        }
        apply_schema(&conn)?;
        debug!(path = %path.display(), "opened record store");
        Ok(Self { conn })
    }

    /// Open an in-memory database for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Run `f` inside an immediate transaction, rolling back on error.
    ///
    /// # Errors
    ///
    /// Returns any error raised by `f` or by the transaction itself.
    pub fn mutate<F, R>(&mut self, op: &str, f: F) -> Result<R>
    where
        F: FnOnce(&Transaction) -> Result<R>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        let result = f(&tx)?;
        tx.commit()?;
        debug!(op, "committed");
        Ok(result)
    }

    /// Get a record by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get(&self, id: &str) -> Result<Option<BugRecord>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM bugs WHERE id = ?");
        let record = self
            .conn
            .query_row(&sql, [id], record_from_row)
            .optional()?;

        match record {
            Some(mut record) => {
                record.labels = self.labels_for(id)?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Number of stored records.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT count(*) FROM bugs", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Insert fully-formed records as given, keeping their IDs and timestamps.
    ///
    /// Existing records with the same ID are replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails; nothing is written in that case.
    pub fn import(&mut self, records: &[BugRecord]) -> Result<usize> {
        self.mutate("import", |tx| {
            for record in records {
                tx.execute("DELETE FROM bugs WHERE id = ?", [&record.id])?;
                insert_record(tx, record)?;
            }
            Ok(records.len())
        })
    }

    fn labels_for(&self, id: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT label FROM labels WHERE bug_id = ? ORDER BY position")?;
        let labels = stmt
            .query_map([id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(labels)
    }

    fn all_labels(&self) -> Result<HashMap<String, Vec<String>>> {
        let mut stmt = self
            .conn
            .prepare("SELECT bug_id, label FROM labels ORDER BY bug_id, position")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

        let mut map: HashMap<String, Vec<String>> = HashMap::new();
        for row in rows {
            let (bug_id, label) = row?;
            map.entry(bug_id).or_default().push(label);
        }
        Ok(map)
    }
}

impl RecordStore for SqliteStore {
    fn list_all(&self) -> Result<Vec<BugRecord>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM bugs ORDER BY rowid");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut records = stmt
            .query_map([], record_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut labels = self.all_labels()?;
        for record in &mut records {
            if let Some(found) = labels.remove(&record.id) {
                record.labels = found;
            }
        }

        debug!(count = records.len(), "listed records");
        Ok(records)
    }

    fn create(&mut self, draft: &BugDraft, created_by: &str) -> Result<String> {
        let now = Utc::now();
        self.mutate("create", |tx| {
            let mut exists_stmt = tx.prepare("SELECT 1 FROM bugs WHERE id = ?")?;
            let id = generate_id(draft.title.trim(), created_by, now, |candidate| {
                Ok(exists_stmt.exists([candidate])?)
            })?;
            drop(exists_stmt);

            let record = BugRecord::from_draft(id.clone(), draft, created_by, now);
            insert_record(tx, &record)?;
            Ok(id)
        })
    }

    fn update(&mut self, id: &str, patch: &BugPatch) -> Result<()> {
        self.mutate("update", |tx| {
            let mut set_clauses: Vec<&str> = vec![];
            let mut values: Vec<Box<dyn rusqlite::ToSql>> = vec![];

            let mut add_update = |clause: &'static str, val: Box<dyn rusqlite::ToSql>| {
                set_clauses.push(clause);
                values.push(val);
            };

            if let Some(title) = &patch.title {
                add_update("title = ?", Box::new(title.clone()));
            }
            if let Some(description) = &patch.description {
                add_update("description = ?", Box::new(description.clone()));
            }
            if let Some(status) = patch.status {
                add_update("status = ?", Box::new(status.as_str()));
            }
            if let Some(priority) = patch.priority {
                add_update("priority = ?", Box::new(priority.as_str()));
            }
            if let Some(project) = &patch.project {
                add_update("project = ?", Box::new(project.clone()));
            }
            if let Some(assignee) = &patch.assignee {
                add_update("assignee = ?", Box::new(assignee.clone()));
            }
            if let Some(due_date) = patch.due_date {
                add_update("due_date = ?", Box::new(due_date.map(|d| d.to_string())));
            }
            if let Some(closed_by) = &patch.closed_by {
                add_update("closed_by = ?", Box::new(closed_by.clone()));
            }
            if let Some(closed_at) = patch.closed_at {
                add_update("closed_at = ?", Box::new(closed_at.to_rfc3339()));
            }
            if let Some(approved_by) = &patch.approved_by {
                add_update("approved_by = ?", Box::new(approved_by.clone()));
            }
            if let Some(approved_at) = patch.approved_at {
                add_update("approved_at = ?", Box::new(approved_at.to_rfc3339()));
            }

            // Always refresh updated_at
            let updated_at = patch.updated_at.unwrap_or_else(Utc::now);
            add_update("updated_at = ?", Box::new(updated_at.to_rfc3339()));

            let sql = format!("UPDATE bugs SET {} WHERE id = ?", set_clauses.join(", "));
            values.push(Box::new(id.to_string()));

            let params_refs: Vec<&dyn rusqlite::ToSql> = values.iter().map(AsRef::as_ref).collect();
            let changed = tx.execute(&sql, params_refs.as_slice())?;
            if changed == 0 {
                return Err(BugError::BugNotFound { id: id.to_string() });
            }
            Ok(())
        })
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        self.mutate("delete", |tx| {
            let changed = tx.execute("DELETE FROM bugs WHERE id = ?", [id])?;
            if changed == 0 {
                return Err(BugError::BugNotFound { id: id.to_string() });
            }
            Ok(())
        })
    }
}

fn insert_record(tx: &Transaction, record: &BugRecord) -> Result<()> {
    tx.execute(
        "INSERT INTO bugs (
            id, title, description, status, priority, project, assignee, created_by,
            due_date, created_at, updated_at, closed_by, closed_at, approved_by, approved_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            record.id,
            record.title,
            record.description,
            record.status.as_str(),
            record.priority.as_str(),
            record.project,
            record.assignee,
            record.created_by,
            record.due_date.map(|d| d.to_string()),
            record.created_at.map(|dt| dt.to_rfc3339()),
            record.updated_at.map(|dt| dt.to_rfc3339()),
            record.closed_by,
            record.closed_at.map(|dt| dt.to_rfc3339()),
            record.approved_by,
            record.approved_at.map(|dt| dt.to_rfc3339()),
        ],
    )?;

    for (position, label) in record.labels.iter().enumerate() {
        tx.execute(
            "INSERT OR IGNORE INTO labels (bug_id, position, label) VALUES (?, ?, ?)",
            params![record.id, i64::try_from(position).unwrap_or(i64::MAX), label],
        )?;
    }

    Ok(())
}

fn record_from_row(row: &rusqlite::Row) -> rusqlite::Result<BugRecord> {
    Ok(BugRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        status: parse_enum(3, &row.get::<_, String>(3)?)?,
        priority: parse_enum(4, &row.get::<_, String>(4)?)?,
        project: row.get(5)?,
        assignee: row.get(6)?,
        created_by: row.get(7)?,
        due_date: row.get::<_, Option<String>>(8)?.as_deref().and_then(parse_date),
        labels: Vec::new(),
        created_at: row
            .get::<_, Option<String>>(9)?
            .as_deref()
            .and_then(parse_datetime),
        updated_at: row
            .get::<_, Option<String>>(10)?
            .as_deref()
            .and_then(parse_datetime),
        closed_by: row.get(11)?,
        closed_at: row
            .get::<_, Option<String>>(12)?
            .as_deref()
            .and_then(parse_datetime),
        approved_by: row.get(13)?,
        approved_at: row
            .get::<_, Option<String>>(14)?
            .as_deref()
            .and_then(parse_datetime),
    })
}

// The CHECK constraints keep these columns in range, so a value that does not
// parse means the row was written by something else.
fn parse_enum<T>(column: usize, s: &str) -> rusqlite::Result<T>
where
    T: FromStr<Err = BugError>,
{
    s.parse().map_err(|err: BugError| {
        warn!(column, value = s, "unreadable value in store");
        rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
    })
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Status;
    use tempfile::TempDir;

    fn draft(title: &str) -> BugDraft {
        let mut draft = BugDraft::new(title, "Project A");
        draft.labels = vec!["ui".to_string(), "bug".to_string()];
        draft
    }

    #[test]
    fn create_then_list_round_trips_labels_in_order() {
        let mut store = SqliteStore::open_memory().unwrap();
        let id = store.create(&draft("Crash"), "Alice").unwrap();

        let records = store.list_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, id);
        assert_eq!(records[0].labels, vec!["ui".to_string(), "bug".to_string()]);
        assert!(records[0].created_at.is_some());
    }

    #[test]
    fn list_preserves_insertion_order() {
        let mut store = SqliteStore::open_memory().unwrap();
        let a = store.create(&draft("First"), "Alice").unwrap();
        let b = store.create(&draft("Second"), "Bob").unwrap();
        let ids: Vec<_> = store.list_all().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn update_clears_assignee_and_sets_audit_fields() {
        let mut store = SqliteStore::open_memory().unwrap();
        let mut d = draft("Crash");
        d.assignee = Some("Bob".to_string());
        let id = store.create(&d, "Alice").unwrap();

        let now = Utc::now();
        store
            .update(
                &id,
                &BugPatch {
                    status: Some(Status::PendingApproval),
                    assignee: Some(None),
                    closed_by: Some("Alice".to_string()),
                    closed_at: Some(now),
                    updated_at: Some(now),
                    ..Default::default()
                },
            )
            .unwrap();

        let record = store.get(&id).unwrap().unwrap();
        assert_eq!(record.status, Status::PendingApproval);
        assert!(record.assignee.is_none());
        assert_eq!(record.closed_by.as_deref(), Some("Alice"));
        assert_eq!(record.created_by, "Alice");
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let mut store = SqliteStore::open_memory().unwrap();
        let result = store.update("bug-nope", &BugPatch::default());
        assert!(matches!(result, Err(BugError::BugNotFound { .. })));
    }

    #[test]
    fn delete_removes_record_and_labels() {
        let mut store = SqliteStore::open_memory().unwrap();
        let id = store.create(&draft("Crash"), "Alice").unwrap();
        store.delete(&id).unwrap();
        assert_eq!(store.count().unwrap(), 0);
        assert!(matches!(
            store.delete(&id),
            Err(BugError::BugNotFound { .. })
        ));
    }

    #[test]
    fn import_keeps_missing_timestamps() {
        let mut store = SqliteStore::open_memory().unwrap();
        let mut record = BugRecord::from_draft("bug-legacy", &draft("Old"), "Bob", Utc::now());
        record.created_at = None;
        record.updated_at = None;
        store.import(&[record]).unwrap();

        let loaded = store.get("bug-legacy").unwrap().unwrap();
        assert!(loaded.created_at.is_none());
    }

    #[test]
    fn reopening_file_keeps_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bugboard.db");
        let id = {
            let mut store = SqliteStore::open(&path).unwrap();
            store.create(&draft("Persisted"), "Alice").unwrap()
        };
        let store = SqliteStore::open_with_timeout(&path, Some(1000)).unwrap();
        assert!(store.get(&id).unwrap().is_some());
    }

    #[test]
    fn corrupt_status_surfaces_as_store_unavailable() {
        let mut store = SqliteStore::open_memory().unwrap();
        store.create(&draft("Crash"), "Alice").unwrap();
        store
            .conn
            .execute_batch(
                "PRAGMA ignore_check_constraints = ON;
                 UPDATE bugs SET status = 'resolved';",
            )
            .unwrap();

        let err = store.list_all().unwrap_err();
        assert!(
            matches!(&err, BugError::StoreUnavailable { reason } if reason.contains("resolved"))
        );
    }

    #[test]
    fn corrupt_priority_surfaces_as_store_unavailable() {
        let mut store = SqliteStore::open_memory().unwrap();
        let id = store.create(&draft("Crash"), "Alice").unwrap();
        store
            .conn
            .execute_batch(
                "PRAGMA ignore_check_constraints = ON;
                 UPDATE bugs SET priority = 'p0';",
            )
            .unwrap();

        assert!(matches!(store.get(&id), Err(BugError::StoreUnavailable { .. })));
    }

    #[test]
    fn failed_id_lookup_aborts_create() {
        let mut store = SqliteStore::open_memory().unwrap();
        // A view whose every read overflows makes the collision lookup fail.
        store
            .conn
            .execute_batch(
                "ALTER TABLE bugs RENAME TO bugs_rows;
                 CREATE VIEW bugs AS
                     SELECT id FROM bugs_rows WHERE abs(-9223372036854775808) > 0;",
            )
            .unwrap();

        let err = store.create(&draft("Crash"), "Alice").unwrap_err();
        assert!(matches!(err, BugError::StoreUnavailable { .. }));
        assert_eq!(
            store
                .conn
                .query_row("SELECT COUNT(*) FROM bugs_rows", [], |row| row.get::<_, i64>(0))
                .unwrap(),
            0
        );
    }

    #[test]
    fn parse_datetime_accepts_sqlite_format() {
        assert!(parse_datetime("2024-01-01 10:00:00").is_some());
        assert!(parse_datetime("2024-01-01T10:00:00Z").is_some());
        assert!(parse_datetime("yesterday").is_none());
    }
}
