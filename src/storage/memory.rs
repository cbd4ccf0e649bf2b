//! In-process record store.

use crate::error::{BugError, Result};
use crate::model::{BugDraft, BugPatch, BugRecord};
use crate::storage::RecordStore;
use crate::util::generate_id;
use chrono::Utc;

/// A `RecordStore` held entirely in memory.
///
/// Used by tests and throwaway sessions. IDs and timestamps are assigned the
/// same way `SqliteStore` assigns them.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<BugRecord>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records, kept as given.
    #[must_use]
    pub fn with_records(records: Vec<BugRecord>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&BugRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| BugError::BugNotFound { id: id.to_string() })
    }
}

impl RecordStore for MemoryStore {
    fn list_all(&self) -> Result<Vec<BugRecord>> {
        Ok(self.records.clone())
    }

    fn create(&mut self, draft: &BugDraft, created_by: &str) -> Result<String> {
        let now = Utc::now();
        let id = generate_id(draft.title.trim(), created_by, now, |candidate| {
            Ok(self.records.iter().any(|r| r.id == candidate))
        })?;
        self.records
            .push(BugRecord::from_draft(id.clone(), draft, created_by, now));
        Ok(id)
    }

    fn update(&mut self, id: &str, patch: &BugPatch) -> Result<()> {
        let index = self.position(id)?;
        let record = &mut self.records[index];
        patch.apply_to(record);
        record.updated_at = Some(patch.updated_at.unwrap_or_else(Utc::now));
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        let index = self.position(id)?;
        self.records.remove(index);
        Ok(())
    }
}
