//! Record store contract and implementations.
//!
//! The store is the sole source of truth for bug records. It assigns IDs and
//! timestamps; everything else (permissions, lifecycle, derived views) lives
//! above it and never retries a failed call.

mod memory;
pub mod schema;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::model::{BugDraft, BugPatch, BugRecord};

/// Persistence operations the dashboard relies on.
///
/// Every method may fail with `StoreUnavailable`.
pub trait RecordStore {
    /// All records, unfiltered, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_all(&self) -> Result<Vec<BugRecord>>;

    /// Persist a new record and return its ID.
    ///
    /// The store assigns the ID and both `created_at` and `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    fn create(&mut self, draft: &BugDraft, created_by: &str) -> Result<String>;

    /// Apply a partial update and refresh `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `BugNotFound` for an unknown ID, or a store error.
    fn update(&mut self, id: &str, patch: &BugPatch) -> Result<()>;

    /// Remove a record.
    ///
    /// # Errors
    ///
    /// Returns `BugNotFound` for an unknown ID, or a store error.
    fn delete(&mut self, id: &str) -> Result<()>;
}

impl<S: RecordStore + ?Sized> RecordStore for Box<S> {
    fn list_all(&self) -> Result<Vec<BugRecord>> {
        (**self).list_all()
    }

    fn create(&mut self, draft: &BugDraft, created_by: &str) -> Result<String> {
        (**self).create(draft, created_by)
    }

    fn update(&mut self, id: &str, patch: &BugPatch) -> Result<()> {
        (**self).update(id, patch)
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        (**self).delete(id)
    }
}
