//! A dashboard session over a record store.
//!
//! The session keeps a local copy of the store's records. Every mutation
//! runs `plan → persist → sync`: the engine plans against the cached record,
//! the store call happens only if planning succeeded, and the cache is only
//! touched after the store call succeeded.

use crate::config::Vocabulary;
use crate::engine;
use crate::error::{BugError, Result};
use crate::model::{Actor, BugDraft, BugEdit, BugPatch, BugRecord};
use crate::storage::RecordStore;
use crate::view::{self, DashboardView, SortConfig, ViewFilter};
use chrono::Utc;
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// How the cache follows a successful mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncMode {
    /// Apply the planned patch to the cached record.
    Optimistic,
    /// Re-fetch the full record set from the store.
    #[default]
    Refetch,
}

impl SyncMode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Optimistic => "optimistic",
            Self::Refetch => "refetch",
        }
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncMode {
    type Err = BugError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "optimistic" => Ok(Self::Optimistic),
            "refetch" | "re-fetch" => Ok(Self::Refetch),
            other => Err(BugError::Config(format!(
                "unknown sync.mode '{other}' (expected optimistic or refetch)"
            ))),
        }
    }
}

/// Store, cache and vocabulary for one user session.
#[derive(Debug)]
pub struct Dashboard<S> {
    store: S,
    records: Vec<BugRecord>,
    vocabulary: Vocabulary,
    sync_mode: SyncMode,
}

impl<S: RecordStore> Dashboard<S> {
    /// Create a session with an empty cache. Call [`Dashboard::refresh`] to
    /// load records.
    #[must_use]
    pub const fn new(store: S, vocabulary: Vocabulary, sync_mode: SyncMode) -> Self {
        Self {
            store,
            records: Vec::new(),
            vocabulary,
            sync_mode,
        }
    }

    /// Create a session and load the record set.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn open(store: S, vocabulary: Vocabulary, sync_mode: SyncMode) -> Result<Self> {
        let mut dashboard = Self::new(store, vocabulary, sync_mode);
        dashboard.refresh()?;
        Ok(dashboard)
    }

    /// Replace the cache with the store's current records.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read; the cache is unchanged.
    pub fn refresh(&mut self) -> Result<()> {
        self.records = self.store.list_all()?;
        Ok(())
    }

    #[must_use]
    pub fn records(&self) -> &[BugRecord] {
        &self.records
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&BugRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    #[must_use]
    pub const fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    #[must_use]
    pub const fn sync_mode(&self) -> SyncMode {
        self.sync_mode
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Direct store access. Writes made here bypass the cache until the next
    /// `refresh`.
    pub const fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// File a new bug and return its ID.
    ///
    /// # Errors
    ///
    /// Returns permission or validation errors before touching the store, or
    /// the store's error.
    pub fn create(&mut self, actor: &Actor, draft: &BugDraft) -> Result<String> {
        let planned = engine::plan_create(actor, draft, &self.vocabulary)?;
        let id = self.store.create(&planned, &actor.name)?;
        info!(%id, actor = %actor, "created bug");

        match self.sync_mode {
            SyncMode::Optimistic => {
                self.records.push(BugRecord::from_draft(
                    id.clone(),
                    &planned,
                    &actor.name,
                    Utc::now(),
                ));
            }
            SyncMode::Refetch => self.refresh()?,
        }
        Ok(id)
    }

    /// Apply a creator's direct edit.
    ///
    /// # Errors
    ///
    /// Returns `BugNotFound`, permission, validation or transition errors
    /// before touching the store, or the store's error.
    pub fn update(&mut self, actor: &Actor, id: &str, edit: &BugEdit) -> Result<()> {
        let record = self.cached(id)?;
        let patch = engine::plan_update(record, actor, edit, &self.vocabulary, Utc::now())?;
        self.persist(id, &patch, "updated")
    }

    /// Move a bug to pending approval.
    ///
    /// # Errors
    ///
    /// Returns `BugNotFound`, permission or transition errors before touching
    /// the store, or the store's error.
    pub fn close(&mut self, actor: &Actor, id: &str) -> Result<()> {
        let patch = engine::plan_close(self.cached(id)?, actor, Utc::now())?;
        self.persist(id, &patch, "closed")
    }

    /// Approve a pending closure.
    ///
    /// # Errors
    ///
    /// Returns `BugNotFound`, permission or transition errors before touching
    /// the store, or the store's error.
    pub fn approve(&mut self, actor: &Actor, id: &str) -> Result<()> {
        let patch = engine::plan_approve(self.cached(id)?, actor, Utc::now())?;
        self.persist(id, &patch, "approved")
    }

    /// Send a pending closure back to open.
    ///
    /// # Errors
    ///
    /// Returns `BugNotFound`, permission or transition errors before touching
    /// the store, or the store's error.
    pub fn reopen(&mut self, actor: &Actor, id: &str) -> Result<()> {
        let patch = engine::plan_reopen(self.cached(id)?, actor, Utc::now())?;
        self.persist(id, &patch, "reopened")
    }

    /// Delete a bug.
    ///
    /// # Errors
    ///
    /// Returns `BugNotFound` or `PermissionDenied` before touching the store,
    /// or the store's error.
    pub fn delete(&mut self, actor: &Actor, id: &str) -> Result<()> {
        engine::check_delete(self.cached(id)?, actor)?;
        self.store.delete(id)?;
        info!(%id, actor = %actor, "deleted bug");

        match self.sync_mode {
            SyncMode::Optimistic => self.records.retain(|r| r.id != id),
            SyncMode::Refetch => self.refresh()?,
        }
        Ok(())
    }

    /// Derived view over the cache, with today's UTC date for undated records.
    #[must_use]
    pub fn view(&self, actor: &Actor, filter: &ViewFilter, sort: &SortConfig) -> DashboardView {
        view::recompute(
            &self.records,
            actor,
            filter,
            sort,
            Utc::now().date_naive(),
        )
    }

    fn cached(&self, id: &str) -> Result<&BugRecord> {
        self.get(id)
            .ok_or_else(|| BugError::BugNotFound { id: id.to_string() })
    }

    fn persist(&mut self, id: &str, patch: &BugPatch, verb: &str) -> Result<()> {
        self.store.update(id, patch)?;
        info!(%id, status = ?patch.status, "{verb} bug");

        match self.sync_mode {
            SyncMode::Optimistic => {
                if let Some(record) = self.records.iter_mut().find(|r| r.id == id) {
                    patch.apply_to(record);
                }
            }
            SyncMode::Refetch => self.refresh()?,
        }
        Ok(())
    }
}
