#![allow(dead_code)]

use bugboard::error::{BugError, Result};
use bugboard::model::{BugDraft, BugPatch, BugRecord};
use bugboard::storage::RecordStore;
use std::cell::Cell;

/// Which store call should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    ListAll,
    Create,
    Update,
    Delete,
}

/// Store wrapper that counts calls and can inject `StoreUnavailable`.
pub struct RecordingStore<S> {
    inner: S,
    list_calls: Cell<usize>,
    create_calls: usize,
    update_calls: usize,
    delete_calls: usize,
    fail_on: Option<FailOn>,
}

impl<S> RecordingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            list_calls: Cell::new(0),
            create_calls: 0,
            update_calls: 0,
            delete_calls: 0,
            fail_on: None,
        }
    }

    pub fn fail_on(&mut self, call: FailOn) {
        self.fail_on = Some(call);
    }

    pub fn heal(&mut self) {
        self.fail_on = None;
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.get()
    }

    /// Number of mutating calls (create, update, delete).
    pub fn write_calls(&self) -> usize {
        self.create_calls + self.update_calls + self.delete_calls
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn check(&self, call: FailOn) -> Result<()> {
        if self.fail_on == Some(call) {
            Err(BugError::StoreUnavailable {
                reason: format!("injected {call:?} failure"),
            })
        } else {
            Ok(())
        }
    }
}

impl<S: RecordStore> RecordStore for RecordingStore<S> {
    fn list_all(&self) -> Result<Vec<BugRecord>> {
        self.list_calls.set(self.list_calls.get() + 1);
        self.check(FailOn::ListAll)?;
        self.inner.list_all()
    }

    fn create(&mut self, draft: &BugDraft, created_by: &str) -> Result<String> {
        self.create_calls += 1;
        self.check(FailOn::Create)?;
        self.inner.create(draft, created_by)
    }

    fn update(&mut self, id: &str, patch: &BugPatch) -> Result<()> {
        self.update_calls += 1;
        self.check(FailOn::Update)?;
        self.inner.update(id, patch)
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        self.delete_calls += 1;
        self.check(FailOn::Delete)?;
        self.inner.delete(id)
    }
}
