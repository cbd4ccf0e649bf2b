#![allow(dead_code)]

use bugboard::storage::{MemoryStore, SqliteStore};
use std::sync::Once;
use std::time::Instant;
use tempfile::TempDir;
use tracing::info;

pub mod cli;
pub mod fixtures;
pub mod recording;

pub use recording::RecordingStore;

static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        bugboard::logging::init_test_logging();
    });
}

pub struct TestLogGuard {
    name: String,
    start: Instant,
}

impl TestLogGuard {
    fn new(name: &str) -> Self {
        init_test_logging();
        info!("{name}: starting");
        Self {
            name: name.to_string(),
            start: Instant::now(),
        }
    }
}

impl Drop for TestLogGuard {
    fn drop(&mut self) {
        info!(
            "{}: assertions passed (elapsed {:?})",
            self.name,
            self.start.elapsed()
        );
    }
}

pub fn test_log(name: &str) -> TestLogGuard {
    TestLogGuard::new(name)
}

pub fn test_store() -> SqliteStore {
    init_test_logging();
    SqliteStore::open_memory().expect("Failed to create test database")
}

pub fn test_store_with_dir() -> (SqliteStore, TempDir) {
    init_test_logging();
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join(".bugboard").join("bugboard.db");
    std::fs::create_dir_all(db_path.parent().unwrap()).unwrap();
    let store = SqliteStore::open(&db_path).expect("Failed to create test database");
    (store, dir)
}

/// A recording wrapper over an in-memory store seeded with `records`.
pub fn recording_store(records: Vec<bugboard::model::BugRecord>) -> RecordingStore<MemoryStore> {
    init_test_logging();
    RecordingStore::new(MemoryStore::with_records(records))
}
