#![allow(dead_code)]

use bugboard::model::{BugDraft, BugRecord, Priority, Status};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

/// Fixed creation time so fixtures sort deterministically.
pub fn base_time() -> DateTime<Utc> {
    Utc.timestamp_opt(1_735_689_600, 0).unwrap() // 2025-01-01 00:00:00 UTC
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn bug(id: &str, title: &str) -> BugRecord {
    BugRecord::from_draft(id, &BugDraft::new(title, "Project A"), "Alice", base_time())
}

pub struct RecordBuilder {
    record: BugRecord,
}

impl RecordBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            record: bug(id, &format!("Bug {id}")),
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.record.title = title.to_string();
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        if matches!(status, Status::PendingApproval | Status::Closed) {
            self.record.closed_by = Some(self.record.created_by.clone());
            self.record.closed_at = self.record.created_at;
        }
        if status == Status::Closed {
            self.record.approved_by = Some("Diana".to_string());
            self.record.approved_at = self.record.created_at;
        }
        self.record.status = status;
        self
    }

    #[allow(clippy::missing_const_for_fn)]
    pub fn priority(mut self, priority: Priority) -> Self {
        self.record.priority = priority;
        self
    }

    pub fn project(mut self, project: &str) -> Self {
        self.record.project = project.to_string();
        self
    }

    pub fn created_by(mut self, name: &str) -> Self {
        self.record.created_by = name.to_string();
        self
    }

    pub fn assignee(mut self, name: &str) -> Self {
        self.record.assignee = Some(name.to_string());
        self
    }

    /// Shift `created_at` (and `updated_at`) by whole days from the base time.
    pub fn created_days_after_base(mut self, days: i64) -> Self {
        let at = base_time() + Duration::days(days);
        self.record.created_at = Some(at);
        self.record.updated_at = Some(at);
        self
    }

    pub fn created_at(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.record.created_at = at;
        self
    }

    pub fn due(mut self, due: NaiveDate) -> Self {
        self.record.due_date = Some(due);
        self
    }

    pub fn labels(mut self, labels: &[&str]) -> Self {
        self.record.labels = labels.iter().map(|l| (*l).to_string()).collect();
        self
    }

    pub fn build(self) -> BugRecord {
        self.record
    }
}
