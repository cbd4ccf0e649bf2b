//! Daily trend series and per-status counts.

use crate::model::{BugRecord, Status};
use crate::util::utc_date;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Number of records in each status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct StatusCounts {
    pub open: usize,
    pub in_progress: usize,
    pub pending_approval: usize,
    pub closed: usize,
}

impl StatusCounts {
    #[must_use]
    pub fn from_records(records: &[BugRecord]) -> Self {
        let mut counts = Self::default();
        for record in records {
            counts.increment(record.status);
        }
        counts
    }

    pub const fn increment(&mut self, status: Status) {
        match status {
            Status::Open => self.open += 1,
            Status::InProgress => self.in_progress += 1,
            Status::PendingApproval => self.pending_approval += 1,
            Status::Closed => self.closed += 1,
        }
    }

    #[must_use]
    pub const fn get(&self, status: Status) -> usize {
        match status {
            Status::Open => self.open,
            Status::InProgress => self.in_progress,
            Status::PendingApproval => self.pending_approval,
            Status::Closed => self.closed,
        }
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.open + self.in_progress + self.pending_approval + self.closed
    }
}

/// Records created on one calendar day, counted by their current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TrendBucket {
    pub date: NaiveDate,
    pub open: usize,
    pub in_progress: usize,
    pub pending_approval: usize,
    pub closed: usize,
}

impl TrendBucket {
    #[must_use]
    pub const fn new(date: NaiveDate, counts: StatusCounts) -> Self {
        Self {
            date,
            open: counts.open,
            in_progress: counts.in_progress,
            pending_approval: counts.pending_approval,
            closed: counts.closed,
        }
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.open + self.in_progress + self.pending_approval + self.closed
    }
}

/// Bucket every record by the UTC date of `created_at`, ascending.
///
/// Records with no `created_at` land in the `today` bucket. Each record adds
/// exactly one to its bucket, under its current status.
#[must_use]
pub fn aggregate_trend(records: &[BugRecord], today: NaiveDate) -> Vec<TrendBucket> {
    let mut days: BTreeMap<NaiveDate, StatusCounts> = BTreeMap::new();
    for record in records {
        let date = record.created_at.map_or(today, utc_date);
        days.entry(date).or_default().increment(record.status);
    }

    days.into_iter()
        .map(|(date, counts)| TrendBucket::new(date, counts))
        .collect()
}
