//! Property-based tests for sorting and filtering.

use bugboard::model::{Actor, BugDraft, BugRecord, Priority, Status};
use bugboard::view::{SortConfig, SortDirection, SortKey, ViewFilter, recompute, sort_records};
use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use std::cmp::Ordering;

fn record_strategy() -> impl Strategy<Value = (Priority, Status, u8)> {
    (
        prop::sample::select(Priority::ALL.to_vec()),
        prop::sample::select(Status::ALL.to_vec()),
        0u8..3,
    )
}

fn build(specs: &[(Priority, Status, u8)]) -> Vec<BugRecord> {
    let now = Utc::now();
    specs
        .iter()
        .enumerate()
        .map(|(i, (priority, status, project))| {
            let project = ["Project A", "Project B", "Project C"][usize::from(*project)];
            let mut record =
                BugRecord::from_draft(format!("bug-{i:03}"), &BugDraft::new("t", project), "Alice", now);
            record.priority = *priority;
            record.status = *status;
            record
        })
        .collect()
}

fn index(record: &BugRecord) -> usize {
    record.id["bug-".len()..].parse().unwrap()
}

proptest! {
    #[test]
    fn sort_is_ordered_and_stable(
        specs in prop::collection::vec(record_strategy(), 0..40),
        key in prop::sample::select(SortKey::ALL.to_vec()),
        desc in any::<bool>(),
    ) {
        let records = build(&specs);
        let direction = if desc { SortDirection::Desc } else { SortDirection::Asc };
        let config = SortConfig::new(key, direction);

        let mut sorted: Vec<&BugRecord> = records.iter().collect();
        sort_records(&mut sorted, &config);

        prop_assert_eq!(sorted.len(), records.len());
        for pair in sorted.windows(2) {
            match config.compare(pair[0], pair[1]) {
                Ordering::Less => {}
                Ordering::Equal => prop_assert!(index(pair[0]) < index(pair[1])),
                Ordering::Greater => prop_assert!(false, "out of order"),
            }
        }
    }

    #[test]
    fn filter_returns_exactly_matching_records(
        specs in prop::collection::vec(record_strategy(), 0..40),
        status in prop::option::of(prop::sample::select(Status::ALL.to_vec())),
        priority in prop::option::of(prop::sample::select(Priority::ALL.to_vec())),
    ) {
        let records = build(&specs);
        let filter = ViewFilter { status, priority, project: Some("Project A".to_string()) };
        let view = recompute(
            &records,
            &Actor::manager("Diana"),
            &filter,
            &SortConfig::asc(SortKey::Title),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        );

        let expected: Vec<&str> = records
            .iter()
            .filter(|r| r.project == "Project A")
            .filter(|r| status.is_none_or(|s| r.status == s))
            .filter(|r| priority.is_none_or(|p| r.priority == p))
            .map(|r| r.id.as_str())
            .collect();
        let shown: Vec<&str> = view.bugs.iter().map(|r| r.id.as_str()).collect();
        prop_assert_eq!(shown, expected);
        prop_assert_eq!(view.counts.total(), records.len());
    }
}
