//! Dashboard session behaviour against an instrumented store.

mod common;

use bugboard::BugError;
use bugboard::config::Vocabulary;
use bugboard::dashboard::{Dashboard, SyncMode};
use bugboard::model::{Actor, BugDraft, BugEdit, Status};
use bugboard::storage::{MemoryStore, RecordStore};
use bugboard::view::{SortConfig, SortKey, ViewFilter};
use common::fixtures::RecordBuilder;
use common::recording::FailOn;
use common::{RecordingStore, recording_store, test_log};

fn seeded(mode: SyncMode) -> Dashboard<RecordingStore<MemoryStore>> {
    let records = vec![
        RecordBuilder::new("bug-a").created_by("Alice").build(),
        RecordBuilder::new("bug-b")
            .created_by("Bob")
            .assignee("Alice")
            .build(),
        RecordBuilder::new("bug-c")
            .created_by("Charlie")
            .status(Status::PendingApproval)
            .build(),
    ];
    Dashboard::open(recording_store(records), Vocabulary::default(), mode).unwrap()
}

#[test]
fn open_loads_the_cache_once() {
    let _log = test_log("open_loads_the_cache_once");
    let dash = seeded(SyncMode::Refetch);
    assert_eq!(dash.records().len(), 3);
    assert_eq!(dash.store().list_calls(), 1);
}

#[test]
fn rejected_operations_make_no_store_calls() {
    let _log = test_log("rejected_operations_make_no_store_calls");
    let mut dash = seeded(SyncMode::Refetch);
    let alice = Actor::developer("Alice");
    let diana = Actor::manager("Diana");

    // Not the creator.
    assert!(matches!(
        dash.delete(&alice, "bug-b"),
        Err(BugError::PermissionDenied { .. })
    ));
    // Wrong role.
    assert!(matches!(
        dash.approve(&alice, "bug-c"),
        Err(BugError::PermissionDenied { .. })
    ));
    // Wrong state.
    assert!(matches!(
        dash.approve(&diana, "bug-a"),
        Err(BugError::InvalidTransition { .. })
    ));
    // Bad field.
    let edit = BugEdit {
        project: Some("Project Z".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        dash.update(&alice, "bug-a", &edit),
        Err(BugError::Validation { .. })
    ));
    // Managers do not file bugs.
    assert!(matches!(
        dash.create(&diana, &BugDraft::new("Nope", "Project A")),
        Err(BugError::PermissionDenied { .. })
    ));

    assert_eq!(dash.store().write_calls(), 0);
    assert_eq!(dash.store().list_calls(), 1);
}

#[test]
fn refetch_mode_reloads_after_each_write() {
    let _log = test_log("refetch_mode_reloads_after_each_write");
    let mut dash = seeded(SyncMode::Refetch);
    let alice = Actor::developer("Alice");

    dash.close(&alice, "bug-a").unwrap();
    dash.close(&alice, "bug-b").unwrap();
    assert_eq!(dash.store().list_calls(), 3);
    assert_eq!(dash.store().update_calls(), 2);
}

#[test]
fn optimistic_mode_patches_locally() {
    let _log = test_log("optimistic_mode_patches_locally");
    let mut dash = seeded(SyncMode::Optimistic);
    let alice = Actor::developer("Alice");

    dash.close(&alice, "bug-a").unwrap();
    assert_eq!(dash.store().list_calls(), 1);
    assert_eq!(dash.get("bug-a").unwrap().status, Status::PendingApproval);

    let stored = dash.store().inner().get("bug-a").unwrap();
    assert_eq!(stored.status, Status::PendingApproval);
    assert_eq!(stored.closed_by, dash.get("bug-a").unwrap().closed_by);
}

#[test]
fn store_failure_propagates_and_keeps_cache() {
    let _log = test_log("store_failure_propagates_and_keeps_cache");
    for mode in [SyncMode::Optimistic, SyncMode::Refetch] {
        let mut dash = seeded(mode);
        let before = dash.records().to_vec();

        dash.store_mut().fail_on(FailOn::Update);
        let err = dash.close(&Actor::developer("Alice"), "bug-a").unwrap_err();
        assert!(matches!(err, BugError::StoreUnavailable { .. }));
        assert_eq!(dash.records(), before.as_slice());

        dash.store_mut().fail_on(FailOn::Delete);
        assert!(dash.delete(&Actor::developer("Alice"), "bug-a").is_err());
        assert_eq!(dash.records(), before.as_slice());

        dash.store_mut().fail_on(FailOn::Create);
        let err = dash
            .create(
                &Actor::developer("Alice"),
                &BugDraft::new("Login button dead", "Project A"),
            )
            .unwrap_err();
        assert!(matches!(err, BugError::StoreUnavailable { .. }), "{mode:?}");
        assert_eq!(dash.records(), before.as_slice());
        assert_eq!(dash.store().inner().len(), 3);
        assert_eq!(dash.store().write_calls(), 3);
    }
}

#[test]
fn failed_refresh_is_reported() {
    let _log = test_log("failed_refresh_is_reported");
    let mut dash = seeded(SyncMode::Refetch);
    dash.store_mut().fail_on(FailOn::ListAll);
    assert!(matches!(
        dash.refresh(),
        Err(BugError::StoreUnavailable { .. })
    ));
    assert_eq!(dash.records().len(), 3);

    dash.store_mut().heal();
    dash.refresh().unwrap();
}

#[test]
fn view_is_role_scoped() {
    let _log = test_log("view_is_role_scoped");
    let dash = seeded(SyncMode::Refetch);
    let sort = SortConfig::asc(SortKey::CreatedBy);

    let alice_view = dash.view(&Actor::developer("Alice"), &ViewFilter::default(), &sort);
    let ids: Vec<&str> = alice_view.bugs.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["bug-a", "bug-b"]);
    assert_eq!(alice_view.counts.total(), 3);

    let manager_view = dash.view(&Actor::manager("Diana"), &ViewFilter::default(), &sort);
    assert_eq!(manager_view.bugs.len(), 3);
    assert_eq!(manager_view.counts.pending_approval, 1);
}

#[test]
fn created_bug_is_visible_to_creator() {
    let _log = test_log("created_bug_is_visible_to_creator");
    let mut dash = seeded(SyncMode::Optimistic);
    let charlie = Actor::developer("Charlie");

    let mut draft = BugDraft::new("  Padded title  ", "Project C");
    draft.labels = vec!["ui".to_string()];
    let id = dash.create(&charlie, &draft).unwrap();

    let record = dash.get(&id).unwrap();
    assert_eq!(record.title, "Padded title");
    assert_eq!(record.created_by, "Charlie");
    assert!(id.starts_with("bug-"));
    assert_eq!(dash.store().inner().len(), 4);
}
