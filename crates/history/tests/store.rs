use std::fs;

use chrono::{TimeZone, Utc};
use history::{HistoryConfig, HistoryDocument, PersistenceError, RunHistoryStore, SaveStatus};
use model::RunSummary;
use pretty_assertions::assert_eq;
use utility::id::Id;
use uuid::Uuid;

fn run(title: &str) -> RunSummary {
    RunSummary {
        id: Id::new(Uuid::new_v4()),
        imported_at: Utc.with_ymd_and_hms(2025, 10, 30, 11, 6, 0).unwrap(),
        title: Some(title.to_owned()),
        location: None,
        distance_meters: 5000.0,
        duration_seconds: 1500.0,
        avg_pace_sec_per_mile: 482.8,
        preview_points: Vec::new(),
    }
}

fn titles(runs: &[RunSummary]) -> Vec<&str> {
    runs.iter().filter_map(|run| run.title.as_deref()).collect()
}

#[test]
fn adds_are_written_through() {
    let dir = tempfile::tempdir().unwrap();
    let config = HistoryConfig::new(dir.path().join("runs.json"));

    let mut store = RunHistoryStore::open(&config);
    for title in ["A", "B", "C", "D", "E", "F", "G", "H"] {
        assert!(store.add(run(title)).save.is_saved());
    }
    assert_eq!(titles(&store.snapshot()), ["H", "G", "F", "E", "D", "C", "B"]);

    let reopened = RunHistoryStore::open(&config);
    assert_eq!(reopened.snapshot(), store.snapshot());
    assert!(!reopened.is_dirty());
}

#[test]
fn eviction_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = RunHistoryStore::open(&HistoryConfig::new(dir.path().join("runs.json")));

    let first = run("first");
    store.add(first.clone());
    for index in 0..6 {
        assert!(store.add(run(&index.to_string())).evicted.is_empty());
    }
    let outcome = store.add(run("last"));
    assert_eq!(outcome.evicted, vec![first]);
}

#[test]
fn remove_persists_the_shorter_list() {
    let dir = tempfile::tempdir().unwrap();
    let config = HistoryConfig::new(dir.path().join("runs.json"));
    let mut store = RunHistoryStore::open(&config);
    let keep = run("keep");
    let gone = run("gone");
    store.add(keep.clone());
    store.add(gone.clone());

    let outcome = store.remove(&gone.id);
    assert_eq!(outcome.removed, Some(gone.clone()));
    assert!(outcome.save.is_saved());

    let outcome = store.remove(&gone.id);
    assert_eq!(outcome.removed, None);

    assert_eq!(RunHistoryStore::open(&config).snapshot(), vec![keep]);
}

#[test]
fn corrupt_document_starts_empty_and_is_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("runs.json");
    fs::write(&path, "[{\"id\": 12}").unwrap();

    let mut store = RunHistoryStore::load(HistoryDocument::new(&path));
    assert!(store.snapshot().is_empty());

    store.add(run("fresh"));
    let runs = HistoryDocument::new(&path).load().unwrap().unwrap();
    assert_eq!(titles(&runs), ["fresh"]);
}

#[test]
fn failed_save_keeps_the_run_and_is_retried() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocked");
    fs::write(&blocker, "not a directory").unwrap();
    let config = HistoryConfig::new(blocker.join("runs.json"));

    let mut store = RunHistoryStore::open(&config);
    let outcome = store.add(run("unsaved"));
    assert!(
        matches!(outcome.save, SaveStatus::Failed(PersistenceError::Io(_))),
        "{:?}",
        outcome.save
    );
    assert!(store.is_dirty());
    assert_eq!(titles(&store.snapshot()), ["unsaved"]);

    fs::remove_file(&blocker).unwrap();
    assert!(store.flush().is_saved());
    assert!(!store.is_dirty());
    assert_eq!(titles(&RunHistoryStore::open(&config).snapshot()), ["unsaved"]);
}

#[test]
fn flush_without_changes_does_not_touch_the_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("runs.json");
    let mut store = RunHistoryStore::open(&HistoryConfig::new(&path));

    assert!(store.flush().is_saved());
    assert!(!path.exists());
}

#[test]
fn removing_an_unknown_id_retries_a_failed_save() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocked");
    fs::write(&blocker, "not a directory").unwrap();
    let config = HistoryConfig::new(blocker.join("runs.json"));

    let mut store = RunHistoryStore::open(&config);
    assert!(!store.add(run("pending")).save.is_saved());
    assert!(store.is_dirty());

    fs::remove_file(&blocker).unwrap();
    let outcome = store.remove(&Id::new(Uuid::new_v4()));
    assert_eq!(outcome.removed, None);
    assert!(outcome.save.is_saved());
    assert!(!store.is_dirty());

    let runs = HistoryDocument::new(&config.path).load().unwrap().unwrap();
    assert_eq!(titles(&runs), ["pending"]);
}
