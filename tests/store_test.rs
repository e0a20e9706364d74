use std::path::PathBuf;

use skybot::Error;
use skybot::memory::facts::{FactKind, FactTable};
use skybot::store::{FileStore, TranscriptStore, diary_entry};

fn tmp_dir() -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock before epoch")
        .as_nanos();
    let path = std::env::temp_dir().join(format!("skybot-store-test-{nanos}"));
    std::fs::create_dir_all(&path).expect("create temp dir");
    path
}

fn store_in(dir: &std::path::Path) -> FileStore {
    FileStore::new(
        dir.join("data.txt"),
        dir.join("diary.txt"),
        Some(dir.join("facts.json")),
    )
}

#[test]
fn missing_files_mean_empty_history() {
    let dir = tmp_dir();
    let store = store_in(&dir);
    assert!(store.load_history().unwrap().is_empty());
    assert!(store.load_facts().unwrap().is_none());
    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn turns_are_appended_in_order() {
    let dir = tmp_dir();
    let mut store = store_in(&dir);
    store.record_turn("hi", "hello").unwrap();
    store.record_turn("bye", "see you").unwrap();

    assert_eq!(
        store.load_history().unwrap(),
        vec!["User: hi", "Bot: hello", "User: bye", "Bot: see you"]
    );
    let diary = std::fs::read_to_string(store.diary_path()).unwrap();
    let lines: Vec<&str> = diary.lines().collect();
    assert_eq!(lines, vec![diary_entry("hi", "hello"), diary_entry("bye", "see you")]);
    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn data_dir_is_created_on_first_write() {
    let root = tmp_dir();
    let dir = root.join("nested").join("deeper");
    let mut store = store_in(&dir);
    store.record_turn("a", "b").unwrap();
    assert!(dir.join("data.txt").exists());
    std::fs::remove_dir_all(root).ok();
}

#[test]
fn fact_snapshot_round_trips() {
    let dir = tmp_dir();
    let mut store = store_in(&dir);
    let mut facts = FactTable::new();
    facts.learn(FactKind::Name, "Sam");
    facts.learn(FactKind::Identity, "a robot");

    store.save_facts(&facts).unwrap();
    assert_eq!(store.load_facts().unwrap(), Some(facts));
    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn corrupt_fact_snapshot_is_reported() {
    let dir = tmp_dir();
    let store = store_in(&dir);
    std::fs::write(dir.join("facts.json"), "not json").unwrap();

    let err = store.load_facts().unwrap_err();
    assert!(matches!(err, Error::Facts(_)));
    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn unwritable_path_is_a_persistence_error() {
    let dir = tmp_dir();
    // A directory where the conversation file should be.
    std::fs::create_dir_all(dir.join("data.txt")).unwrap();
    let mut store = store_in(&dir);

    let err = store.record_turn("hi", "hello").unwrap_err();
    assert!(matches!(err, Error::Persistence { .. }));
    assert!(err.is_recoverable());
    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn diary_is_written_even_if_conversation_log_fails() {
    let dir = tmp_dir();
    std::fs::create_dir_all(dir.join("data.txt")).unwrap();
    let mut store = store_in(&dir);

    assert!(store.record_turn("hi", "hello").is_err());
    let diary = std::fs::read_to_string(dir.join("diary.txt")).unwrap();
    assert_eq!(diary.trim_end(), diary_entry("hi", "hello"));
    std::fs::remove_dir_all(dir).ok();
}
