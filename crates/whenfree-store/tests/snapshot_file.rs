//! Open / close lifecycle of a store backed by a snapshot file on disk.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use whenfree_store::{SnapshotFile, Storage, StoreError};
use whenfree_types::{CalendarDate, InvitedPerson, Meetup, UserToken};

fn lunch() -> (Meetup, InvitedPerson) {
    let mut meetup = Meetup::new("Lunch", "2024-01-01".parse::<CalendarDate>().unwrap());
    meetup.to = CalendarDate::from_ymd(2024, 1, 14);
    let mut alice = InvitedPerson::new("Alice", UserToken::default());
    alice.preferred_date = CalendarDate::from_ymd(2024, 1, 5);
    (meetup, alice)
}

#[tokio::test]
async fn missing_snapshot_opens_an_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let file = SnapshotFile::new(dir.path().join("storage.json"));

    let storage = Storage::open(file.clone()).unwrap();
    assert!(storage.is_empty().await);
    assert_eq!(storage.snapshot_file(), Some(&file));
    assert!(!file.path().exists());
}

#[tokio::test]
async fn close_then_open_restores_meetups_and_access() {
    let dir = tempfile::tempdir().unwrap();
    let file = SnapshotFile::new(dir.path().join("storage.json"));

    let storage = Storage::open(file.clone()).unwrap();
    let (meetup, alice) = lunch();
    let (id, stored) = storage.create_meetup(meetup, alice, UserToken::from("t1")).await;
    storage.close().await.unwrap();

    let reopened = Storage::open(file).unwrap();
    let fetched = reopened.get_meetup(&id, &UserToken::from("t1")).await.unwrap();
    assert_eq!(fetched, stored);
    assert!(reopened.get_meetup(&id, &UserToken::from("t2")).await.is_err());
}

#[tokio::test]
async fn written_file_uses_the_snapshot_shape() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    let storage = Storage::open(SnapshotFile::new(&path)).unwrap();
    let (meetup, alice) = lunch();
    let (id, _) = storage.create_meetup(meetup, alice, UserToken::from("t1")).await;
    storage.close().await.unwrap();

    let json: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    let stored = &json["meetups"][id.as_str()];
    assert_eq!(stored["description"], "Lunch");
    assert_eq!(stored["from"], "2024-01-01");
    assert_eq!(stored["to"], "2024-01-14");
    assert_eq!(stored["locked"], false);
    assert!(stored.get("final_date").is_none());
    assert!(stored.get("suggested_dates").is_none());

    let alice = &stored["invited_person"][0];
    assert_eq!(alice["name"], "Alice");
    assert_eq!(alice["preferred_date"], "2024-01-05");
    assert!(alice.get("available_dates").is_none());
    assert_eq!(alice.as_object().unwrap().len(), 2);
}

#[tokio::test]
async fn save_creates_missing_directories_and_leaves_no_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("data").join("storage.json");
    let storage = Storage::open(SnapshotFile::new(&path)).unwrap();
    storage.close().await.unwrap();

    assert!(path.exists());
    assert!(!path.with_extension("tmp").exists());
}

#[tokio::test]
async fn close_overwrites_the_previous_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let file = SnapshotFile::new(dir.path().join("storage.json"));

    let storage = Storage::open(file.clone()).unwrap();
    for _ in 0..3 {
        let (meetup, alice) = lunch();
        storage.create_meetup(meetup, alice, UserToken::from("t1")).await;
    }
    storage.close().await.unwrap();

    let emptied = Storage::open(file.clone()).unwrap();
    emptied.with_exclusive(std::collections::BTreeMap::clear).await;
    emptied.close().await.unwrap();

    assert!(Storage::open(file).unwrap().is_empty().await);
}

#[test]
fn corrupt_snapshot_refuses_to_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(&path, b"{\"meetups\": {\"x\": {\"from\": \"yesterday\"}}}").unwrap();

    let result = Storage::open(SnapshotFile::new(&path));
    assert!(matches!(result, Err(StoreError::Serialization(_))));
}

#[test]
fn unreadable_snapshot_path_refuses_to_open() {
    let dir = tempfile::tempdir().unwrap();
    // A directory where the file should be cannot be read as a snapshot.
    let result = Storage::open(SnapshotFile::new(dir.path()));
    assert!(result.is_err());
}
