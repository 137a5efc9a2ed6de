//! MemoryStore tests: overwrite semantics, not-found paths, listing and
//! concurrent writers.

use std::sync::Arc;

use serde_json::json;
use tracker_api::{Payload, Record, RecordStore, StoreError, Upsert};

use crate::MemoryStore;

fn payload(value: serde_json::Value) -> Payload {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

#[tokio::test]
async fn test_put_reports_created_then_updated() {
    let store = MemoryStore::new();

    let first = store
        .put("alice", Record::new(payload(json!({"level": 1}))))
        .await
        .unwrap();
    let second = store
        .put("alice", Record::new(payload(json!({"level": 2}))))
        .await
        .unwrap();

    assert_eq!(first, Upsert::Created);
    assert_eq!(second, Upsert::Updated);
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_put_replaces_without_merge() {
    let store = MemoryStore::new();

    store
        .put("alice", Record::new(payload(json!({"level": 50, "fruit": "flame"}))))
        .await
        .unwrap();
    store
        .put("alice", Record::new(payload(json!({"beli": 1000}))))
        .await
        .unwrap();

    let record = store.get("alice").await.unwrap();
    assert_eq!(record.data, payload(json!({"beli": 1000})));
}

#[tokio::test]
async fn test_put_refreshes_timestamp() {
    let store = MemoryStore::new();
    let mut old = Record::new(Payload::new());
    old.updated_at -= chrono::Duration::days(3);
    store.put("alice", old.clone()).await.unwrap();

    store.put("alice", Record::new(Payload::new())).await.unwrap();

    let record = store.get("alice").await.unwrap();
    assert!(record.updated_at > old.updated_at);
}

#[tokio::test]
async fn test_get_missing_is_not_found() {
    let store = MemoryStore::new();

    let err = store.get("ghost").await.unwrap_err();
    assert_eq!(err, StoreError::NotFound("ghost".into()));
}

#[tokio::test]
async fn test_delete_removes_record() {
    let store = MemoryStore::new();
    store
        .put("alice", Record::new(payload(json!({"level": 50}))))
        .await
        .unwrap();

    let removed = store.delete("alice").await.unwrap();
    assert_eq!(removed.data, payload(json!({"level": 50})));

    assert!(matches!(store.get("alice").await, Err(StoreError::NotFound(_))));
    assert!(matches!(store.delete("alice").await, Err(StoreError::NotFound(_))));
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_list_has_one_entry_per_identifier() {
    let store = MemoryStore::new();
    for id in ["alice", "bob", "carol"] {
        store.put(id, Record::new(Payload::new())).await.unwrap();
    }
    store.put("bob", Record::new(Payload::new())).await.unwrap();
    store.delete("carol").await.unwrap();

    let mut ids: Vec<String> = store
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|(id, _)| id)
        .collect();
    ids.sort();

    assert_eq!(ids, vec!["alice".to_string(), "bob".to_string()]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_writes_create_exactly_once() {
    let store = Arc::new(MemoryStore::new());

    let mut handles = Vec::new();
    for i in 0..32 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .put("shared", Record::new(payload(json!({"writer": i}))))
                .await
                .unwrap()
        }));
    }

    let mut created = 0;
    for h in handles {
        if h.await.unwrap() == Upsert::Created {
            created += 1;
        }
    }

    assert_eq!(created, 1);
    assert_eq!(store.count().await.unwrap(), 1);
}
