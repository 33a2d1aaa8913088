//! Tests for the bounded list, including its inclusive-range behavior
//! and the push-then-trim write path.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]

use std::collections::HashMap;

use storekeep::{BoundedList, Error, Store, StoreError};
use storekeep_test_utils::{MemoryStore, RankEntry};

const KEY: &str = "scores:recent";

#[tokio::test]
async fn test_pushed_batches_read_back_newest_first() {
    let list = BoundedList::new(MemoryStore::new());

    let first = RankEntry::new("ada", 10);
    let second = RankEntry::new("brin", 20);
    list.push_all(KEY, 9, &[first.clone(), second.clone()])
        .await
        .unwrap();

    // The batch went on head-first, so its last element leads
    let all: Vec<RankEntry> = list.read_all(KEY, 9).await.unwrap();
    assert_eq!(all, vec![second, first]);
}

#[tokio::test]
async fn test_bound_retains_at_most_one_past_the_bound() {
    let store = MemoryStore::new();
    let list = BoundedList::new(store.clone());

    let batch: Vec<RankEntry> = ["ada", "brin", "curie"]
        .iter()
        .map(|name| RankEntry::new(name, 1))
        .collect();
    list.push_all(KEY, 2, &batch).await.unwrap();
    list.push_all(KEY, 2, &[RankEntry::new("dijkstra", 1)])
        .await
        .unwrap();

    // A bound of 2 keeps positions [0, 2]: three elements
    let raw = store.lrange(KEY, 0, -1).await.unwrap();
    assert_eq!(raw.len(), 3);

    let all: Vec<RankEntry> = list.read_all(KEY, 2).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].player, "dijkstra");
    assert_eq!(all[1].player, "curie");
    assert_eq!(all[2].player, "brin");
}

#[tokio::test]
async fn test_read_all_spans_one_past_the_bound() {
    // Seed a list longer than the read bound to show the read side of
    // the inclusive-range convention on its own.
    let elements: Vec<String> = (0..10).map(|n| format!("\"e{n}\"")).collect();
    let store = MemoryStore::new().with_list(KEY, elements);
    let list = BoundedList::new(store);

    let all: Vec<String> = list.read_all(KEY, 4).await.unwrap();
    assert_eq!(all.len(), 5);
    assert_eq!(all[0], "e0");
    assert_eq!(all[4], "e4");
}

#[tokio::test]
async fn test_read_all_of_missing_key_is_empty() {
    let list = BoundedList::new(MemoryStore::new());
    let all: Vec<RankEntry> = list.read_all(KEY, 9).await.unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
async fn test_read_at_resolves_head_tail_and_out_of_range() {
    let store =
        MemoryStore::new().with_list(KEY, ["\"newest\"", "\"middle\"", "\"oldest\""]);
    let list = BoundedList::new(store);

    assert_eq!(
        list.read_at::<String>(KEY, 0).await.unwrap(),
        Some("newest".to_string())
    );
    assert_eq!(
        list.read_at::<String>(KEY, -1).await.unwrap(),
        Some("oldest".to_string())
    );
    assert_eq!(list.read_at::<String>(KEY, 99).await.unwrap(), None);
    assert_eq!(list.read_at::<String>("scores:absent", 0).await.unwrap(), None);
}

#[tokio::test]
async fn test_read_at_treats_empty_element_as_absent() {
    let store = MemoryStore::new().with_list(KEY, ["\"x\"", ""]);
    let list = BoundedList::new(store);

    assert_eq!(list.read_at::<String>(KEY, 1).await.unwrap(), None);
}

#[tokio::test]
async fn test_replace_at_overwrites_in_place() {
    let list = BoundedList::new(MemoryStore::new());

    let batch: Vec<RankEntry> = ["ada", "brin", "curie"]
        .iter()
        .map(|name| RankEntry::new(name, 1))
        .collect();
    list.push_all(KEY, 9, &batch).await.unwrap();

    let replacement = RankEntry::new("grace", 99);
    list.replace_at(KEY, 1, &replacement).await.unwrap();

    assert_eq!(
        list.read_at::<RankEntry>(KEY, 1).await.unwrap(),
        Some(replacement)
    );
    // Neighbors untouched
    assert_eq!(
        list.read_at::<RankEntry>(KEY, 0).await.unwrap().unwrap().player,
        "curie"
    );
}

#[tokio::test]
async fn test_replace_at_out_of_range_is_a_store_error() {
    let store = MemoryStore::new().with_list(KEY, ["\"a\""]);
    let list = BoundedList::new(store);

    let result = list.replace_at(KEY, 5, "b").await;
    assert!(matches!(
        result,
        Err(Error::Store(StoreError::IndexOutOfRange { .. }))
    ));
}

#[tokio::test]
async fn test_replace_at_missing_key_is_a_store_error() {
    let list = BoundedList::new(MemoryStore::new());

    let result = list.replace_at("scores:absent", 0, "b").await;
    assert!(matches!(result, Err(Error::Store(StoreError::Command(_)))));
}

#[tokio::test]
async fn test_remove_value_strips_stored_text() {
    let store =
        MemoryStore::new().with_list(KEY, ["\"a\"", "\"b\"", "\"a\"", "\"a\""]);
    let list = BoundedList::new(store.clone());

    // One from the head
    assert_eq!(list.remove_value(KEY, 1, "\"a\"").await.unwrap(), 1);
    assert_eq!(
        store.lrange(KEY, 0, -1).await.unwrap(),
        vec!["\"b\"".to_string(), "\"a\"".to_string(), "\"a\"".to_string()]
    );

    // Zero removes every remaining occurrence
    assert_eq!(list.remove_value(KEY, 0, "\"a\"").await.unwrap(), 2);
    assert_eq!(store.lrange(KEY, 0, -1).await.unwrap(), vec!["\"b\"".to_string()]);
}

#[tokio::test]
async fn test_empty_batch_skips_both_push_and_trim() {
    // An over-long seeded list stays over-long: an empty batch must not
    // sneak in a trim.
    let elements: Vec<String> = (0..5).map(|n| format!("\"e{n}\"")).collect();
    let store = MemoryStore::new().with_list(KEY, elements);
    let list = BoundedList::new(store.clone());

    let empty: &[RankEntry] = &[];
    list.push_all(KEY, 1, empty).await.unwrap();

    assert_eq!(store.lrange(KEY, 0, -1).await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_encode_failure_aborts_before_any_write() {
    let store = MemoryStore::new();
    let list = BoundedList::new(store.clone());

    // Tuple map keys have no JSON representation, so encoding fails
    let poisoned: Vec<HashMap<(u32, u32), u32>> = vec![HashMap::from([((1, 2), 3)])];
    let result = list.push_all(KEY, 9, &poisoned).await;

    assert!(matches!(result, Err(Error::Codec(_))));
    assert!(!store.exists(KEY).await.unwrap());
}

#[tokio::test]
async fn test_undecodable_element_aborts_read_all() {
    let store = MemoryStore::new().with_list(KEY, ["{\"player\":\"ada\",\"points\":1}", "not json"]);
    let list = BoundedList::new(store);

    let result = list.read_all::<RankEntry>(KEY, 9).await;
    assert!(matches!(result, Err(Error::Codec(_))));
}

#[tokio::test]
async fn test_operations_reject_an_empty_key() {
    let list = BoundedList::new(MemoryStore::new());

    let read_all = list.read_all::<RankEntry>("", 5).await;
    assert!(matches!(read_all, Err(Error::Precondition(_))));

    let read_at = list.read_at::<RankEntry>("", 0).await;
    assert!(matches!(read_at, Err(Error::Precondition(_))));

    let push = list.push_all("", 5, &[RankEntry::new("ada", 1)]).await;
    assert!(matches!(push, Err(Error::Precondition(_))));

    let remove = list.remove_value("", 0, "\"x\"").await;
    assert!(matches!(remove, Err(Error::Precondition(_))));
}

#[tokio::test]
async fn test_replace_at_empty_key_is_a_silent_noop() {
    // The one list write that skips instead of rejecting
    let store = MemoryStore::new().with_list(KEY, ["\"a\""]);
    let list = BoundedList::new(store.clone());

    list.replace_at("", 0, "b").await.unwrap();

    assert_eq!(
        store.lrange(KEY, 0, -1).await.unwrap(),
        vec!["\"a\"".to_string()]
    );
}

#[tokio::test]
async fn test_replace_at_null_value_is_a_silent_noop() {
    let store = MemoryStore::new().with_list(KEY, ["\"a\""]);
    let list = BoundedList::new(store.clone());

    list.replace_at(KEY, 0, &Option::<String>::None)
        .await
        .unwrap();

    assert_eq!(
        store.lrange(KEY, 0, -1).await.unwrap(),
        vec!["\"a\"".to_string()]
    );
}
