//! Tests for typed caching and entry expiry.
//!
//! Expiry cases run on tokio's paused clock so TTLs elapse instantly
//! and deterministically.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::time::Duration;

use storekeep::{Cache, Error, KeyTtl, Store};
use storekeep_test_utils::{MemoryStore, RankEntry, SessionRecord};

#[tokio::test]
async fn test_unknown_key_is_a_miss_not_an_error() {
    let cache = Cache::new(MemoryStore::new());

    assert_eq!(cache.get::<SessionRecord>("session:absent").await.unwrap(), None);
    assert!(!cache.has_key("session:absent").await.unwrap());
}

#[tokio::test]
async fn test_put_then_get_round_trips_the_value() {
    let cache = Cache::new(MemoryStore::new());
    let record = SessionRecord::sample(7);

    cache.put("session:7", &record).await.unwrap();

    let fetched: SessionRecord = cache.get("session:7").await.unwrap().unwrap();
    assert_eq!(fetched, record);
    assert!(cache.has_key("session:7").await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_entry_expires_after_its_ttl() {
    let store = MemoryStore::new();
    let cache = Cache::new(store.clone());
    let record = SessionRecord::sample(1);

    cache
        .put_with_ttl("session:1", &record, Duration::from_secs(1))
        .await
        .unwrap();
    assert!(cache.has_key("session:1").await.unwrap());

    tokio::time::advance(Duration::from_secs(2)).await;

    assert_eq!(cache.get::<SessionRecord>("session:1").await.unwrap(), None);
    assert!(!cache.has_key("session:1").await.unwrap());
    assert_eq!(store.ttl("session:1").await.unwrap(), KeyTtl::NotFound);
}

#[tokio::test(start_paused = true)]
async fn test_default_ttl_is_one_hour() {
    let store = MemoryStore::new();
    let cache = Cache::new(store.clone());

    cache.put("session:2", &SessionRecord::sample(2)).await.unwrap();

    // Nothing has advanced the clock, so the full hour remains
    assert_eq!(
        store.ttl("session:2").await.unwrap(),
        KeyTtl::Remaining(Duration::from_secs(3600))
    );

    tokio::time::advance(Duration::from_secs(3599)).await;
    assert!(cache.has_key("session:2").await.unwrap());

    tokio::time::advance(Duration::from_secs(2)).await;
    assert!(!cache.has_key("session:2").await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_expire_refreshes_a_live_entry() {
    let cache = Cache::new(MemoryStore::new());

    cache
        .put_with_ttl("session:3", &SessionRecord::sample(3), Duration::from_secs(1))
        .await
        .unwrap();

    assert!(cache.expire("session:3", Duration::from_secs(60)).await.unwrap());

    // Well past the original TTL, still inside the refreshed one
    tokio::time::advance(Duration::from_secs(30)).await;
    assert!(cache.has_key("session:3").await.unwrap());

    tokio::time::advance(Duration::from_secs(31)).await;
    assert!(!cache.has_key("session:3").await.unwrap());
}

#[tokio::test]
async fn test_expire_on_missing_key_reports_false() {
    let cache = Cache::new(MemoryStore::new());
    assert!(!cache.expire("session:absent", Duration::from_secs(60)).await.unwrap());
}

#[tokio::test]
async fn test_delete_keys_counts_only_existing_entries() {
    let cache = Cache::new(MemoryStore::new());

    cache.put("session:a", &SessionRecord::sample(10)).await.unwrap();
    cache.put("session:b", &SessionRecord::sample(11)).await.unwrap();

    let removed = cache
        .delete_keys(&["session:a", "session:b", "session:absent"])
        .await
        .unwrap();
    assert_eq!(removed, 2);

    assert!(!cache.has_key("session:a").await.unwrap());
    assert!(!cache.has_key("session:b").await.unwrap());
}

#[tokio::test]
async fn test_type_mismatch_surfaces_as_codec_error() {
    let cache = Cache::new(MemoryStore::new());

    cache.put("entry", "just a string").await.unwrap();

    let result = cache.get::<RankEntry>("entry").await;
    assert!(matches!(result, Err(Error::Codec(_))));
}

#[tokio::test]
async fn test_decode_tolerates_evolved_payloads() {
    // A newer writer added a field and dropped the optional region;
    // an older reader still decodes the record.
    let store = MemoryStore::new().with_value(
        "session:9",
        r#"{"session_id":"s-9","user_id":"u-9","started_at":"2026-01-15T10:30:00Z","build":"canary"}"#,
    );
    let cache = Cache::new(store);

    let fetched: SessionRecord = cache.get("session:9").await.unwrap().unwrap();
    assert_eq!(fetched.session_id, "s-9");
    assert_eq!(fetched.region, None);
}

#[tokio::test(start_paused = true)]
async fn test_custom_default_ttl_is_applied() {
    let store = MemoryStore::new();
    let cache = Cache::with_default_ttl(store.clone(), Duration::from_secs(5));

    cache.put("entry", &RankEntry::new("ada", 12)).await.unwrap();

    assert_eq!(
        store.ttl("entry").await.unwrap(),
        KeyTtl::Remaining(Duration::from_secs(5))
    );
}

#[tokio::test]
async fn test_operations_reject_an_empty_key() {
    let cache = Cache::new(MemoryStore::new());

    let get = cache.get::<SessionRecord>("").await;
    assert!(matches!(get, Err(Error::Precondition(_))));

    let put = cache.put("", &SessionRecord::sample(1)).await;
    assert!(matches!(put, Err(Error::Precondition(_))));

    let has = cache.has_key("").await;
    assert!(matches!(has, Err(Error::Precondition(_))));

    let expire = cache.expire("", Duration::from_secs(1)).await;
    assert!(matches!(expire, Err(Error::Precondition(_))));
}

#[tokio::test]
async fn test_delete_keys_empty_batch_is_a_noop() {
    let cache = Cache::new(MemoryStore::new());
    assert_eq!(cache.delete_keys(&[]).await.unwrap(), 0);
}
