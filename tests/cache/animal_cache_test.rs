//! Tests for the scope-keyed animal cache

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use herd_ledger::cache::AnimalCache;
use herd_ledger::normalize::extract_records;
use herd_ledger::utils::test::{Endpoint, FixtureApi, buffalo, timed_execution};
use herd_ledger::{HerdError, LivestockApi};
use serde_json::json;

#[tokio::test]
async fn test_concurrent_callers_share_one_fetch() {
    let api = FixtureApi::new()
        .with_animals(json!({"data": [buffalo("B1", "1"), buffalo("B2", "2")]}))
        .with_delay(Duration::from_millis(30));
    let cache = AnimalCache::new();
    let (api_ref, cache_ref) = (&api, &cache);

    let load = move || {
        cache_ref.get_or_fetch("all-animals", move || async move {
            extract_records(api_ref.fetch_all_animals().await?)
        })
    };
    let (a, b, c) = futures::join!(load(), load(), load());

    assert_eq!(api.calls(Endpoint::AllAnimals), 1);
    for records in [a, b, c] {
        assert_eq!(records.unwrap().len(), 2);
    }
}

#[tokio::test]
async fn test_second_access_is_served_from_cache() {
    let api = FixtureApi::new()
        .with_animals(json!([buffalo("B1", "1")]))
        .with_delay(Duration::from_millis(20));
    let cache = AnimalCache::new();
    let api_ref = &api;
    let fetch = move || async move { extract_records(api_ref.fetch_all_animals().await?) };

    let (cold, _) = timed_execution(cache.get_or_fetch("all-animals", fetch)).await;
    let (warm, records) = timed_execution(cache.get_or_fetch("all-animals", fetch)).await;

    assert_eq!(records.unwrap().len(), 1);
    assert!(warm < cold);
    assert_eq!(api.calls(Endpoint::AllAnimals), 1);
    assert!(cache.get("all-animals").unwrap().is_some());
}

#[tokio::test]
async fn test_failures_are_not_cached() {
    let attempts = AtomicUsize::new(0);
    let cache = AnimalCache::new();
    let counter = &attempts;

    let failed = cache
        .get_or_fetch("all-animals", move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(HerdError::fetch("animals", "unreachable"))
        })
        .await;
    assert!(failed.unwrap_err().is_fetch());
    assert!(cache.get("all-animals").unwrap().is_none());

    let recovered = cache
        .get_or_fetch("all-animals", move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(vec![json!({"id": "B1"})])
        })
        .await
        .unwrap();
    assert_eq!(recovered.len(), 1);
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_scopes_are_cached_separately() {
    let cache = AnimalCache::new();
    cache
        .get_or_fetch("herd-a", || async { Ok(vec![json!({"id": 1})]) })
        .await
        .unwrap();
    let other = cache
        .get_or_fetch("herd-b", || async { Ok(vec![json!({"id": 2}), json!({"id": 3})]) })
        .await
        .unwrap();
    assert_eq!(other.len(), 2);

    assert!(cache.invalidate("herd-a").unwrap());
    assert!(cache.get("herd-a").unwrap().is_none());
    assert!(cache.get("herd-b").unwrap().is_some());

    cache.clear().unwrap();
    assert!(cache.get("herd-b").unwrap().is_none());
}
