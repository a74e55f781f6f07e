//! Integration Tests for MemoryCache
//!
//! Exercises the public cache API with a manual clock.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use memo_cache::cache::{ManualClock, MemoryCache};
use memo_cache::{cache_key, CacheConfig, DEFAULT_TTL, LONG_TTL, SHORT_TTL};
use tokio::sync::Barrier;

fn manual_cache<V: Clone>() -> (MemoryCache<V>, ManualClock) {
    let clock = ManualClock::new(1_000_000);
    let cache = MemoryCache::with_clock(CacheConfig::new("posts"), Arc::new(clock.clone()));
    (cache, clock)
}

// == Basic Operations ==

#[test]
fn test_set_then_get_returns_value() {
    let (cache, _) = manual_cache();

    cache.set("k", "v".to_string(), None);

    assert_eq!(cache.get("k").as_deref(), Some("v"));
}

#[test]
fn test_get_missing_returns_none() {
    let (cache, _) = manual_cache::<String>();
    assert_eq!(cache.get("nonexistent"), None);

    cache.set("other", "v".to_string(), None);
    assert_eq!(cache.get("nonexistent"), None);
}

#[test]
fn test_entry_expires_after_ttl() {
    let (cache, clock) = manual_cache();

    cache.set("k", "v".to_string(), Some(1_000));
    clock.advance(1_500);

    assert_eq!(cache.get("k"), None);
}

#[test]
fn test_entry_valid_before_ttl() {
    let (cache, clock) = manual_cache();

    cache.set("k", "v".to_string(), Some(5_000));
    clock.advance(4_000);

    assert_eq!(cache.get("k").as_deref(), Some("v"));
}

#[test]
fn test_invalidate_single_key() {
    let (cache, _) = manual_cache();

    cache.set("a", 1, None);
    cache.set("b", 2, None);
    cache.invalidate("a");

    assert_eq!(cache.get("a"), None);
    assert_eq!(cache.get("b"), Some(2));
}

#[test]
fn test_invalidate_all() {
    let (cache, _) = manual_cache();

    cache.set("a", 1, None);
    cache.set("b", 2, Some(10));
    cache.invalidate_all();

    assert_eq!(cache.size(), 0);
    assert_eq!(cache.get("a"), None);
    assert_eq!(cache.get("b"), None);
}

#[test]
fn test_cleanup_removes_only_expired() {
    let (cache, clock) = manual_cache();

    cache.set("a", 1, Some(1_000));
    cache.set("b", 2, Some(5_000));
    clock.advance(2_000);

    assert_eq!(cache.cleanup(), 1);
    assert_eq!(cache.keys(), vec!["b"]);
    assert_eq!(cache.get("b"), Some(2));
}

#[test]
fn test_keys_in_insertion_order() {
    let (cache, _) = manual_cache();

    cache.set("a", 1, None);
    cache.set("b", 2, None);

    assert_eq!(cache.keys(), vec!["a", "b"]);
}

#[test]
fn test_size_is_physical_count() {
    let (cache, clock) = manual_cache();

    cache.set("a", 1, Some(100));
    cache.set("b", 2, Some(100));
    clock.advance(100);

    // Both expired, neither swept yet
    assert_eq!(cache.size(), 2);
    cache.get("a");
    assert_eq!(cache.size(), 1);
    cache.cleanup();
    assert_eq!(cache.size(), 0);
}

// == Get Or Fetch ==

#[tokio::test]
async fn test_get_or_fetch_hit_skips_fetcher() {
    let (cache, _) = manual_cache();
    cache.set("k", "cached".to_string(), None);
    let calls = AtomicUsize::new(0);
    let calls_ref = &calls;

    let value: Result<String, ()> = cache
        .get_or_fetch(
            "k",
            move || async move {
                calls_ref.fetch_add(1, Ordering::SeqCst);
                Ok("fetched".to_string())
            },
            None,
        )
        .await;

    assert_eq!(value.unwrap(), "cached");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_get_or_fetch_miss_fetches_once_and_stores() {
    let (cache, clock) = manual_cache();
    let calls = AtomicUsize::new(0);
    let calls_ref = &calls;

    let value: Result<String, ()> = cache
        .get_or_fetch(
            "k",
            move || async move {
                calls_ref.fetch_add(1, Ordering::SeqCst);
                Ok("fetched".to_string())
            },
            Some(SHORT_TTL),
        )
        .await;

    assert_eq!(value.unwrap(), "fetched");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.get("k").as_deref(), Some("fetched"));

    clock.advance(SHORT_TTL);
    assert_eq!(cache.get("k"), None);
}

#[tokio::test]
async fn test_get_or_fetch_refetches_expired_entry() {
    let (cache, clock) = manual_cache();
    cache.set("k", 1, Some(10));
    clock.advance(10);

    let value: Result<i32, ()> = cache.get_or_fetch("k", || async { Ok(2) }, None).await;

    assert_eq!(value, Ok(2));
    assert_eq!(cache.get("k"), Some(2));
}

#[tokio::test]
async fn test_get_or_fetch_propagates_error_without_writing() {
    let (cache, _) = manual_cache::<String>();

    let result = cache
        .get_or_fetch(
            "k",
            || async { Err::<String, _>(std::io::Error::other("backend down")) },
            None,
        )
        .await;

    assert_eq!(result.unwrap_err().to_string(), "backend down");
    assert_eq!(cache.size(), 0);
    assert_eq!(cache.get("k"), None);
}

#[tokio::test]
async fn test_get_or_fetch_concurrent_misses_both_fetch() {
    // No single-flight: both callers observe the miss and both fetch.
    let (cache, _) = manual_cache();
    let calls = AtomicUsize::new(0);
    let barrier = Barrier::new(2);
    let (calls_ref, barrier_ref) = (&calls, &barrier);

    let fetch = move |value: &'static str| {
        move || async move {
            calls_ref.fetch_add(1, Ordering::SeqCst);
            // Neither fetch finishes until both have started
            barrier_ref.wait().await;
            Ok::<_, ()>(value.to_string())
        }
    };

    let (first, second) = tokio::join!(
        cache.get_or_fetch("k", fetch("first"), None),
        cache.get_or_fetch("k", fetch("second"), None),
    );

    assert_eq!(first.unwrap(), "first");
    assert_eq!(second.unwrap(), "second");
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    // Whichever set ran last wins; there is still only one entry
    let stored = cache.get("k").unwrap();
    assert!(stored == "first" || stored == "second");
    assert_eq!(cache.size(), 1);
}

// == Keys and Constants ==

#[test]
fn test_cache_key_builder() {
    assert_eq!(cache_key!("projects", "list", 1), "projects:list:1");
    assert_eq!(
        cache_key!("projects", "list", None::<&str>, "active"),
        "projects:list:active"
    );
    assert_eq!(cache_key!("projects"), "projects:");
}

#[test]
fn test_ttl_constants() {
    assert_eq!(SHORT_TTL, 60_000);
    assert_eq!(DEFAULT_TTL, 300_000);
    assert_eq!(LONG_TTL, 900_000);
}

#[test]
fn test_shared_across_threads() {
    let (cache, _) = manual_cache();
    let cache = Arc::new(cache);

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let cache = Arc::clone(&cache);
            std::thread::spawn(move || {
                for j in 0..25 {
                    cache.set(format!("k{}-{}", i, j), j, None);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.size(), 100);
    assert_eq!(cache.keys().len(), 100);
}
