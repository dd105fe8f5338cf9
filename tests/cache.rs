//! End-to-end scenarios covering sliding expiration, reaper self-cancellation,
//! capacity eviction, revive, and disposal, in a sleep-and-assert
//! integration-test style.

use reaper_cache::{Cache, CacheConfig, CacheError};
use serial_test::serial;
use std::thread::sleep;
use std::time::Duration;

#[test]
#[serial]
fn scenario_1_sliding_ttl_hit() {
    let cache: Cache<String, i32> = Cache::new(
        CacheConfig::builder()
            .expiration_window(Duration::from_millis(10))
            .use_sliding_expiration(true)
            .polling_interval(Duration::ZERO)
            .build(),
    );
    cache.put("one".to_string(), 1).unwrap();
    sleep(Duration::from_millis(5));
    assert_eq!(cache.get(&"one".to_string()).unwrap(), 1);
    sleep(Duration::from_millis(7));
    assert_eq!(cache.get(&"one".to_string()).unwrap(), 1);
    sleep(Duration::from_millis(11));
    assert_eq!(cache.get(&"one".to_string()), Err(CacheError::NotFound));
}

#[test]
#[serial]
fn scenario_2_reaper_sweep_empties_map_and_self_cancels() {
    // "two" keeps its original 1000ms window; "one" is put after the
    // window is narrowed to 300ms, so both are expired well before the
    // 2000ms wait completes.
    let cache: Cache<String, i32> = Cache::new(
        CacheConfig::builder()
            .expiration_window(Duration::from_millis(1000))
            .polling_interval(Duration::from_millis(167))
            .build(),
    );
    cache.put("two".to_string(), 50).unwrap();
    cache
        .set_expiration_window(Duration::from_millis(300))
        .unwrap();
    cache.put("one".to_string(), 50).unwrap();

    sleep(Duration::from_millis(2000));

    assert_eq!(cache.get(&"two".to_string()), Err(CacheError::NotFound));
    assert_eq!(cache.get(&"one".to_string()), Err(CacheError::NotFound));
    assert!(!cache.is_polling());
}

#[test]
#[serial]
fn scenario_3_eviction_under_capacity_pressure() {
    let cache: Cache<String, i32> = Cache::new(
        CacheConfig::builder()
            .capacity(2)
            .expiration_window(Duration::from_millis(10_000))
            .polling_interval(Duration::ZERO)
            .build(),
    );
    cache.put("a".to_string(), 1).unwrap();
    cache.put("b".to_string(), 2).unwrap();
    cache.get(&"a".to_string()).unwrap();
    cache.put("c".to_string(), 3).unwrap();

    assert_eq!(cache.count().unwrap(), 2);
    assert!(!cache.contains_key(&"b".to_string()).unwrap());
    assert!(cache.contains_key(&"a".to_string()).unwrap());
    assert!(cache.contains_key(&"c".to_string()).unwrap());
}

#[test]
fn scenario_4_functional_parity_with_plain_mapping() {
    let cache: Cache<String, i32> = Cache::new(CacheConfig::builder().build());
    cache.put("one".to_string(), 1).unwrap();
    assert!(cache.contains_key(&"one".to_string()).unwrap());
    assert!(cache.contains_value(&1).unwrap());
    assert!(cache.remove(&"one".to_string()).unwrap());
    assert_eq!(cache.count().unwrap(), 0);
}

#[test]
#[serial]
fn scenario_5_revive_resurrects_expired_entries() {
    let cache: Cache<String, i32> = Cache::new(
        CacheConfig::builder()
            .expiration_window(Duration::from_millis(50))
            .use_sliding_expiration(false)
            .polling_interval(Duration::ZERO)
            .build(),
    );
    cache.put("k".to_string(), 9).unwrap();
    sleep(Duration::from_millis(100));
    cache.revive().unwrap();
    assert_eq!(cache.get(&"k".to_string()).unwrap(), 9);
}

#[test]
fn scenario_6_dispose_is_terminal() {
    let cache: Cache<String, i32> = Cache::new(CacheConfig::builder().build());
    cache.put("k".to_string(), 1).unwrap();
    cache.dispose();
    assert_eq!(
        cache.get(&"k".to_string()),
        Err(CacheError::UsedAfterDisposal)
    );
    assert!(cache.is_disposed());
}

#[test]
fn count_never_exceeds_capacity_immediately_after_put() {
    let cache: Cache<String, i32> = Cache::new(
        CacheConfig::builder()
            .capacity(5)
            .polling_interval(Duration::ZERO)
            .build(),
    );
    for i in 0..50 {
        cache.put(format!("k{i}"), i).unwrap();
        assert!(cache.count().unwrap() <= 5);
    }
}

#[test]
fn every_operation_fails_after_dispose_except_is_disposed() {
    let cache: Cache<String, i32> = Cache::new(CacheConfig::builder().build());
    cache.dispose();

    assert_eq!(
        cache.put("k".to_string(), 1),
        Err(CacheError::UsedAfterDisposal)
    );
    assert_eq!(
        cache.get(&"k".to_string()),
        Err(CacheError::UsedAfterDisposal)
    );
    assert_eq!(
        cache.remove(&"k".to_string()),
        Err(CacheError::UsedAfterDisposal)
    );
    assert_eq!(
        cache.contains_key(&"k".to_string()),
        Err(CacheError::UsedAfterDisposal)
    );
    assert_eq!(cache.clear(), Err(CacheError::UsedAfterDisposal));
    assert_eq!(cache.count(), Err(CacheError::UsedAfterDisposal));
    assert!(cache.is_disposed());
    // dispose is idempotent
    cache.dispose();
}

#[test]
fn put_remove_is_identity_round_trip() {
    let cache: Cache<String, i32> = Cache::new(CacheConfig::builder().build());
    assert_eq!(cache.count().unwrap(), 0);
    cache.put("k".to_string(), 1).unwrap();
    cache.remove(&"k".to_string()).unwrap();
    assert_eq!(cache.count().unwrap(), 0);
    assert!(!cache.contains_key(&"k".to_string()).unwrap());
}
