//! Integration tests for the on-disk result cache.

use std::fs;
use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;

use runlens::{PayloadKind, ResultCache, RunIdentity};

fn open_cache(dir: &TempDir) -> ResultCache {
    ResultCache::open(dir.path(), Duration::from_secs(3600)).expect("cache should open")
}

fn identity(test_id: &str, run_id: &str) -> RunIdentity {
    RunIdentity::new(test_id, run_id).unwrap()
}

#[test]
fn test_put_then_get_within_ttl() {
    let dir = TempDir::new().unwrap();
    let cache = open_cache(&dir);
    let key = ResultCache::key_for(&identity("t1", "r1"), PayloadKind::Raw);
    let payload = json!({"testName": "DMZ baseline", "metrics": {"throughput": {"average": 940.0}}});

    cache.put_default(&key, &payload).unwrap();
    assert_eq!(cache.get(&key), Some(payload));

    let stats = cache.stats();
    assert_eq!(stats.entry_count, 1);
    assert_eq!(stats.hit_count, 1);
    assert_eq!(stats.miss_count, 0);
}

#[test]
fn test_expired_entry_is_a_miss_and_is_deleted() {
    let dir = TempDir::new().unwrap();
    let cache = open_cache(&dir);
    let key = ResultCache::key_for(&identity("t1", "r1"), PayloadKind::Raw);

    cache.put(&key, &json!({"x": 1}), Duration::ZERO).unwrap();
    std::thread::sleep(Duration::from_millis(10));

    assert_eq!(cache.get(&key), None);
    assert_eq!(cache.stats().entry_count, 0, "expired file should be gone");
    assert_eq!(cache.stats().miss_count, 1);
}

#[test]
fn test_corrupt_entry_self_heals() {
    let dir = TempDir::new().unwrap();
    let cache = open_cache(&dir);
    let key = ResultCache::key_for(&identity("t1", "r1"), PayloadKind::Raw);
    cache.put_default(&key, &json!({"x": 1})).unwrap();

    // Truncate the backing file mid-payload.
    let path = dir.path().join(format!("{key}.json"));
    fs::write(&path, b"{\"key\": \"broken").unwrap();

    assert_eq!(cache.get(&key), None);
    assert!(!path.exists(), "corrupt file should be removed");

    // The key is usable again afterwards.
    cache.put_default(&key, &json!({"x": 2})).unwrap();
    assert_eq!(cache.get(&key), Some(json!({"x": 2})));
}

#[test]
fn test_tampered_payload_fails_checksum() {
    let dir = TempDir::new().unwrap();
    let cache = open_cache(&dir);
    let key = ResultCache::key_for(&identity("t1", "r1"), PayloadKind::Raw);
    cache.put_default(&key, &json!({"verdict": "pass"})).unwrap();

    // Rewrite the payload but keep the stored checksum.
    let path = dir.path().join(format!("{key}.json"));
    let mut entry: serde_json::Value =
        serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    entry["payload"] = json!({"verdict": "fail"});
    fs::write(&path, serde_json::to_vec(&entry).unwrap()).unwrap();

    assert_eq!(cache.get(&key), None);
    assert!(!path.exists(), "tampered entry should be removed");
}

#[test]
fn test_cleanup_with_zero_max_age_removes_everything() {
    let dir = TempDir::new().unwrap();
    let cache = open_cache(&dir);
    for n in 0..3 {
        let key = ResultCache::key_for(&identity("t1", &format!("r{n}")), PayloadKind::Raw);
        cache.put_default(&key, &json!({"n": n})).unwrap();
    }
    std::thread::sleep(Duration::from_millis(10));

    assert_eq!(cache.cleanup(Some(Duration::ZERO)), 3);
    assert_eq!(cache.stats().entry_count, 0);
}

#[test]
fn test_cleanup_honors_per_entry_ttl() {
    let dir = TempDir::new().unwrap();
    let cache = open_cache(&dir);
    let live = ResultCache::key_for(&identity("t1", "live"), PayloadKind::Raw);
    let dead = ResultCache::key_for(&identity("t1", "dead"), PayloadKind::Raw);

    cache.put(&live, &json!({"x": 1}), Duration::from_secs(3600)).unwrap();
    cache.put(&dead, &json!({"x": 2}), Duration::ZERO).unwrap();
    std::thread::sleep(Duration::from_millis(10));

    assert_eq!(cache.cleanup(None), 1);
    assert!(cache.get(&live).is_some());
}

#[test]
fn test_clear_removes_all_entries() {
    let dir = TempDir::new().unwrap();
    let cache = open_cache(&dir);
    for n in 0..4 {
        let key = ResultCache::key_for(&identity("t2", &format!("r{n}")), PayloadKind::Summary);
        cache.put_default(&key, &json!({"n": n})).unwrap();
    }

    assert_eq!(cache.clear(), 4);
    assert_eq!(cache.stats().entry_count, 0);
}

#[test]
fn test_invalidate_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let cache = open_cache(&dir);
    let key = ResultCache::key_for(&identity("t1", "r1"), PayloadKind::Raw);
    cache.put_default(&key, &json!({"x": 1})).unwrap();

    cache.invalidate(&key);
    cache.invalidate(&key);
    assert_eq!(cache.get(&key), None);
}

#[test]
fn test_keys_are_stable_across_instances() {
    let dir = TempDir::new().unwrap();
    let key = ResultCache::key_for(&identity("t9", "r3"), PayloadKind::Summary);

    {
        let cache = open_cache(&dir);
        cache.put_default(&key, &json!({"cached": true})).unwrap();
    }

    // A second instance over the same directory sees the entry.
    let reopened = open_cache(&dir);
    assert_eq!(
        reopened.get(&ResultCache::key_for(&identity("t9", "r3"), PayloadKind::Summary)),
        Some(json!({"cached": true}))
    );
}

#[test]
fn test_raw_and_summary_keys_differ() {
    let id = identity("t1", "r1");
    assert_ne!(
        ResultCache::key_for(&id, PayloadKind::Raw),
        ResultCache::key_for(&id, PayloadKind::Summary)
    );
}
