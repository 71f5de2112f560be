// tests for the response cache

use std::time::Duration;

use promptgate::{GenerateResponse, ResponseCache};

fn response(content: &str) -> GenerateResponse {
    GenerateResponse {
        content: content.to_string(),
        provider: "test".to_string(),
        tokens_used: None,
        cached: false,
    }
}

#[test]
fn test_hit_within_ttl() {
    let cache = ResponseCache::new(Duration::from_secs(60));
    cache.set("architect:make a site:", response("plan"));

    let hit = cache.get("architect:make a site:").unwrap();
    assert_eq!(hit.content, "plan");
}

#[test]
fn test_miss_for_unknown_key() {
    let cache = ResponseCache::new(Duration::from_secs(60));
    assert!(cache.get("engineer:anything:").is_none());
}

#[test]
fn test_expired_entry_never_returned() {
    let cache = ResponseCache::new(Duration::from_millis(50));
    cache.set("k", response("stale"));

    std::thread::sleep(Duration::from_millis(60));
    assert!(cache.get("k").is_none());
}

#[test]
fn test_set_refreshes_entry() {
    let cache = ResponseCache::new(Duration::from_secs(60));
    cache.set("k", response("first"));
    cache.set("k", response("second"));

    assert_eq!(cache.get("k").unwrap().content, "second");
}

#[test]
fn test_keys_are_exact() {
    // no normalization - casing makes a different key
    let cache = ResponseCache::new(Duration::from_secs(60));
    cache.set("architect:Make a site:", response("plan"));

    assert!(cache.get("architect:make a site:").is_none());
}
