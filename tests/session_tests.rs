use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use template_push::session::{InMemorySession, LoadLog, SessionStore};

#[test]
fn test_basic_session_operations() {
    let session = InMemorySession::new();

    session.set("key1", json!("value1")).unwrap();
    assert_eq!(session.get("key1"), Some(json!("value1")));

    assert_eq!(session.get("nonexistent"), None);

    session.set("key1", json!({"updated": true})).unwrap();
    assert_eq!(session.get("key1"), Some(json!({"updated": true})));
}

#[test]
fn test_exists_delete_and_clear() {
    let session = InMemorySession::new();

    assert!(!session.exists("key1"));
    session.set("key1", json!(1)).unwrap();
    session.set("key2", json!(2)).unwrap();
    assert!(session.exists("key1"));

    session.delete("key1").unwrap();
    assert!(!session.exists("key1"));
    assert_eq!(session.len(), 1);

    session.clear().unwrap();
    assert!(session.is_empty());
}

#[tokio::test]
async fn test_ttl_expiration() {
    let session = InMemorySession::new().with_ttl(Duration::from_millis(100));

    session.set("expiring_key", json!("value")).unwrap();
    assert!(session.exists("expiring_key"));

    // Wait for expiration
    tokio::time::sleep(Duration::from_millis(150)).await;

    assert!(!session.exists("expiring_key"));
    assert_eq!(session.get("expiring_key"), None);
}

#[test]
fn test_max_size_evicts_oldest() {
    let session = InMemorySession::new().with_max_size(2);

    session.set("first", json!(1)).unwrap();
    std::thread::sleep(Duration::from_millis(2));
    session.set("second", json!(2)).unwrap();
    std::thread::sleep(Duration::from_millis(2));
    session.set("third", json!(3)).unwrap();

    assert_eq!(session.get("first"), None);
    assert_eq!(session.get("second"), Some(json!(2)));
    assert_eq!(session.get("third"), Some(json!(3)));
}

#[tokio::test]
async fn test_load_log_appends_in_order() {
    let session: Arc<dyn SessionStore> = Arc::new(InMemorySession::new());
    let log = LoadLog::new(session.as_ref(), "loaded");

    for i in 0..100 {
        log.append(json!(format!("collection-{}", i))).unwrap();
    }

    let entries = log.entries();
    assert_eq!(entries.len(), 100);
    assert_eq!(entries[0], json!("collection-0"));
    assert_eq!(entries[99], json!("collection-99"));
}

#[tokio::test]
async fn test_pinned_keys_never_expire_or_evict() {
    let session = InMemorySession::new()
        .with_ttl(Duration::from_millis(50))
        .with_max_size(1)
        .with_pinned("loaded");

    session.set("loaded", json!(["pages"])).unwrap();
    session.set("other", json!(1)).unwrap();
    assert_eq!(session.get("loaded"), Some(json!(["pages"])));

    tokio::time::sleep(Duration::from_millis(80)).await;
    assert_eq!(session.get("loaded"), Some(json!(["pages"])));
    assert_eq!(session.get("other"), None);
    assert_eq!(session.len(), 1);
}
