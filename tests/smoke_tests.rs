use ikhalenda::components::calendar::CalendarState;
use ikhalenda::components::events::{EventStore, FileStorage, NewEvent, EVENTS_KEY};
use ikhalenda::components::events::LocalStorage;
use ikhalenda::components::redis_service::RedisActor;
use ikhalenda::config::Config;
use chrono::NaiveDate;
use std::sync::Arc;

/// Smoke test to verify the default config
#[test]
fn test_config_defaults() {
    let config = Config::new("client-id", "client-secret", "session-secret");

    assert_eq!(config.redis_url, "redis://127.0.0.1:6379");
    assert_eq!(config.port, 3000);
    assert_eq!(config.locale, "xh");
    assert_eq!(config.redirect_uri(), "http://localhost:3000/oauth/callback");
}

/// Smoke test for the Redis actor handle
#[tokio::test]
async fn test_redis_handle_creation() {
    // Nothing connects until the first command
    let (mut actor, redis_handle) = RedisActor::new("redis://127.0.0.1:6379").unwrap();
    let task = tokio::spawn(async move { actor.run().await });

    assert!(redis_handle.shutdown().await.is_ok());
    task.await.unwrap();
}

/// Events written by one store are read back by the next, in order
#[test]
fn test_events_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let storage: Arc<dyn LocalStorage> = Arc::new(FileStorage::new(dir.path()));

    let mut store = EventStore::load(storage.clone());
    let first = store
        .add(NewEvent::new("2025-03-15", "Meeting").with_time("14:30"))
        .unwrap();
    let second = store
        .add(NewEvent::new("2025-03-15", "Dinner").with_description("Ekhaya"))
        .unwrap();
    store.add(NewEvent::new("2025-03-16", "Church")).unwrap();

    let reloaded = EventStore::load(storage.clone());
    assert_eq!(reloaded.all(), store.all());
    assert_eq!(reloaded.list_for_date("2025-03-15"), vec![&first, &second]);
    assert!(dir.path().join(format!("{}.json", EVENTS_KEY)).exists());
}

/// A corrupt payload starts an empty store instead of failing
#[test]
fn test_corrupt_payload_recovers_empty() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(FileStorage::new(dir.path()));
    storage.set(EVENTS_KEY, "{ not json").unwrap();

    let store = EventStore::load(storage);
    assert!(store.is_empty());
}

/// Month grid for the current month marks today and days with events
#[test]
fn test_month_grid() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = EventStore::load(Arc::new(FileStorage::new(dir.path())));
    store.add(NewEvent::new("2025-03-20", "Meeting")).unwrap();

    let today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
    let grid = CalendarState::new(today).grid(&store);

    // 1 March 2025 is a Saturday
    assert_eq!(grid.iter().take_while(|c| c.as_day().is_none()).count(), 6);
    let days: Vec<_> = grid.iter().filter_map(|c| c.as_day()).collect();
    assert_eq!(days.len(), 31);
    assert!(days[14].is_today && days[14].is_selected);
    assert!(days[19].has_events);
}
