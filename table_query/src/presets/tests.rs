//! Preset manager tests

use crate::errors::PresetError;
use crate::presets::{MemoryPresetSource, PresetEntry, PresetManager};
use crate::query_builder::{filters_from_value, FilterMap};
use crate::traits::{ManualClock, PresetSource};
use async_trait::async_trait;
use serde_json::json;
use signal_system::{NotificationQueue, SignalManager, EventType};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Memory source with call counters, failure switches and an optional gate on `add`
#[derive(Default)]
struct TestSource {
    inner: MemoryPresetSource,
    loads: AtomicUsize,
    adds: AtomicUsize,
    deletes: AtomicUsize,
    fail_load: AtomicBool,
    fail_add: AtomicBool,
    fail_delete: AtomicBool,
    add_gate: Option<Arc<Notify>>,
}

#[async_trait]
impl PresetSource for TestSource {
    async fn load(&self, kind: &str) -> Result<Vec<PresetEntry>, PresetError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(PresetError::Source("preset service unavailable".to_string()));
        }
        self.inner.load(kind).await
    }

    async fn add(&self, kind: &str, name: &str, data: &str) -> Result<PresetEntry, PresetError> {
        self.adds.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.add_gate {
            gate.notified().await;
        }
        if self.fail_add.load(Ordering::SeqCst) {
            return Err(PresetError::Source("name already taken".to_string()));
        }
        self.inner.add(kind, name, data).await
    }

    async fn delete(&self, kind: &str, id: &str) -> Result<(), PresetError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(PresetError::Source(String::new()));
        }
        self.inner.delete(kind, id).await
    }
}

async fn seeded_source() -> TestSource {
    let source = TestSource::default();
    source
        .inner
        .insert("orders", PresetEntry::new("p1", "Open", r#"{"status":"open","lastUpdated":100}"#))
        .await;
    source
        .inner
        .insert("orders", PresetEntry::new("p2", "Closed", r#"{"status":"closed","lastUpdated":200}"#))
        .await;
    source
        .inner
        .insert("orders", PresetEntry::new("p3", "Broken", "not json"))
        .await;
    source
}

fn manager(source: Arc<TestSource>) -> (PresetManager, Arc<NotificationQueue>) {
    let queue = Arc::new(NotificationQueue::new());
    let manager = PresetManager::new(Some("orders".to_string()), Some(source))
        .with_notifier(queue.clone())
        .with_clock(Arc::new(ManualClock::new(1_000)))
        .with_fallback_message("Something went wrong");
    (manager, queue)
}

fn filters(value: serde_json::Value) -> FilterMap {
    filters_from_value(value)
}

#[tokio::test]
async fn test_disabled_without_kind() {
    let source = Arc::new(seeded_source().await);
    let manager = PresetManager::new(None, Some(source.clone()));

    assert!(!manager.is_enabled());
    assert!(manager.presets().await.unwrap().is_empty());
    assert!(manager.default_preset().await.unwrap().is_none());
    assert_eq!(manager.add_preset("x", FilterMap::new()).await.unwrap(), None);
    assert!(!manager.delete_preset("p1").await.unwrap());
    manager.reload().await.unwrap();

    assert_eq!(source.loads.load(Ordering::SeqCst), 0);
    assert_eq!(source.adds.load(Ordering::SeqCst), 0);

    let empty_kind = PresetManager::new(Some(String::new()), Some(source.clone()));
    assert!(!empty_kind.is_enabled());
    assert!(!PresetManager::disabled().is_enabled());
}

#[tokio::test]
async fn test_loads_lazily_once() {
    let source = Arc::new(seeded_source().await);
    let (manager, _) = manager(source.clone());

    assert!(!manager.is_loaded().await);
    assert_eq!(source.loads.load(Ordering::SeqCst), 0);

    assert_eq!(manager.presets().await.unwrap().len(), 3);
    assert_eq!(manager.presets().await.unwrap().len(), 3);
    assert_eq!(source.loads.load(Ordering::SeqCst), 1);

    manager.reload().await.unwrap();
    assert_eq!(source.loads.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_default_preset_skips_invalid_entries() {
    let source = Arc::new(seeded_source().await);
    let (manager, _) = manager(source);

    let default = manager.default_preset().await.unwrap().unwrap();
    assert_eq!(default.id, "p2");
}

#[tokio::test]
async fn test_add_is_visible_before_source_answers() {
    let gate = Arc::new(Notify::new());
    let source = Arc::new(TestSource {
        add_gate: Some(gate.clone()),
        ..TestSource::default()
    });
    let (manager, _) = manager(source.clone());
    let manager = Arc::new(manager);
    manager.ensure_loaded().await.unwrap();

    let task = {
        let manager = manager.clone();
        tokio::spawn(async move {
            manager
                .add_preset("Mine", filters(json!({ "status": "open", "q": "" })))
                .await
        })
    };

    // Wait until the source has been called
    while source.adds.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }
    let pending = manager.cached_presets().await;
    assert_eq!(pending.len(), 1);
    assert!(pending[0].id.starts_with("optimistic-"));
    assert_eq!(pending[0].name, "Mine");

    gate.notify_one();
    let stored = task.await.unwrap().unwrap().unwrap();

    let presets = manager.cached_presets().await;
    assert_eq!(presets, vec![stored.clone()]);
    let snapshot = stored.snapshot().unwrap();
    assert_eq!(snapshot.last_updated, 1_000);
    assert_eq!(snapshot.filters, filters(json!({ "status": "open" })));
    // No revalidation after the mutation
    assert_eq!(source.loads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failed_add_rolls_back_and_notifies() {
    let source = Arc::new(seeded_source().await);
    source.fail_add.store(true, Ordering::SeqCst);
    let (manager, queue) = manager(source);
    manager.ensure_loaded().await.unwrap();

    let err = manager
        .add_preset("Dup", filters(json!({ "status": "open" })))
        .await
        .unwrap_err();

    assert_eq!(err, PresetError::Source("name already taken".to_string()));
    assert_eq!(manager.cached_presets().await.len(), 3);
    let messages: Vec<String> = queue.drain().into_iter().map(|n| n.message).collect();
    assert_eq!(messages, vec!["name already taken"]);
}

#[tokio::test]
async fn test_delete_is_optimistic_and_restored_on_failure() {
    let source = Arc::new(seeded_source().await);
    let (manager, queue) = manager(source.clone());
    manager.ensure_loaded().await.unwrap();

    assert!(manager.delete_preset("p1").await.unwrap());
    let ids: Vec<String> = manager.cached_presets().await.into_iter().map(|p| p.id).collect();
    assert_eq!(ids, vec!["p2", "p3"]);
    assert_eq!(source.inner.len("orders").await, 2);

    source.fail_delete.store(true, Ordering::SeqCst);
    assert!(manager.delete_preset("p3").await.is_err());
    let ids: Vec<String> = manager.cached_presets().await.into_iter().map(|p| p.id).collect();
    assert_eq!(ids, vec!["p2", "p3"]);

    // Empty source message falls back to the generic one
    let messages: Vec<String> = queue.drain().into_iter().map(|n| n.message).collect();
    assert_eq!(messages, vec!["Something went wrong"]);
}

#[tokio::test]
async fn test_delete_unknown_id_is_not_found() {
    let source = Arc::new(seeded_source().await);
    let (manager, queue) = manager(source.clone());

    let err = manager.delete_preset("missing").await.unwrap_err();
    assert!(matches!(err, PresetError::NotFound(id) if id == "missing"));
    assert_eq!(source.deletes.load(Ordering::SeqCst), 0);
    assert_eq!(source.loads.load(Ordering::SeqCst), 1);
    assert_eq!(manager.cached_presets().await.len(), 3);
    assert!(queue.is_empty());
}

#[tokio::test]
async fn test_load_failure_is_surfaced_without_retry() {
    let source = Arc::new(seeded_source().await);
    source.fail_load.store(true, Ordering::SeqCst);
    let (manager, queue) = manager(source.clone());
    let signals = Arc::new(SignalManager::new());
    let failures = Arc::new(AtomicUsize::new(0));
    let counter = failures.clone();
    signals.add_callback(move |event| {
        if event.event_type == EventType::PresetFailed {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    });
    let manager = manager.with_signals(signals);

    let err = manager.presets().await.unwrap_err();
    assert!(matches!(err, PresetError::Source(_)));
    assert_eq!(source.loads.load(Ordering::SeqCst), 1);
    assert!(!manager.is_loaded().await);
    assert_eq!(queue.len(), 1);
    assert_eq!(failures.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_touch_makes_preset_the_default() {
    let source = Arc::new(seeded_source().await);
    let (manager, _) = manager(source);
    manager.ensure_loaded().await.unwrap();

    let snapshot = manager.touch_preset("p1").await.unwrap();
    assert_eq!(snapshot.last_updated, 1_000);
    assert_eq!(manager.default_preset().await.unwrap().map(|p| p.id), Some("p1".to_string()));

    assert!(matches!(
        manager.touch_preset("p3").await,
        Err(PresetError::Serialization(_))
    ));
    assert!(matches!(
        manager.touch_preset("nope").await,
        Err(PresetError::NotFound(_))
    ));
}
