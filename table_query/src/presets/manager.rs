//! Preset manager
//!
//! Loads a kind's presets lazily and applies mutations to the local list
//! first, so the visible list updates immediately. The list is only
//! re-read from the source on `reload`.

use crate::errors::PresetError;
use crate::presets::entry::{select_default_preset, PresetEntry, PresetSnapshot};
use crate::query_builder::FilterMap;
use crate::traits::{Clock, PresetSource, SystemClock};
use signal_system::{
    EventType, NotificationLevel, Notifier, QueryEvent, SignalManager, TracingNotifier,
};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use value_mapping::prune_filters;

const OPTIMISTIC_ID_PREFIX: &str = "optimistic-";

#[derive(Debug, Default)]
struct PresetList {
    entries: Vec<PresetEntry>,
    loaded: bool,
}

pub struct PresetManager {
    kind: Option<String>,
    source: Option<Arc<dyn PresetSource>>,
    notifier: Arc<dyn Notifier>,
    signals: Option<Arc<SignalManager>>,
    clock: Arc<dyn Clock>,
    fallback_message: String,
    list: RwLock<PresetList>,
    load_lock: Mutex<()>,
}

impl std::fmt::Debug for PresetManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresetManager")
            .field("kind", &self.kind)
            .field("has_source", &self.source.is_some())
            .field("has_signals", &self.signals.is_some())
            .finish()
    }
}

impl PresetManager {
    /// A manager without a kind or source is disabled and never calls out
    pub fn new(kind: Option<String>, source: Option<Arc<dyn PresetSource>>) -> Self {
        Self {
            kind: kind.filter(|kind| !kind.is_empty()),
            source,
            notifier: Arc::new(TracingNotifier),
            signals: None,
            clock: Arc::new(SystemClock),
            fallback_message: config::NotifyConfig::default().fallback_message,
            list: RwLock::new(PresetList::default()),
            load_lock: Mutex::new(()),
        }
    }

    pub fn disabled() -> Self {
        Self::new(None, None)
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_signals(mut self, signals: Arc<SignalManager>) -> Self {
        self.signals = Some(signals);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_fallback_message(mut self, message: impl Into<String>) -> Self {
        self.fallback_message = message.into();
        self
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        self.kind.is_some() && self.source.is_some()
    }

    fn enabled(&self) -> Option<(&str, &Arc<dyn PresetSource>)> {
        match (&self.kind, &self.source) {
            (Some(kind), Some(source)) => Some((kind.as_str(), source)),
            _ => None,
        }
    }

    pub async fn is_loaded(&self) -> bool {
        self.list.read().await.loaded
    }

    /// Load once; later calls are no-ops until `reload`
    pub async fn ensure_loaded(&self) -> Result<(), PresetError> {
        if self.enabled().is_none() || self.is_loaded().await {
            return Ok(());
        }

        let _guard = self.load_lock.lock().await;
        // Another caller may have finished loading while we waited
        if self.is_loaded().await {
            return Ok(());
        }
        self.load_from_source().await
    }

    /// Re-read the list from the source, discarding local edits
    pub async fn reload(&self) -> Result<(), PresetError> {
        if self.enabled().is_none() {
            return Ok(());
        }

        let _guard = self.load_lock.lock().await;
        self.load_from_source().await
    }

    async fn load_from_source(&self) -> Result<(), PresetError> {
        let Some((kind, source)) = self.enabled() else {
            return Ok(());
        };

        match source.load(kind).await {
            Ok(entries) => {
                let count = entries.len();
                {
                    let mut list = self.list.write().await;
                    list.entries = entries;
                    list.loaded = true;
                }
                self.emit(
                    QueryEvent::new(EventType::PresetsLoaded, kind)
                        .with_payload("count", serde_json::Value::from(count)),
                )
                .await;
                Ok(())
            }
            Err(error) => {
                self.surface(kind, &error).await;
                Err(error)
            }
        }
    }

    /// Presets of this kind, loading them on first use
    pub async fn presets(&self) -> Result<Vec<PresetEntry>, PresetError> {
        self.ensure_loaded().await?;
        Ok(self.list.read().await.entries.clone())
    }

    /// Presets currently held locally, without loading
    pub async fn cached_presets(&self) -> Vec<PresetEntry> {
        self.list.read().await.entries.clone()
    }

    pub async fn find(&self, id: &str) -> Option<PresetEntry> {
        self.list
            .read()
            .await
            .entries
            .iter()
            .find(|entry| entry.id == id)
            .cloned()
    }

    /// The most recently used preset, loading presets on first use
    pub async fn default_preset(&self) -> Result<Option<PresetEntry>, PresetError> {
        let entries = self.presets().await?;
        Ok(select_default_preset(&entries).cloned())
    }

    /// Save the current filters under `name`
    ///
    /// The entry appears locally before the source answers and is rolled
    /// back if the source fails.
    pub async fn add_preset(
        &self,
        name: &str,
        filters: FilterMap,
    ) -> Result<Option<PresetEntry>, PresetError> {
        let Some((kind, source)) = self.enabled() else {
            return Ok(None);
        };

        let snapshot = PresetSnapshot::new(prune_filters(filters), self.clock.now_millis());
        let data = snapshot.to_data()?;
        let optimistic_id = format!("{}{}", OPTIMISTIC_ID_PREFIX, uuid::Uuid::new_v4());

        self.list
            .write()
            .await
            .entries
            .push(PresetEntry::new(optimistic_id.clone(), name, data.clone()));

        match source.add(kind, name, &data).await {
            Ok(stored) => {
                {
                    let mut list = self.list.write().await;
                    let position = list.entries.iter().position(|entry| entry.id == optimistic_id);
                    if let Some(index) = position {
                        list.entries[index] = stored.clone();
                    } else if !list.entries.iter().any(|entry| entry.id == stored.id) {
                        // A reload replaced the list while the add was in flight
                        list.entries.push(stored.clone());
                    }
                }
                self.emit(
                    QueryEvent::new(EventType::PresetAdded, kind)
                        .with_payload("id", serde_json::Value::String(stored.id.clone())),
                )
                .await;
                Ok(Some(stored))
            }
            Err(error) => {
                self.list
                    .write()
                    .await
                    .entries
                    .retain(|entry| entry.id != optimistic_id);
                self.surface(kind, &error).await;
                Err(error)
            }
        }
    }

    /// Delete a preset; it disappears locally before the source answers
    ///
    /// An id missing from the loaded list is `NotFound` and never reaches
    /// the source.
    pub async fn delete_preset(&self, id: &str) -> Result<bool, PresetError> {
        let Some((kind, source)) = self.enabled() else {
            return Ok(false);
        };
        self.ensure_loaded().await?;

        let (index, entry) = {
            let mut list = self.list.write().await;
            let index = list
                .entries
                .iter()
                .position(|entry| entry.id == id)
                .ok_or_else(|| PresetError::NotFound(id.to_string()))?;
            (index, list.entries.remove(index))
        };

        match source.delete(kind, id).await {
            Ok(()) => {
                self.emit(
                    QueryEvent::new(EventType::PresetDeleted, kind)
                        .with_payload("id", serde_json::Value::String(id.to_string())),
                )
                .await;
                Ok(true)
            }
            Err(error) => {
                {
                    let mut list = self.list.write().await;
                    let index = index.min(list.entries.len());
                    list.entries.insert(index, entry);
                }
                self.surface(kind, &error).await;
                Err(error)
            }
        }
    }

    /// Mark a preset as just used so it becomes the default; local only
    pub async fn touch_preset(&self, id: &str) -> Result<PresetSnapshot, PresetError> {
        let now = self.clock.now_millis();
        let mut list = self.list.write().await;

        let entry = list
            .entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or_else(|| PresetError::NotFound(id.to_string()))?;

        let mut snapshot = entry.snapshot().ok_or_else(|| {
            PresetError::Serialization(format!("preset '{}' has malformed data", id))
        })?;
        snapshot.last_updated = now;
        entry.data = snapshot.to_data()?;
        Ok(snapshot)
    }

    async fn surface(&self, kind: &str, error: &PresetError) {
        let message = error.user_message(&self.fallback_message);
        tracing::warn!(kind, "preset operation failed: {error}");
        self.notifier.notify(NotificationLevel::Error, &message);
        self.emit(QueryEvent::new(EventType::PresetFailed, kind).with_message(message))
            .await;
    }

    async fn emit(&self, event: QueryEvent) {
        if let Some(signals) = &self.signals {
            signals.dispatch(event).await;
        }
    }
}
