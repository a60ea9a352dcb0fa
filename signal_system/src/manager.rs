use crate::event::QueryEvent;
use crate::types::{EventCallback, EventProcessingError, SyncCallback};
use futures::FutureExt;
use std::future::Future;
use std::sync::{Arc, RwLock};

/// Signal manager for table query event notifications
pub struct SignalManager {
    callbacks: RwLock<Vec<SyncCallback>>,
    async_callbacks: RwLock<Vec<EventCallback>>,
}

impl std::fmt::Debug for SignalManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalManager")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}

impl SignalManager {
    pub fn new() -> Self {
        Self {
            callbacks: RwLock::new(Vec::new()),
            async_callbacks: RwLock::new(Vec::new()),
        }
    }

    /// Add event callback
    pub fn add_callback<F>(&self, callback: F)
    where
        F: Fn(&QueryEvent) + Send + Sync + 'static,
    {
        if let Ok(mut callbacks) = self.callbacks.write() {
            callbacks.push(Box::new(callback));
        }
    }

    /// Add async event callback; failures are collected by `dispatch`
    pub fn add_async_callback<F, Fut>(&self, callback: F)
    where
        F: Fn(QueryEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let callback: EventCallback = Arc::new(move |event| callback(event).boxed());
        if let Ok(mut callbacks) = self.async_callbacks.write() {
            callbacks.push(callback);
        }
    }

    /// Emit event to all synchronous subscribers
    pub fn emit(&self, event: &QueryEvent) {
        if let Ok(callbacks) = self.callbacks.read() {
            for callback in callbacks.iter() {
                callback(event);
            }
        }
    }

    /// Emit event to synchronous subscribers, then await async subscribers in order
    pub async fn dispatch(&self, event: QueryEvent) -> Vec<EventProcessingError> {
        self.emit(&event);

        // Clone the handles so no lock is held across an await
        let async_callbacks: Vec<EventCallback> = self
            .async_callbacks
            .read()
            .map(|callbacks| callbacks.clone())
            .unwrap_or_default();

        let mut errors = Vec::new();
        for (callback_index, callback) in async_callbacks.iter().enumerate() {
            if let Err(error) = callback(event.clone()).await {
                tracing::warn!(
                    callback_index,
                    event_type = ?event.event_type,
                    "event callback failed: {error:#}"
                );
                errors.push(EventProcessingError {
                    callback_index,
                    error,
                });
            }
        }
        errors
    }

    /// Clear all callbacks
    pub fn clear_callbacks(&self) {
        if let Ok(mut callbacks) = self.callbacks.write() {
            callbacks.clear();
        }
        if let Ok(mut callbacks) = self.async_callbacks.write() {
            callbacks.clear();
        }
    }

    /// Get number of registered callbacks
    pub fn callback_count(&self) -> usize {
        let sync = self.callbacks.read().map(|c| c.len()).unwrap_or(0);
        let async_ = self.async_callbacks.read().map(|c| c.len()).unwrap_or(0);
        sync + async_
    }
}

impl Default for SignalManager {
    fn default() -> Self {
        Self::new()
    }
}
