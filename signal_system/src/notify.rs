//! User-facing notifications
//!
//! Fetch errors can fire several times in quick succession while retries
//! run. `DebouncedNotifier` collapses a burst into the last message.

use config::NotifyConfig;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// A message shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Sink for user-facing messages
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NotificationLevel, message: &str);
}

/// Writes notifications to the tracing subscriber
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, level: NotificationLevel, message: &str) {
        match level {
            NotificationLevel::Info => tracing::info!(target: "tablehaus::notify", "{message}"),
            NotificationLevel::Warning => tracing::warn!(target: "tablehaus::notify", "{message}"),
            NotificationLevel::Error => tracing::error!(target: "tablehaus::notify", "{message}"),
        }
    }
}

/// Buffers notifications for a presentation layer to drain
#[derive(Debug, Default)]
pub struct NotificationQueue {
    items: Mutex<Vec<Notification>>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all pending notifications
    pub fn drain(&self) -> Vec<Notification> {
        self.items
            .lock()
            .map(|mut items| std::mem::take(&mut *items))
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.items.lock().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for NotificationQueue {
    fn notify(&self, level: NotificationLevel, message: &str) {
        if let Ok(mut items) = self.items.lock() {
            items.push(Notification {
                level,
                message: message.to_string(),
            });
        }
    }
}

#[derive(Debug, Default)]
struct DebounceState {
    generation: u64,
    pending: Option<Notification>,
}

/// Trailing-edge debounce in front of another notifier
#[derive(Clone)]
pub struct DebouncedNotifier {
    inner: Arc<dyn Notifier>,
    delay: Duration,
    state: Arc<Mutex<DebounceState>>,
}

impl std::fmt::Debug for DebouncedNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebouncedNotifier")
            .field("delay", &self.delay)
            .field("pending", &self.has_pending())
            .finish()
    }
}

impl DebouncedNotifier {
    pub fn new(inner: Arc<dyn Notifier>, delay: Duration) -> Self {
        Self {
            inner,
            delay,
            state: Arc::new(Mutex::new(DebounceState::default())),
        }
    }

    pub fn from_config(inner: Arc<dyn Notifier>, config: &NotifyConfig) -> Self {
        Self::new(inner, config.debounce())
    }

    pub fn has_pending(&self) -> bool {
        self.state
            .lock()
            .map(|state| state.pending.is_some())
            .unwrap_or(false)
    }

    /// Deliver the pending notification now
    pub fn flush(&self) {
        let pending = match self.state.lock() {
            Ok(mut state) => {
                state.generation += 1;
                state.pending.take()
            }
            Err(_) => None,
        };

        if let Some(notification) = pending {
            self.inner.notify(notification.level, &notification.message);
        }
    }

    fn deliver_if_current(&self, generation: u64) {
        let pending = match self.state.lock() {
            Ok(mut state) if state.generation == generation => state.pending.take(),
            _ => None,
        };

        if let Some(notification) = pending {
            self.inner.notify(notification.level, &notification.message);
        }
    }
}

impl Notifier for DebouncedNotifier {
    fn notify(&self, level: NotificationLevel, message: &str) {
        let generation = match self.state.lock() {
            Ok(mut state) => {
                state.generation += 1;
                state.pending = Some(Notification {
                    level,
                    message: message.to_string(),
                });
                state.generation
            }
            Err(_) => return,
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let this = self.clone();
                handle.spawn(async move {
                    tokio::time::sleep(this.delay).await;
                    this.deliver_if_current(generation);
                });
            }
            // Outside a runtime there is no timer to wait on
            Err(_) => self.deliver_if_current(generation),
        }
    }
}
