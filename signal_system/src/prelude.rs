//! Convenience re-exports for common signal-system usage

// Core signal system components
pub use crate::event::{EventType, QueryEvent};
pub use crate::manager::SignalManager;
pub use crate::notify::{
    DebouncedNotifier, Notification, NotificationLevel, NotificationQueue, Notifier,
    TracingNotifier,
};
pub use crate::types::{EventCallback, EventProcessingError, SyncCallback};

// Common external dependencies
pub use serde_json;
pub use tokio;
