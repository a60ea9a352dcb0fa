//! Signal system for table query event handling
//!
//! This crate provides event callbacks and user-facing notifications
//! for table queries and presets in the TableHaus ecosystem.

pub mod event;
pub mod manager;
pub mod notify;
pub mod prelude;
pub mod types;

pub use event::{EventType, QueryEvent};
pub use manager::SignalManager;
pub use notify::{
    DebouncedNotifier, Notification, NotificationLevel, NotificationQueue, Notifier,
    TracingNotifier,
};
pub use types::{EventCallback, EventProcessingError, SyncCallback};
