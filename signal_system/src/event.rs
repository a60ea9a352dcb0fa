//! Query event types and definitions
//!
//! This module defines the structure of table query events
//! that flow through the signal system.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Query event type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    FetchStarted,
    FetchSucceeded,
    FetchFailed,
    RetryScheduled,
    RetriesExhausted,
    CacheHit,
    CacheInvalidated,
    Exported,
    PresetsLoaded,
    PresetAdded,
    PresetDeleted,
    PresetFailed,
}

/// Table query event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryEvent {
    /// Event type
    pub event_type: EventType,
    /// Table cache key (or preset kind for preset events)
    pub source: String,
    /// Failure counter for fetch events
    pub attempt: Option<u32>,
    /// User-facing message, if any
    pub message: Option<String>,
    /// Additional data
    pub payload: HashMap<String, Value>,
    /// Event timestamp (UTC)
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl QueryEvent {
    pub fn new(event_type: EventType, source: impl Into<String>) -> Self {
        Self {
            event_type,
            source: source.into(),
            attempt: None,
            message: None,
            payload: HashMap::new(),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn with_attempt(mut self, attempt: u32) -> Self {
        self.attempt = Some(attempt);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_payload(mut self, key: impl Into<String>, value: Value) -> Self {
        self.payload.insert(key.into(), value);
        self
    }

    pub fn add_payload(&mut self, key: impl Into<String>, value: Value) {
        self.payload.insert(key.into(), value);
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self.event_type,
            EventType::FetchFailed | EventType::RetriesExhausted | EventType::PresetFailed
        )
    }
}
