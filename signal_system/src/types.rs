//! Type definitions for signal system
//!
//! This module contains callback types used by the signal manager.

use crate::event::QueryEvent;
use futures::future::BoxFuture;
use std::sync::Arc;

/// Synchronous event callback
pub type SyncCallback = Box<dyn Fn(&QueryEvent) + Send + Sync>;

/// Async event callback type that returns a Result
pub type EventCallback =
    Arc<dyn Fn(QueryEvent) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// Event processing error
#[derive(Debug)]
pub struct EventProcessingError {
    pub callback_index: usize,
    pub error: anyhow::Error,
}
