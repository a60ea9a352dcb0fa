//! Cache backend abstraction
//!
//! Backends deal in plain string keys; `CacheManager` owns key layout.

use crate::errors::CacheError;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Key/value substrate holding raw fetch responses
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Short backend name for diagnostics
    fn backend_name(&self) -> &'static str;

    async fn get(&self, key: &str) -> Result<Option<Value>, CacheError>;

    async fn set(&self, key: &str, value: &Value, ttl: Duration) -> Result<(), CacheError>;

    async fn delete(&self, key: &str) -> Result<bool, CacheError>;

    /// Delete every key starting with `prefix`, returning how many were removed
    async fn delete_prefix(&self, prefix: &str) -> Result<usize, CacheError>;

    async fn ping(&self) -> Result<(), CacheError>;
}
