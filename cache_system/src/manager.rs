//! Cache manager implementation
//!
//! This module provides the main CacheManager struct: key layout,
//! TTL handling and bulk invalidation on top of a `CacheStore` backend.

use crate::errors::CacheError;
use crate::key::CacheKey;
use crate::memory::MemoryStore;
use crate::redis_store::RedisStore;
use crate::store::CacheStore;
use config::{CacheBackend, CacheConfig};
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

/// Shared query cache
#[derive(Clone)]
pub struct CacheManager {
    store: Arc<dyn CacheStore>,
    config: Arc<CacheConfig>,
}

impl Debug for CacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheManager")
            .field("config", &self.config)
            .field("backend", &self.store.backend_name())
            .finish()
    }
}

impl CacheManager {
    /// Create a cache manager for the configured backend
    pub fn new(config: CacheConfig) -> Result<Self, CacheError> {
        let store: Arc<dyn CacheStore> = match config.backend {
            CacheBackend::Memory => Arc::new(MemoryStore::new()),
            CacheBackend::Redis => Arc::new(RedisStore::new(&config.redis_url)?),
        };

        Ok(Self::with_store(store, config))
    }

    /// Create an in-memory cache manager
    pub fn memory(config: CacheConfig) -> Self {
        Self::with_store(Arc::new(MemoryStore::new()), config)
    }

    /// Create a cache manager over a caller-supplied backend
    pub fn with_store(store: Arc<dyn CacheStore>, config: CacheConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// Generate the full storage key for an entry
    fn build_entry_key(&self, key: &CacheKey) -> String {
        format!("{}:{}", self.config.key_prefix, key.storage_key())
    }

    /// Generate the storage prefix shared by a table's entries
    fn build_table_prefix(&self, cache_key: &str) -> String {
        format!("{}:{}", self.config.key_prefix, CacheKey::prefix_of(cache_key))
    }

    /// Get a cached raw response
    pub async fn get_entry(&self, key: &CacheKey) -> Result<Option<Value>, CacheError> {
        let entry_key = self.build_entry_key(key);
        let value = self.store.get(&entry_key).await?;

        #[cfg(feature = "debug-logging")]
        tracing::trace!(key = %entry_key, hit = value.is_some(), "cache lookup");

        Ok(value)
    }

    /// Store a raw response with the default TTL
    pub async fn set_entry(&self, key: &CacheKey, value: &Value) -> Result<(), CacheError> {
        self.set_entry_with_ttl(key, value, self.config.default_ttl)
            .await
    }

    /// Store a raw response with a custom TTL in seconds
    pub async fn set_entry_with_ttl(
        &self,
        key: &CacheKey,
        value: &Value,
        ttl: u64,
    ) -> Result<(), CacheError> {
        if ttl == 0 {
            return Err(CacheError::InvalidTtl(ttl));
        }

        let entry_key = self.build_entry_key(key);
        self.store
            .set(&entry_key, value, Duration::from_secs(ttl))
            .await
    }

    /// Delete a single entry
    pub async fn delete_entry(&self, key: &CacheKey) -> Result<bool, CacheError> {
        let entry_key = self.build_entry_key(key);
        self.store.delete(&entry_key).await
    }

    /// Invalidate every entry whose key starts with `cache_key`
    pub async fn invalidate_prefix(&self, cache_key: &str) -> Result<usize, CacheError> {
        if cache_key.is_empty() {
            return Err(CacheError::InvalidKey(
                "cache key cannot be empty".to_string(),
            ));
        }

        let prefix = self.build_table_prefix(cache_key);
        let deleted = self.store.delete_prefix(&prefix).await?;

        tracing::debug!(cache_key, deleted, "invalidated cache prefix");
        Ok(deleted)
    }

    /// Check backend connectivity
    pub async fn ping(&self) -> Result<(), CacheError> {
        self.store.ping().await
    }

    /// Get current configuration
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }
}
