//! Cache parameter configuration
//!
//! This module defines the CacheParams struct
//! for configuring cache behavior per table.

use crate::CacheManager;
use std::sync::Arc;

/// Cache parameters for one table query
#[derive(Debug, Clone)]
pub struct CacheParams {
    /// The cache manager instance
    pub manager: Arc<CacheManager>,
    /// TTL for this table's entries in seconds
    pub ttl: u64,
    /// Leading key segment, also the bulk-invalidation prefix
    pub cache_key: String,
}

impl CacheParams {
    pub fn new(manager: Arc<CacheManager>, ttl: u64, cache_key: &str) -> Self {
        Self {
            ttl,
            cache_key: cache_key.to_string(),
            manager,
        }
    }

    /// Use the manager's default TTL
    pub fn with_default_ttl(manager: Arc<CacheManager>, cache_key: &str) -> Self {
        let ttl = manager.config().default_ttl;
        Self::new(manager, ttl, cache_key)
    }
}
