//! Convenience re-exports for common cache-system usage

// Core cache system components
pub use crate::errors::CacheError;
pub use crate::key::CacheKey;
pub use crate::manager::CacheManager;
pub use crate::memory::MemoryStore;
pub use crate::params::CacheParams;
pub use crate::redis_store::RedisStore;
pub use crate::store::CacheStore;

// Re-export centralized config
pub use config::{CacheBackend, CacheConfig};

// Common external dependencies
pub use async_trait::async_trait;
pub use redis;
pub use serde_json;
