//! Cache system for table query results
//!
//! This crate provides the key/value substrate behind table queries:
//! composite cache keys, pluggable backends (in-memory and Redis)
//! and bulk prefix invalidation.

pub mod errors;
pub mod key;
pub mod manager;
pub mod memory;
pub mod params;
pub mod prelude;
pub mod redis_store;
pub mod store;

// Re-export centralized config
pub use config::{CacheBackend, CacheConfig};

pub use errors::CacheError;
pub use key::CacheKey;
pub use manager::CacheManager;
pub use memory::MemoryStore;
pub use params::CacheParams;
pub use redis_store::RedisStore;
pub use store::CacheStore;
