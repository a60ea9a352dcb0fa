//! Convenience re-exports for common TableHaus usage
//!
//! This prelude module re-exports the most commonly used items from the TableHaus ecosystem,
//! making it easier to import everything you need with a single use statement.
//!
//! # Example
//!
//! ```rust
//! use tablehaus::prelude::*;
//!
//! // Now you have access to all the common TableHaus types and traits
//! ```

// Core TableHaus components
pub use crate::core::TableHaus;
pub use crate::errors::TableHausError;
pub use crate::page::{TablePage, TablePageBuilder};

// Re-export centralized config
pub use config::{AppConfig, CacheBackend, CacheConfig, NotifyConfig, QueryConfig, RetryConfig};

// Re-export commonly used table-query types for convenience
pub use table_query::prelude::*;
pub use table_query::{filters_from_value, MemoryPresetSource};

// Re-export signal system for event handling
pub use signal_system::prelude::*;

// Re-export cache system
pub use cache_system::prelude::*;

// Re-export table derive for column declarations
pub use table_derive::TableColumns;

// Common external dependencies
pub use anyhow;
pub use tokio;
