//! # TableHaus
//!
//! Data-table page state for async Rust: cached, retrying table queries,
//! saved filter presets, column state and a render context for whatever
//! draws the table.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tablehaus::prelude::*;
//!
//! #[derive(TableColumns)]
//! #[table_columns(rename_all = "camelCase")]
//! pub struct OrderRow {
//!     pub id: u64,
//!     #[column(title = "Customer")]
//!     pub customer_name: String,
//!     #[column(hidden)]
//!     pub notes: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut tablehaus = TableHaus::new(AppConfig::default())?;
//!
//!     let fetcher = Arc::new(|params: QueryParams| async move {
//!         // Call the backend with `params.to_request()`
//!         Ok::<_, FetchError>(serde_json::json!({ "data": [], "total": 0 }))
//!     });
//!
//!     let page = tablehaus
//!         .page("orders", fetcher)
//!         .columns_from::<OrderRow>()
//!         .presets("orders", Arc::new(MemoryPresetSource::new()))
//!         .build()?;
//!     let page = tablehaus.register_page(page)?;
//!
//!     page.initialize().await?;
//!     let context = page.render_context().await?;
//!     println!("{} rows", context.data_source.len());
//!
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod core;
pub mod errors;
pub mod page;
pub mod prelude;

// Re-export the main public types for convenience
pub use self::core::TableHaus;
pub use errors::TableHausError;
pub use page::{TablePage, TablePageBuilder};

// Re-export centralized config
pub use config::{AppConfig, CacheBackend, CacheConfig, NotifyConfig, QueryConfig, RetryConfig};

// Re-export internal crates used by macros and public API
// These MUST be public for the generated macro code to work correctly
pub use table_query;
pub use table_derive;
pub use cache_system;
pub use signal_system;
pub use value_mapping;

// Re-export external dependencies used in public API
pub use async_trait;
