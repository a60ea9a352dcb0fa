//! Table Query - data-table state and fetching for Tablehaus
//!
//! This crate provides the query state machine behind a table page
//! (filters, pagination, sorting, cache keys, retry and suppression),
//! column state, saved filter presets and the render context handed to
//! presentational code.

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

pub mod columns;
pub mod errors;
pub mod prelude;
pub mod presets;
pub mod query_builder;
pub mod render;
pub mod state;
pub mod table;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod traits;

pub use columns::{ColumnDescriptor, ColumnSource, ColumnState};
pub use errors::{ColumnError, FetchError, PresetError, QueryError};
pub use presets::{
    select_default_preset, MemoryPresetSource, PresetEntry, PresetManager, PresetSnapshot,
};
pub use query_builder::{
    filters_from_value, filters_to_value, merge_filters, FilterMap, PaginationMeta, QueryParams,
    SortOrder, Sorter, TableChange, EXPORT_PAGE_SIZE,
};
pub use render::RenderContext;
pub use state::{stale_window_key, QueryState};
pub use table::{ErrorCallback, TableData, TableQuery, TableQueryBuilder};
pub use traits::{Clock, DataFetcher, ManualClock, PresetSource, SystemClock};
