//! Convenience re-exports for common table-query usage

pub use crate::columns::{ColumnDescriptor, ColumnSource, ColumnState};
pub use crate::errors::{ColumnError, FetchError, PresetError, QueryError};
pub use crate::presets::{PresetEntry, PresetManager, PresetSnapshot};
pub use crate::query_builder::{
    FilterMap, PaginationMeta, QueryParams, SortOrder, Sorter, TableChange,
};
pub use crate::render::RenderContext;
pub use crate::table::{TableData, TableQuery};
pub use crate::traits::{Clock, DataFetcher, PresetSource};

// Common external dependencies
pub use async_trait::async_trait;
pub use serde_json;
