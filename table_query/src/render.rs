//! Render context
//!
//! Everything presentational code needs to draw a table page, read in one
//! pass. Rendering never mutates query state.

use crate::columns::ColumnDescriptor;
use crate::errors::QueryError;
use crate::presets::{select_default_preset, PresetEntry, PresetManager};
use crate::query_builder::{FilterMap, PaginationMeta, Sorter};
use crate::table::TableQuery;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderContext {
    pub data_source: Vec<Value>,
    pub columns: Vec<ColumnDescriptor>,
    pub pagination: PaginationMeta,
    pub sorter: Option<Sorter>,
    pub filters: FilterMap,
    pub loading: bool,
    pub retrying: bool,
    pub fetch_suppressed: bool,
    pub error: Option<String>,
    pub presets: Vec<PresetEntry>,
    pub presets_enabled: bool,
    pub default_preset_id: Option<String>,
}

impl RenderContext {
    /// Snapshot a query and its presets; presets are not loaded here
    pub async fn collect(query: &TableQuery, presets: &PresetManager) -> Result<Self, QueryError> {
        let data = query.current_data().await?;
        let pagination = query.pagination().await?;
        let state = query.state().await;
        let columns = query.visible_columns().await;

        let entries = presets.cached_presets().await;
        let default_preset_id = select_default_preset(&entries).map(|entry| entry.id.clone());

        Ok(Self {
            data_source: data.rows,
            columns,
            pagination,
            sorter: state.sorter,
            filters: state.submitted_filters,
            loading: query.is_loading(),
            retrying: state.retrying,
            fetch_suppressed: state.cache_suppressed,
            error: query.last_error().await,
            presets: entries,
            presets_enabled: presets.is_enabled(),
            default_preset_id,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.data_source.is_empty()
    }
}
