//! Table pages
//!
//! A `TablePage` bundles the query controller, the preset manager and the
//! column state of one screen, and sequences preset loading before the
//! first fetch.

use std::sync::Arc;

use config::AppConfig;
use cache_system::CacheManager;
use signal_system::{Notifier, SignalManager};
use table_query::{
    merge_filters, Clock, ColumnDescriptor, ColumnSource, DataFetcher, FetchError, FilterMap,
    PresetEntry, PresetError, PresetManager, PresetSource, RenderContext, TableData, TableQuery,
    TableQueryBuilder,
};

use crate::errors::TableHausError;

/// One table screen: query, presets and columns
#[derive(Debug)]
pub struct TablePage {
    name: String,
    query: TableQuery,
    presets: PresetManager,
}

impl TablePage {
    pub fn builder(name: &str, fetcher: Arc<dyn DataFetcher>) -> TablePageBuilder {
        TablePageBuilder::new(name, fetcher)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn query(&self) -> &TableQuery {
        &self.query
    }

    pub fn presets(&self) -> &PresetManager {
        &self.presets
    }

    /// Load presets, apply the default preset over the initial filters, then fetch
    ///
    /// A preset failure is already surfaced by the preset manager and does
    /// not stop the first fetch.
    pub async fn initialize(&self) -> Result<TableData, TableHausError> {
        let preset_filters = match self.presets.default_preset().await {
            Ok(Some(preset)) => {
                crate::debug_log!("[{}] applying default preset '{}'", self.name, preset.name);
                preset
                    .snapshot()
                    .map(|snapshot| snapshot.filters)
                    .unwrap_or_default()
            }
            Ok(None) => FilterMap::new(),
            Err(error) => {
                tracing::debug!(page = %self.name, "continuing without presets: {error}");
                FilterMap::new()
            }
        };

        let filters = merge_filters(self.query.initial_filters(), &preset_filters);
        self.query.submit_filters(filters).await;
        Ok(self.query.load().await?)
    }

    /// Submit a preset's filters and mark it as most recently used
    pub async fn apply_preset(&self, id: &str) -> Result<TableData, TableHausError> {
        self.presets.ensure_loaded().await?;
        let snapshot = self.presets.touch_preset(id).await?;

        self.query.submit_filters(snapshot.filters).await;
        Ok(self.query.load().await?)
    }

    /// Save the submitted filters as a preset; `None` when presets are disabled
    pub async fn save_preset(&self, name: &str) -> Result<Option<PresetEntry>, TableHausError> {
        let filters = self.query.submitted_filters().await;
        Ok(self.presets.add_preset(name, filters).await?)
    }

    pub async fn delete_preset(&self, id: &str) -> Result<bool, PresetError> {
        self.presets.delete_preset(id).await
    }

    /// Everything presentational code needs to draw this page
    pub async fn render_context(&self) -> Result<RenderContext, TableHausError> {
        Ok(RenderContext::collect(&self.query, &self.presets).await?)
    }
}

/// Builder for [`TablePage`]
pub struct TablePageBuilder {
    name: String,
    query: TableQueryBuilder,
    preset_kind: Option<String>,
    preset_source: Option<Arc<dyn PresetSource>>,
    notifier: Option<Arc<dyn Notifier>>,
    signals: Option<Arc<SignalManager>>,
    clock: Option<Arc<dyn Clock>>,
    fallback_message: String,
}

impl TablePageBuilder {
    /// The page name doubles as the cache key
    pub fn new(name: &str, fetcher: Arc<dyn DataFetcher>) -> Self {
        Self {
            name: name.to_string(),
            query: TableQuery::builder(name, fetcher),
            preset_kind: None,
            preset_source: None,
            notifier: None,
            signals: None,
            clock: None,
            fallback_message: config::NotifyConfig::default().fallback_message,
        }
    }

    pub fn config(mut self, config: &AppConfig) -> Self {
        self.fallback_message = config.notify.fallback_message.clone();
        self.query = self.query.config(config);
        self
    }

    pub fn cache_manager(mut self, manager: Arc<CacheManager>) -> Self {
        self.query = self.query.cache_manager(manager);
        self
    }

    pub fn cache_ttl(mut self, ttl: u64) -> Self {
        self.query = self.query.cache_ttl(ttl);
        self
    }

    pub fn signals(mut self, signals: Arc<SignalManager>) -> Self {
        self.signals = Some(signals.clone());
        self.query = self.query.signals(signals);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier.clone());
        self.query = self.query.notifier(notifier);
        self
    }

    pub fn on_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&FetchError) + Send + Sync + 'static,
    {
        self.query = self.query.on_error(callback);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock.clone());
        self.query = self.query.clock(clock);
        self
    }

    pub fn initial_filters(mut self, filters: FilterMap) -> Self {
        self.query = self.query.initial_filters(filters);
        self
    }

    pub fn columns(mut self, columns: Vec<ColumnDescriptor>) -> Self {
        self.query = self.query.columns(columns);
        self
    }

    /// Columns declared with `#[derive(TableColumns)]`
    pub fn columns_from<T: ColumnSource>(self) -> Self {
        self.columns(T::column_descriptors())
    }

    /// Enable saved presets of `kind`
    pub fn presets(mut self, kind: &str, source: Arc<dyn PresetSource>) -> Self {
        self.preset_kind = Some(kind.to_string());
        self.preset_source = Some(source);
        self
    }

    pub fn build(self) -> Result<TablePage, TableHausError> {
        let query = self.query.build()?;

        let mut presets = PresetManager::new(self.preset_kind, self.preset_source)
            .with_fallback_message(self.fallback_message);
        if let Some(notifier) = self.notifier {
            presets = presets.with_notifier(notifier);
        }
        if let Some(signals) = self.signals {
            presets = presets.with_signals(signals);
        }
        if let Some(clock) = self.clock {
            presets = presets.with_clock(clock);
        }

        Ok(TablePage {
            name: self.name,
            query,
            presets,
        })
    }
}
