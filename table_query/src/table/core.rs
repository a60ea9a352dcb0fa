use crate::columns::{ColumnDescriptor, ColumnState};
use crate::errors::{FetchError, QueryError};
use crate::query_builder::{FilterMap, PaginationMeta, TableChange};
use crate::state::{stale_window_key, QueryState};
use crate::traits::{Clock, DataFetcher, SystemClock};
use cache_system::key::KEY_SEPARATOR;
use cache_system::{CacheKey, CacheManager, CacheParams};
use config::{AppConfig, QueryConfig, RetryConfig};
use serde::Serialize;
use serde_json::Value;
use signal_system::{DebouncedNotifier, Notifier, QueryEvent, SignalManager, TracingNotifier};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use value_mapping::{normalize_response, prune_filters};

/// Called with every fetch failure, retries included
pub type ErrorCallback = Arc<dyn Fn(&FetchError) + Send + Sync>;

/// Rows and total for one page
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableData {
    pub rows: Vec<Value>,
    pub total: u64,
    /// Served from the cache without calling the fetcher
    pub from_cache: bool,
}

impl TableData {
    pub fn from_raw(raw: &Value, from_cache: bool) -> Self {
        let normalized = normalize_response(raw);
        Self {
            rows: normalized.rows,
            total: normalized.total,
            from_cache,
        }
    }
}

/// Data-table query controller: filters, pagination, sorting, caching and retry
pub struct TableQuery {
    pub(crate) fetcher: Arc<dyn DataFetcher>,
    pub(crate) cache: CacheParams,
    pub(crate) signals: Option<Arc<SignalManager>>,
    pub(crate) notifier: Arc<dyn Notifier>,
    pub(crate) on_error: Option<ErrorCallback>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) query_config: QueryConfig,
    pub(crate) retry_config: RetryConfig,
    pub(crate) fallback_message: String,
    pub(crate) initial_filters: FilterMap,
    pub(crate) state: RwLock<QueryState>,
    pub(crate) columns: RwLock<ColumnState>,
    pub(crate) in_flight: AtomicUsize,
    pub(crate) last_error: RwLock<Option<String>>,
}

impl std::fmt::Debug for TableQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableQuery")
            .field("cache_key", &self.cache.cache_key)
            .field("has_signals", &self.signals.is_some())
            .field("has_error_callback", &self.on_error.is_some())
            .field("in_flight", &self.in_flight.load(Ordering::SeqCst))
            .finish()
    }
}

/// Marks a fetch as in flight for its lifetime
pub(crate) struct InFlightGuard<'a> {
    counter: &'a AtomicUsize,
}

impl<'a> InFlightGuard<'a> {
    pub(crate) fn new(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self { counter }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

impl TableQuery {
    pub fn builder(cache_key: &str, fetcher: Arc<dyn DataFetcher>) -> TableQueryBuilder {
        TableQueryBuilder::new(cache_key, fetcher)
    }

    pub fn cache_key_prefix(&self) -> &str {
        &self.cache.cache_key
    }

    pub(crate) fn stale_window_now(&self) -> i64 {
        stale_window_key(self.clock.now_millis(), self.query_config.stale_window())
    }

    /// Current composite cache key; `None` while fetching is suppressed
    pub async fn cache_key(&self) -> Option<CacheKey> {
        self.state.read().await.cache_key(&self.cache.cache_key)
    }

    /// Snapshot of the query state
    pub async fn state(&self) -> QueryState {
        self.state.read().await.clone()
    }

    pub async fn submitted_filters(&self) -> FilterMap {
        self.state.read().await.submitted_filters.clone()
    }

    pub fn initial_filters(&self) -> &FilterMap {
        &self.initial_filters
    }

    /// Apply new filters: first page, fresh stale window, fetching re-enabled
    pub async fn submit_filters(&self, filters: FilterMap) {
        let stale_window = self.stale_window_now();
        let mut state = self.state.write().await;
        state.submit_filters(filters, stale_window);

        crate::debug_log!(
            "[{}] submitted {} filter(s), stale window {}",
            self.cache.cache_key,
            state.submitted_filters.len(),
            stale_window
        );
    }

    /// Page, size and sorter change from the table widget
    pub async fn handle_table_change(&self, change: TableChange) {
        self.state.write().await.handle_table_change(change);
    }

    /// Pagination widget change
    pub async fn change_page(&self, page: u32, page_size: u32) {
        self.state.write().await.change_page(page, page_size);
    }

    /// Restore initial filters and pagination, re-enabling fetching
    pub async fn reset(&self) {
        let stale_window = self.stale_window_now();
        self.state.write().await.reset(
            self.initial_filters.clone(),
            self.query_config.default_page_size,
            stale_window,
        );
        *self.last_error.write().await = None;
    }

    /// Normalized rows of the current key's cached response
    pub async fn data_source(&self) -> Result<Vec<Value>, QueryError> {
        Ok(self.current_data().await?.rows)
    }

    /// Cached data for the current key, empty when absent or suppressed
    pub async fn current_data(&self) -> Result<TableData, QueryError> {
        let Some(key) = self.cache_key().await else {
            return Ok(TableData::default());
        };

        Ok(self
            .cache
            .manager
            .get_entry(&key)
            .await?
            .map(|raw| TableData::from_raw(&raw, true))
            .unwrap_or_default())
    }

    /// Pagination metadata for the current page
    pub async fn pagination(&self) -> Result<PaginationMeta, QueryError> {
        let total = self.current_data().await?.total;
        let state = self.state.read().await;

        Ok(PaginationMeta {
            current: state.page,
            page_size: state.page_size,
            total,
            page_size_options: self.query_config.page_size_options.clone(),
        })
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub async fn is_retrying(&self) -> bool {
        self.state.read().await.retrying
    }

    pub async fn is_suppressed(&self) -> bool {
        self.state.read().await.cache_suppressed
    }

    /// Message of the most recent failure, cleared by a success or reset
    pub async fn last_error(&self) -> Option<String> {
        self.last_error.read().await.clone()
    }

    /// Column state; not part of the cache key
    pub async fn columns(&self) -> RwLockReadGuard<'_, ColumnState> {
        self.columns.read().await
    }

    pub async fn columns_mut(&self) -> RwLockWriteGuard<'_, ColumnState> {
        self.columns.write().await
    }

    pub async fn visible_columns(&self) -> Vec<ColumnDescriptor> {
        self.columns.read().await.visible()
    }

    pub(crate) async fn emit(&self, event: QueryEvent) {
        if let Some(signals) = &self.signals {
            signals.dispatch(event).await;
        }
    }
}

/// Builder for [`TableQuery`]
pub struct TableQueryBuilder {
    cache_key: String,
    fetcher: Arc<dyn DataFetcher>,
    config: AppConfig,
    cache_manager: Option<Arc<CacheManager>>,
    cache_ttl: Option<u64>,
    signals: Option<Arc<SignalManager>>,
    notifier: Option<Arc<dyn Notifier>>,
    on_error: Option<ErrorCallback>,
    clock: Option<Arc<dyn Clock>>,
    initial_filters: FilterMap,
    columns: Vec<ColumnDescriptor>,
}

impl TableQueryBuilder {
    pub fn new(cache_key: &str, fetcher: Arc<dyn DataFetcher>) -> Self {
        Self {
            cache_key: cache_key.to_string(),
            fetcher,
            config: AppConfig::default(),
            cache_manager: None,
            cache_ttl: None,
            signals: None,
            notifier: None,
            on_error: None,
            clock: None,
            initial_filters: FilterMap::new(),
            columns: Vec::new(),
        }
    }

    pub fn config(mut self, config: &AppConfig) -> Self {
        self.config = config.clone();
        self
    }

    /// Share a cache; without one the query gets a private cache from the config
    pub fn cache_manager(mut self, manager: Arc<CacheManager>) -> Self {
        self.cache_manager = Some(manager);
        self
    }

    pub fn cache_ttl(mut self, ttl: u64) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    pub fn signals(mut self, signals: Arc<SignalManager>) -> Self {
        self.signals = Some(signals);
        self
    }

    /// User-facing sink; it is always put behind the configured debounce
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn on_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&FetchError) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(callback));
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn initial_filters(mut self, filters: FilterMap) -> Self {
        self.initial_filters = filters;
        self
    }

    pub fn columns(mut self, columns: Vec<ColumnDescriptor>) -> Self {
        self.columns = columns;
        self
    }

    pub fn build(self) -> Result<TableQuery, QueryError> {
        if self.cache_key.is_empty() {
            return Err(QueryError::InvalidConfig(
                "cache key cannot be empty".to_string(),
            ));
        }
        if self.cache_key.contains(KEY_SEPARATOR) {
            return Err(QueryError::InvalidConfig(format!(
                "cache key '{}' cannot contain '{}'",
                self.cache_key, KEY_SEPARATOR
            )));
        }
        self.config
            .validate()
            .map_err(|e| QueryError::InvalidConfig(e.to_string()))?;

        let manager = match self.cache_manager {
            Some(manager) => manager,
            None => Arc::new(CacheManager::new(self.config.cache.clone())?),
        };
        let cache = match self.cache_ttl {
            Some(ttl) => CacheParams::new(manager, ttl, &self.cache_key),
            None => CacheParams::with_default_ttl(manager, &self.cache_key),
        };

        let notifier: Arc<dyn Notifier> = Arc::new(DebouncedNotifier::from_config(
            self.notifier.unwrap_or_else(|| Arc::new(TracingNotifier)),
            &self.config.notify,
        ));
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let columns = ColumnState::new(self.columns)
            .map_err(|e| QueryError::InvalidConfig(e.to_string()))?;

        let initial_filters = prune_filters(self.initial_filters);
        let stale_window = stale_window_key(
            clock.now_millis(),
            self.config.query.stale_window(),
        );
        let state = QueryState::new(
            self.config.query.default_page_size,
            initial_filters.clone(),
            stale_window,
        );

        Ok(TableQuery {
            fetcher: self.fetcher,
            cache,
            signals: self.signals,
            notifier,
            on_error: self.on_error,
            clock,
            query_config: self.config.query,
            retry_config: self.config.retry,
            fallback_message: self.config.notify.fallback_message,
            initial_filters,
            state: RwLock::new(state),
            columns: RwLock::new(columns),
            in_flight: AtomicUsize::new(0),
            last_error: RwLock::new(None),
        })
    }
}

impl TableQuery {
    pub(crate) fn retry_interval(&self) -> Duration {
        self.retry_config.interval()
    }
}
