//! Core TableHaus functionality
//!
//! This module contains the main TableHaus struct and its implementation,
//! providing centralized coordination of table pages, caching, and signals.

use std::collections::HashMap;
use std::sync::Arc;

use cache_system::CacheManager;
use config::AppConfig;
use signal_system::{Notifier, SignalManager, TracingNotifier};
use table_query::DataFetcher;

use crate::errors::TableHausError;
use crate::page::{TablePage, TablePageBuilder};

/// Main TableHaus coordinator that owns the shared cache and the named table pages
pub struct TableHaus {
    config: AppConfig,
    cache: Arc<CacheManager>,
    signals: Arc<SignalManager>,
    notifier: Arc<dyn Notifier>,
    pages: HashMap<String, Arc<TablePage>>,
}

impl std::fmt::Debug for TableHaus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableHaus")
            .field("cache_backend", &self.cache.backend_name())
            .field("pages", &self.pages.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl TableHaus {
    /// Create new TableHaus with the configured cache backend
    pub fn new(config: AppConfig) -> Result<Self, TableHausError> {
        config.validate()?;
        let cache = Arc::new(CacheManager::new(config.cache.clone())?);

        tracing::debug!(backend = cache.backend_name(), "tablehaus initialized");

        Ok(Self {
            config,
            cache,
            signals: Arc::new(SignalManager::new()),
            notifier: Arc::new(TracingNotifier),
            pages: HashMap::new(),
        })
    }

    /// Create from `.env`, `TABLEHAUS_CONFIG` or `./tablehaus.toml`
    pub fn from_env() -> Result<Self, TableHausError> {
        Self::new(AppConfig::load()?)
    }

    /// Route user-facing notifications of every page built afterwards
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<CacheManager> {
        &self.cache
    }

    pub fn signals(&self) -> &Arc<SignalManager> {
        &self.signals
    }

    /// Page builder wired to the shared cache, signals and notifier
    pub fn page(&self, name: &str, fetcher: Arc<dyn DataFetcher>) -> TablePageBuilder {
        TablePageBuilder::new(name, fetcher)
            .config(&self.config)
            .cache_manager(self.cache.clone())
            .signals(self.signals.clone())
            .notifier(self.notifier.clone())
    }

    /// Register a page under its own name
    pub fn register_page(&mut self, page: TablePage) -> Result<Arc<TablePage>, TableHausError> {
        let name = page.name().to_string();
        if self.pages.contains_key(&name) {
            return Err(TableHausError::PageAlreadyRegistered(name));
        }

        let page = Arc::new(page);
        self.pages.insert(name, page.clone());
        Ok(page)
    }

    /// Get a registered page by name
    pub fn get_page(&self, name: &str) -> Result<Arc<TablePage>, TableHausError> {
        self.pages
            .get(name)
            .cloned()
            .ok_or_else(|| TableHausError::PageNotFound(name.to_string()))
    }

    /// List all registered page names
    pub fn list_pages(&self) -> Vec<&String> {
        self.pages.keys().collect()
    }

    /// Remove a page by name; its cached entries stay until they expire
    pub fn unregister_page(&mut self, name: &str) -> Result<(), TableHausError> {
        self.pages
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| TableHausError::PageNotFound(name.to_string()))
    }

    /// Check cache backend connectivity
    pub async fn health_check(&self) -> Result<(), TableHausError> {
        self.cache.ping().await?;
        Ok(())
    }
}
