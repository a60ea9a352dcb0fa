//! Table query state machine
//!
//! `QueryState` changes only through the transition methods below. Every
//! transition that alters a key component produces a new cache key, which is
//! what forces a refetch.

use crate::query_builder::{FilterMap, QueryParams, Sorter, TableChange};
use cache_system::CacheKey;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use value_mapping::{canonical_json, prune_filters};

/// Coarse time bucket mixed into cache keys
pub fn stale_window_key(now_millis: i64, window: Duration) -> i64 {
    let window_millis = i64::try_from(window.as_millis()).unwrap_or(i64::MAX).max(1);
    now_millis.div_euclid(window_millis)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryState {
    pub page: u32,
    pub page_size: u32,
    pub submitted_filters: FilterMap,
    pub sorter: Option<Sorter>,
    pub stale_window_key: i64,
    /// Set once retries are exhausted; no key, no fetch
    pub cache_suppressed: bool,
    pub retrying: bool,
}

impl QueryState {
    pub fn new(page_size: u32, filters: FilterMap, stale_window_key: i64) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            submitted_filters: prune_filters(filters),
            sorter: None,
            stale_window_key,
            cache_suppressed: false,
            retrying: false,
        }
    }

    /// New filters from the filter form
    pub fn submit_filters(&mut self, filters: FilterMap, stale_window_key: i64) {
        self.submitted_filters = prune_filters(filters);
        self.page = 1;
        self.stale_window_key = stale_window_key;
        self.cache_suppressed = false;
        self.retrying = false;
    }

    /// Page, size and sorter from the table widget
    pub fn handle_table_change(&mut self, change: TableChange) {
        self.change_page(change.current, change.page_size);
        self.sorter = change.sorter;
    }

    /// Pagination widget change; a zero size keeps the current one
    pub fn change_page(&mut self, page: u32, page_size: u32) {
        self.page = page.max(1);
        if page_size > 0 {
            self.page_size = page_size;
        }
    }

    /// Back to the initial filters on the first page, unsorted, fetching again
    pub fn reset(&mut self, initial_filters: FilterMap, page_size: u32, stale_window_key: i64) {
        *self = Self::new(page_size, initial_filters, stale_window_key);
    }

    pub fn begin_retry(&mut self) {
        self.retrying = true;
    }

    pub fn end_retry(&mut self) {
        self.retrying = false;
    }

    /// Stop fetching until the next submit or reset
    pub fn suppress(&mut self) {
        self.cache_suppressed = true;
        self.retrying = false;
    }

    /// Parameters for the current page
    pub fn params(&self) -> QueryParams {
        QueryParams::new(self.page, self.page_size)
            .filters(self.submitted_filters.clone())
            .sorter(self.sorter.clone())
    }

    /// Composite key for the current state, `None` while suppressed
    pub fn cache_key(&self, cache_key: &str) -> Option<CacheKey> {
        if self.cache_suppressed {
            return None;
        }

        let filters = Value::Object(
            self.submitted_filters
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        );
        let sorter = serde_json::to_value(&self.sorter).unwrap_or(Value::Null);

        Some(CacheKey {
            cache_key: cache_key.to_string(),
            page: self.page,
            page_size: self.page_size,
            filters: canonical_json(&filters),
            sorter: canonical_json(&sorter),
            stale_window: self.stale_window_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_builder::filters_from_value;
    use serde_json::json;

    const FIVE_MINUTES: Duration = Duration::from_secs(300);

    fn state() -> QueryState {
        QueryState::new(10, filters_from_value(json!({ "status": "open" })), 1)
    }

    #[test]
    fn test_stale_window_buckets() {
        assert_eq!(stale_window_key(0, FIVE_MINUTES), 0);
        assert_eq!(stale_window_key(299_999, FIVE_MINUTES), 0);
        assert_eq!(stale_window_key(300_000, FIVE_MINUTES), 1);
        assert_eq!(stale_window_key(-1, FIVE_MINUTES), -1);
        assert_eq!(stale_window_key(5, Duration::ZERO), 5);
    }

    #[test]
    fn test_submit_resets_page_and_suppression() {
        let mut state = state();
        state.change_page(4, 20);
        state.begin_retry();
        state.suppress();
        assert!(state.cache_key("orders").is_none());

        state.submit_filters(filters_from_value(json!({ "status": "closed", "q": "" })), 9);

        assert_eq!(state.page, 1);
        assert_eq!(state.page_size, 20);
        assert_eq!(state.stale_window_key, 9);
        assert!(!state.cache_suppressed);
        assert!(!state.retrying);
        assert_eq!(state.submitted_filters.len(), 1);
        assert!(state.cache_key("orders").is_some());
    }

    #[test]
    fn test_every_component_changes_the_key() {
        let base = state();
        let key = base.cache_key("orders").unwrap();

        let mut paged = base.clone();
        paged.change_page(2, 10);
        assert_ne!(paged.cache_key("orders").unwrap(), key);

        let mut resized = base.clone();
        resized.change_page(1, 50);
        assert_ne!(resized.cache_key("orders").unwrap(), key);

        let mut sorted = base.clone();
        sorted.handle_table_change(TableChange::new(1, 10).with_sorter(Sorter::ascend("name")));
        assert_ne!(sorted.cache_key("orders").unwrap(), key);

        let mut later = base.clone();
        later.submit_filters(base.submitted_filters.clone(), 2);
        assert_ne!(later.cache_key("orders").unwrap(), key);

        let mut same = base.clone();
        same.submit_filters(base.submitted_filters.clone(), 1);
        assert_eq!(same.cache_key("orders").unwrap(), key);
    }

    #[test]
    fn test_table_change_clears_sorter() {
        let mut state = state();
        state.handle_table_change(TableChange::new(2, 10).with_sorter(Sorter::descend("amount")));
        assert_eq!(state.sorter, Some(Sorter::descend("amount")));

        state.handle_table_change(TableChange::new(2, 10));
        assert_eq!(state.sorter, None);
        assert_eq!(state.page, 2);
    }

    #[test]
    fn test_change_page_guards() {
        let mut state = state();
        state.change_page(0, 0);
        assert_eq!(state.page, 1);
        assert_eq!(state.page_size, 10);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut state = state();
        state.handle_table_change(TableChange::new(5, 50).with_sorter(Sorter::ascend("name")));
        state.suppress();

        state.reset(FilterMap::new(), 10, 3);
        assert_eq!(state, QueryState::new(10, FilterMap::new(), 3));
    }

    #[test]
    fn test_key_serialization_is_stable() {
        let state = state();
        let key = state.cache_key("orders").unwrap();
        assert_eq!(key.filters, r#"{"status":"open"}"#);
        assert_eq!(key.sorter, "null");
    }
}
