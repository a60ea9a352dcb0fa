//! Cache-first loading with retry and suppression

use crate::errors::{FetchError, QueryError};
use crate::query_builder::QueryParams;
use crate::table::core::{InFlightGuard, TableData, TableQuery};
use cache_system::CacheKey;
use serde_json::Value;
use signal_system::{EventType, NotificationLevel, QueryEvent};

impl TableQuery {
    /// Cached data for the current key, fetching on a miss
    ///
    /// Returns empty data without fetching while suppressed.
    pub async fn load(&self) -> Result<TableData, QueryError> {
        let Some((key, params)) = self.snapshot_request().await else {
            crate::debug_log!("[{}] fetching suppressed", self.cache.cache_key);
            return Ok(TableData::default());
        };

        match self.cache.manager.get_entry(&key).await {
            Ok(Some(raw)) => {
                crate::trace_log!("[{}] cache hit {}", self.cache.cache_key, key);
                self.emit(QueryEvent::new(EventType::CacheHit, self.cache.cache_key.as_str()))
                    .await;
                return Ok(TableData::from_raw(&raw, true));
            }
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(cache_key = %self.cache.cache_key, "cache read failed: {error}");
            }
        }

        self.fetch_with_retry(key, params).await
    }

    /// Fetch the current key even if it is cached
    pub async fn revalidate(&self) -> Result<TableData, QueryError> {
        let Some((key, params)) = self.snapshot_request().await else {
            return Ok(TableData::default());
        };
        self.fetch_with_retry(key, params).await
    }

    /// Key and params read under one lock
    async fn snapshot_request(&self) -> Option<(CacheKey, QueryParams)> {
        let state = self.state.read().await;
        state
            .cache_key(&self.cache.cache_key)
            .map(|key| (key, state.params()))
    }

    async fn is_current(&self, key: &CacheKey) -> bool {
        self.cache_key().await.as_ref() == Some(key)
    }

    async fn fetch_with_retry(
        &self,
        key: CacheKey,
        params: QueryParams,
    ) -> Result<TableData, QueryError> {
        let _in_flight = InFlightGuard::new(&self.in_flight);
        let limit = self.retry_config.error_retry_count;
        let mut failures: u32 = 0;

        loop {
            let attempt = failures + 1;
            self.emit(
                QueryEvent::new(EventType::FetchStarted, self.cache.cache_key.as_str())
                    .with_attempt(attempt),
            )
            .await;

            let error = match self.fetcher.fetch(&params).await {
                Ok(raw) => return Ok(self.store_success(&key, raw, attempt).await),
                Err(error) => error,
            };

            failures += 1;
            self.report_failure(&error, attempt).await;

            if failures >= limit {
                return Err(self.exhaust(&key, failures, error).await);
            }

            {
                let mut state = self.state.write().await;
                if state.cache_key(&self.cache.cache_key).as_ref() == Some(&key) {
                    state.begin_retry();
                }
            }
            self.emit(
                QueryEvent::new(EventType::RetryScheduled, self.cache.cache_key.as_str())
                    .with_attempt(attempt + 1),
            )
            .await;
            tracing::debug!(
                cache_key = %self.cache.cache_key,
                failures,
                "retrying in {:?}",
                self.retry_interval()
            );

            tokio::time::sleep(self.retry_interval()).await;

            if !self.is_current(&key).await {
                self.state.write().await.end_retry();
                crate::debug_log!("[{}] retry superseded by a newer query", self.cache.cache_key);
                return Err(QueryError::Superseded);
            }
        }
    }

    async fn store_success(&self, key: &CacheKey, raw: Value, attempt: u32) -> TableData {
        if let Err(error) = self
            .cache
            .manager
            .set_entry_with_ttl(key, &raw, self.cache.ttl)
            .await
        {
            tracing::warn!(cache_key = %self.cache.cache_key, "cache write failed: {error}");
        }

        {
            let mut state = self.state.write().await;
            if state.cache_key(&self.cache.cache_key).as_ref() == Some(key) {
                state.end_retry();
            }
        }
        *self.last_error.write().await = None;

        let data = TableData::from_raw(&raw, false);
        self.emit(
            QueryEvent::new(EventType::FetchSucceeded, self.cache.cache_key.as_str())
                .with_attempt(attempt)
                .with_payload("rows", Value::from(data.rows.len()))
                .with_payload("total", Value::from(data.total)),
        )
        .await;
        data
    }

    /// Clear the prefix and stop fetching until the next submit or reset
    ///
    /// A failure for a key that is no longer current leaves the cache and
    /// state alone and reports `Superseded`.
    async fn exhaust(&self, key: &CacheKey, attempts: u32, error: FetchError) -> QueryError {
        let invalidated = {
            let mut state = self.state.write().await;
            if state.cache_key(&self.cache.cache_key).as_ref() != Some(key) {
                crate::debug_log!(
                    "[{}] exhausted retries for a superseded key",
                    self.cache.cache_key
                );
                return QueryError::Superseded;
            }

            let invalidated = self
                .cache
                .manager
                .invalidate_prefix(&self.cache.cache_key)
                .await;
            state.suppress();
            invalidated
        };

        match invalidated {
            Ok(deleted) => {
                self.emit(
                    QueryEvent::new(EventType::CacheInvalidated, self.cache.cache_key.as_str())
                        .with_payload("deleted", Value::from(deleted)),
                )
                .await;
            }
            Err(cache_error) => {
                tracing::warn!(
                    cache_key = %self.cache.cache_key,
                    "cache invalidation failed: {cache_error}"
                );
            }
        }

        tracing::warn!(
            cache_key = %self.cache.cache_key,
            attempts,
            "retries exhausted, fetching suppressed"
        );
        self.emit(
            QueryEvent::new(EventType::RetriesExhausted, self.cache.cache_key.as_str())
                .with_attempt(attempts)
                .with_message(error.user_message(&self.fallback_message)),
        )
        .await;

        QueryError::RetriesExhausted {
            attempts,
            source: error,
        }
    }

    /// Debounced notification, error callback, last error and event
    pub(crate) async fn report_failure(&self, error: &FetchError, attempt: u32) {
        let message = error.user_message(&self.fallback_message);
        tracing::warn!(cache_key = %self.cache.cache_key, attempt, "fetch failed: {error}");

        self.notifier.notify(NotificationLevel::Error, &message);
        if let Some(callback) = &self.on_error {
            callback(error);
        }
        *self.last_error.write().await = Some(message.clone());

        let mut event = QueryEvent::new(EventType::FetchFailed, self.cache.cache_key.as_str())
            .with_attempt(attempt)
            .with_message(message);
        if let Some(status) = error.status {
            event.add_payload("status", Value::from(status));
        }
        self.emit(event).await;
    }
}
