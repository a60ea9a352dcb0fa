use crate::errors::QueryError;
use crate::table::core::{InFlightGuard, TableData, TableQuery};
use serde_json::Value;
use signal_system::{EventType, QueryEvent};

impl TableQuery {
    /// Fetch every row for the current filters and sorter
    ///
    /// Ignores pagination, never touches the cache and is not retried.
    pub async fn export(&self) -> Result<TableData, QueryError> {
        let params = self.state.read().await.params().for_export();
        let _in_flight = InFlightGuard::new(&self.in_flight);

        match self.fetcher.fetch(&params).await {
            Ok(raw) => {
                let data = TableData::from_raw(&raw, false);
                self.emit(
                    QueryEvent::new(EventType::Exported, self.cache.cache_key.as_str())
                        .with_payload("rows", Value::from(data.rows.len())),
                )
                .await;
                Ok(data)
            }
            Err(error) => {
                self.report_failure(&error, 1).await;
                Err(QueryError::Fetch(error))
            }
        }
    }

    /// Drop every cached page of this table
    pub async fn clear_cache(&self) -> Result<usize, QueryError> {
        let deleted = self
            .cache
            .manager
            .invalidate_prefix(&self.cache.cache_key)
            .await?;

        self.emit(
            QueryEvent::new(EventType::CacheInvalidated, self.cache.cache_key.as_str())
                .with_payload("deleted", Value::from(deleted)),
        )
        .await;
        Ok(deleted)
    }
}
