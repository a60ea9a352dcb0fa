use crate::errors::FetchError;
use crate::query_builder::QueryParams;
use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;

/// Fetches one page of raw rows in any known response envelope
#[async_trait]
pub trait DataFetcher: Send + Sync {
    async fn fetch(&self, params: &QueryParams) -> Result<Value, FetchError>;
}

#[async_trait]
impl<F, Fut> DataFetcher for F
where
    F: Fn(QueryParams) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, FetchError>> + Send,
{
    async fn fetch(&self, params: &QueryParams) -> Result<Value, FetchError> {
        (self)(params.clone()).await
    }
}
