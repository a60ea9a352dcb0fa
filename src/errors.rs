//! Error types for the TableHaus crate
//!
//! This module contains all error types that can be returned by TableHaus operations.

use cache_system::CacheError;
use config::ConfigError;
use table_query::{ColumnError, PresetError, QueryError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableHausError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Preset(#[from] PresetError),

    #[error(transparent)]
    Column(#[from] ColumnError),

    #[error("Table page not found: {0}")]
    PageNotFound(String),

    #[error("Table page already registered: {0}")]
    PageAlreadyRegistered(String),
}
