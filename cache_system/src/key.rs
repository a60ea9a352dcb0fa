//! Composite cache keys
//!
//! A table query result is reusable only while every component of its key
//! matches. The leading `cache_key` segment identifies the table and is the
//! unit of bulk invalidation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between key segments
pub const KEY_SEPARATOR: char = ':';

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub cache_key: String,
    pub page: u32,
    pub page_size: u32,
    /// Canonical JSON of the submitted filters
    pub filters: String,
    /// Canonical JSON of the sorter, `null` when unsorted
    pub sorter: String,
    pub stale_window: i64,
}

impl CacheKey {
    /// Storage key without the global prefix
    pub fn storage_key(&self) -> String {
        format!(
            "{}{sep}{}{sep}{}{sep}{}{sep}{}{sep}{}",
            self.cache_key,
            self.page,
            self.page_size,
            self.stale_window,
            self.sorter,
            self.filters,
            sep = KEY_SEPARATOR
        )
    }

    /// Prefix shared by every entry of a table
    pub fn prefix_of(cache_key: &str) -> String {
        format!("{}{}", cache_key, KEY_SEPARATOR)
    }

    /// Whether this key falls under the bulk-invalidation prefix of `cache_key`
    pub fn has_prefix(&self, cache_key: &str) -> bool {
        self.storage_key().starts_with(&Self::prefix_of(cache_key))
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.storage_key())
    }
}
