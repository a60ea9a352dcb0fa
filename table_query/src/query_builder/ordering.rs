//! Table sorting
//!
//! The sorter travels to the fetcher as `sortField`/`sortOrder` and is part
//! of the cache key.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascend,
    Descend,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascend => "ascend",
            SortOrder::Descend => "descend",
        }
    }

    /// Parse a table widget order; anything unrecognized means unsorted
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ascend" | "asc" | "ASC" => Some(SortOrder::Ascend),
            "descend" | "desc" | "DESC" => Some(SortOrder::Descend),
            _ => None,
        }
    }
}

/// Active sort column and direction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sorter {
    pub column_key: String,
    pub order: SortOrder,
}

impl Sorter {
    pub fn new(column_key: impl Into<String>, order: SortOrder) -> Self {
        Self {
            column_key: column_key.into(),
            order,
        }
    }

    pub fn ascend(column_key: impl Into<String>) -> Self {
        Self::new(column_key, SortOrder::Ascend)
    }

    pub fn descend(column_key: impl Into<String>) -> Self {
        Self::new(column_key, SortOrder::Descend)
    }

    /// Build a sorter from widget output; a missing key or order clears sorting
    pub fn from_parts(column_key: Option<&str>, order: Option<&str>) -> Option<Self> {
        let column_key = column_key.filter(|key| !key.is_empty())?;
        let order = SortOrder::parse(order?)?;
        Some(Self::new(column_key, order))
    }
}
