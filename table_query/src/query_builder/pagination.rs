//! Pagination types
//!
//! A page size of zero means "all rows" and is reserved for exports.

use crate::query_builder::ordering::Sorter;
use serde::{Deserialize, Serialize};

/// Page size requesting every row
pub const EXPORT_PAGE_SIZE: u32 = 0;

/// Change reported by the table widget (page, size, sorter)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableChange {
    pub current: u32,
    pub page_size: u32,
    /// `None` clears sorting
    pub sorter: Option<Sorter>,
}

impl TableChange {
    pub fn new(current: u32, page_size: u32) -> Self {
        Self {
            current,
            page_size,
            sorter: None,
        }
    }

    pub fn with_sorter(mut self, sorter: Sorter) -> Self {
        self.sorter = Some(sorter);
        self
    }
}

/// Pagination metadata handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub current: u32,
    pub page_size: u32,
    pub total: u64,
    pub page_size_options: Vec<u32>,
}

impl PaginationMeta {
    /// Number of pages, at least one
    pub fn page_count(&self) -> u64 {
        if self.page_size == 0 {
            return 1;
        }
        self.total.div_ceil(u64::from(self.page_size)).max(1)
    }

    /// Zero-based offset of the first row on the current page
    pub fn offset(&self) -> u64 {
        u64::from(self.current.saturating_sub(1)) * u64::from(self.page_size)
    }
}
