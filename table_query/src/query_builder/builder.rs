//! Fetch parameters
//!
//! This module provides the request handed to a `DataFetcher`.

use crate::query_builder::filter::FilterMap;
use crate::query_builder::ordering::Sorter;
use crate::query_builder::pagination::EXPORT_PAGE_SIZE;
use serde::Serialize;
use serde_json::{Map, Value};

/// Parameters for one fetch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryParams {
    pub page: u32,
    pub page_size: u32,
    pub filters: FilterMap,
    pub sorter: Option<Sorter>,
}

impl QueryParams {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            filters: FilterMap::new(),
            sorter: None,
        }
    }

    /// Replace the filters
    pub fn filters(mut self, filters: FilterMap) -> Self {
        self.filters = filters;
        self
    }

    /// Add a single filter
    pub fn filter(mut self, field: &str, value: Value) -> Self {
        self.filters.insert(field.to_string(), value);
        self
    }

    pub fn sorter(mut self, sorter: Option<Sorter>) -> Self {
        self.sorter = sorter;
        self
    }

    /// Same filters and sorter, first page, every row
    pub fn for_export(&self) -> Self {
        Self {
            page: 1,
            page_size: EXPORT_PAGE_SIZE,
            filters: self.filters.clone(),
            sorter: self.sorter.clone(),
        }
    }

    pub fn is_export(&self) -> bool {
        self.page_size == EXPORT_PAGE_SIZE
    }

    /// Flat request object: filters, then `current`, `pageSize`, `sortField`, `sortOrder`
    ///
    /// Reserved names win over filter fields of the same name.
    pub fn to_request(&self) -> Value {
        let mut request: Map<String, Value> = self
            .filters
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        request.insert("current".to_string(), Value::from(self.page));
        request.insert("pageSize".to_string(), Value::from(self.page_size));

        match &self.sorter {
            Some(sorter) => {
                request.insert(
                    "sortField".to_string(),
                    Value::String(sorter.column_key.clone()),
                );
                request.insert(
                    "sortOrder".to_string(),
                    Value::String(sorter.order.as_str().to_string()),
                );
            }
            None => {
                request.remove("sortField");
                request.remove("sortOrder");
            }
        }

        Value::Object(request)
    }
}
