//! Query builder utilities
//!
//! This module provides the filter, sorting and pagination types that make up
//! a table query.

pub mod builder;
pub mod filter;
pub mod ordering;
pub mod pagination;

#[cfg(test)]
mod tests;

pub use builder::QueryParams;
pub use filter::{filters_from_value, filters_to_value, merge_filters, FilterMap};
pub use ordering::{SortOrder, Sorter};
pub use pagination::{PaginationMeta, TableChange, EXPORT_PAGE_SIZE};
