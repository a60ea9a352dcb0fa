//! Table query controller
//!
//! `TableQuery` owns the query state machine and drives the fetcher through
//! the cache, retrying failures and suppressing fetches once retries run out.

pub mod core;
pub mod export;
pub mod fetch;


pub use self::core::{ErrorCallback, TableData, TableQuery, TableQueryBuilder};
