//! Traits at the seams of a table page
//!
//! This module exports the fetch and preset persistence interfaces.

pub mod clock;
pub mod fetcher;
pub mod preset_source;

pub use clock::{Clock, ManualClock, SystemClock};
pub use fetcher::DataFetcher;
pub use preset_source::PresetSource;
