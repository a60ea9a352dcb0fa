//! Unified value mapping between form state, cache keys and fetch responses
//! This crate provides consistent mapping logic used across the tablehaus ecosystem

pub mod canonical;
pub mod envelope;
pub mod error_message;
pub mod prune;

// Re-export commonly used items
pub use canonical::canonical_json;
pub use envelope::{extract_rows, extract_total, normalize_response, Envelope, NormalizedResponse};
pub use error_message::{extract_error_message, resolve_error_message};
pub use prune::{is_blank, prune_filters, prune_value, FilterMap};
