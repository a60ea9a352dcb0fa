//! Saved filter presets
//!
//! This module provides preset entries, default-preset selection and the
//! manager that keeps a kind's preset list in sync with its source.

pub mod entry;
pub mod manager;
pub mod memory;

#[cfg(test)]
mod tests;

pub use entry::{select_default_preset, PresetEntry, PresetSnapshot};
pub use manager::PresetManager;
pub use memory::MemoryPresetSource;
