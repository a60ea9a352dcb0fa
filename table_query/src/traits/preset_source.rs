use crate::errors::PresetError;
use crate::presets::PresetEntry;
use async_trait::async_trait;

/// Persistence for named filter snapshots, grouped by kind
#[async_trait]
pub trait PresetSource: Send + Sync {
    async fn load(&self, kind: &str) -> Result<Vec<PresetEntry>, PresetError>;

    /// Persist a snapshot; returns the stored entry with its server id
    async fn add(&self, kind: &str, name: &str, data: &str) -> Result<PresetEntry, PresetError>;

    async fn delete(&self, kind: &str, id: &str) -> Result<(), PresetError>;
}
