//! In-process preset source

use crate::errors::PresetError;
use crate::presets::entry::PresetEntry;
use crate::traits::PresetSource;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Keeps presets per kind in memory; ids are random UUIDs
#[derive(Debug, Default)]
pub struct MemoryPresetSource {
    kinds: RwLock<HashMap<String, Vec<PresetEntry>>>,
}

impl MemoryPresetSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a kind with existing entries
    pub async fn insert(&self, kind: &str, entry: PresetEntry) {
        self.kinds
            .write()
            .await
            .entry(kind.to_string())
            .or_default()
            .push(entry);
    }

    pub async fn len(&self, kind: &str) -> usize {
        self.kinds
            .read()
            .await
            .get(kind)
            .map(|entries| entries.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl PresetSource for MemoryPresetSource {
    async fn load(&self, kind: &str) -> Result<Vec<PresetEntry>, PresetError> {
        Ok(self
            .kinds
            .read()
            .await
            .get(kind)
            .cloned()
            .unwrap_or_default())
    }

    async fn add(&self, kind: &str, name: &str, data: &str) -> Result<PresetEntry, PresetError> {
        let entry = PresetEntry::new(uuid::Uuid::new_v4().to_string(), name, data);
        self.insert(kind, entry.clone()).await;
        Ok(entry)
    }

    async fn delete(&self, kind: &str, id: &str) -> Result<(), PresetError> {
        let mut kinds = self.kinds.write().await;
        let entries = kinds
            .get_mut(kind)
            .ok_or_else(|| PresetError::NotFound(id.to_string()))?;

        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        if entries.len() == before {
            return Err(PresetError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
