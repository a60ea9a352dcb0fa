//! Preset entries and snapshots
//!
//! A preset's `data` is opaque to the source: a JSON object of filter values
//! plus `lastUpdated` in epoch milliseconds.

use crate::query_builder::FilterMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetEntry {
    pub id: String,
    pub name: String,
    pub data: String,
}

/// Parsed preset data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetSnapshot {
    #[serde(rename = "lastUpdated", default)]
    pub last_updated: i64,
    #[serde(flatten)]
    pub filters: FilterMap,
}

impl PresetSnapshot {
    pub fn new(filters: FilterMap, last_updated: i64) -> Self {
        Self {
            last_updated,
            filters,
        }
    }

    pub fn to_data(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl PresetEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            data: data.into(),
        }
    }

    /// Parse the opaque data; malformed data yields `None`
    pub fn snapshot(&self) -> Option<PresetSnapshot> {
        serde_json::from_str(&self.data).ok()
    }
}

/// The most recently updated entry among those with a valid, positive timestamp
pub fn select_default_preset(entries: &[PresetEntry]) -> Option<&PresetEntry> {
    entries
        .iter()
        .filter_map(|entry| {
            entry
                .snapshot()
                .map(|snapshot| (entry, snapshot.last_updated))
        })
        .filter(|(_, last_updated)| *last_updated > 0)
        .max_by_key(|(_, last_updated)| *last_updated)
        .map(|(entry, _)| entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(id: &str, data: &str) -> PresetEntry {
        PresetEntry::new(id, format!("preset {id}"), data)
    }

    #[test]
    fn test_snapshot_round_trips_flattened() {
        let mut filters = FilterMap::new();
        filters.insert("status".to_string(), json!("open"));
        let data = PresetSnapshot::new(filters.clone(), 1700).to_data().unwrap();

        let value: serde_json::Value = serde_json::from_str(&data).unwrap();
        assert_eq!(value, json!({ "status": "open", "lastUpdated": 1700 }));

        let parsed = entry("a", &data).snapshot().unwrap();
        assert_eq!(parsed.filters, filters);
        assert_eq!(parsed.last_updated, 1700);
    }

    #[test]
    fn test_missing_timestamp_defaults_to_zero() {
        let snapshot = entry("a", r#"{"status":"open"}"#).snapshot().unwrap();
        assert_eq!(snapshot.last_updated, 0);
    }

    #[test]
    fn test_default_picks_latest_valid_entry() {
        let entries = vec![
            entry("old", r#"{"lastUpdated": 100, "q": "a"}"#),
            entry("broken", "{not json"),
            entry("newest", r#"{"lastUpdated": 300}"#),
            entry("zero", r#"{"lastUpdated": 0}"#),
            entry("mid", r#"{"lastUpdated": 200}"#),
            entry("string_ts", r#"{"lastUpdated": "999"}"#),
        ];
        assert_eq!(select_default_preset(&entries).map(|e| e.id.as_str()), Some("newest"));
    }

    #[test]
    fn test_default_is_none_when_nothing_is_valid() {
        assert!(select_default_preset(&[]).is_none());

        let entries = vec![
            entry("zero", r#"{"lastUpdated": 0}"#),
            entry("negative", r#"{"lastUpdated": -5}"#),
            entry("garbage", "[]"),
        ];
        assert!(select_default_preset(&entries).is_none());
    }
}
