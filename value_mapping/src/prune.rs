//! Filter pruning
//!
//! Form state carries plenty of blank values (cleared inputs, empty selects).
//! Only meaningful values reach the fetch params and the cache key.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Submitted filter values, ordered by field name
pub type FilterMap = BTreeMap<String, Value>;

/// Whether a value carries no filter information
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Drop blank values, recursing into objects. Returns `None` when nothing is left.
///
/// Arrays are kept as-is unless empty: positional values such as date ranges
/// must not shift.
pub fn prune_value(value: Value) -> Option<Value> {
    match value {
        Value::Object(map) => {
            let pruned: Map<String, Value> = map
                .into_iter()
                .filter_map(|(key, value)| prune_value(value).map(|value| (key, value)))
                .collect();

            if pruned.is_empty() {
                None
            } else {
                Some(Value::Object(pruned))
            }
        }
        other if is_blank(&other) => None,
        other => Some(other),
    }
}

/// Prune a set of raw form values into a filter map
pub fn prune_filters<I>(filters: I) -> FilterMap
where
    I: IntoIterator<Item = (String, Value)>,
{
    filters
        .into_iter()
        .filter_map(|(key, value)| prune_value(value).map(|value| (key, value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pairs(value: Value) -> Vec<(String, Value)> {
        match value {
            Value::Object(map) => map.into_iter().collect(),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_prune_drops_blank_values() {
        let filters = prune_filters(pairs(json!({
            "name": "",
            "status": null,
            "tags": [],
            "meta": {},
            "age": 0,
            "active": false,
            "region": "eu"
        })));

        assert_eq!(filters.len(), 3);
        assert_eq!(filters["age"], json!(0));
        assert_eq!(filters["active"], json!(false));
        assert_eq!(filters["region"], json!("eu"));
    }

    #[test]
    fn test_prune_recurses_into_objects() {
        let filters = prune_filters(pairs(json!({
            "range": { "from": "2024-01-01", "to": null },
            "nested": { "a": { "b": "" } }
        })));

        assert_eq!(filters.len(), 1);
        assert_eq!(filters["range"], json!({ "from": "2024-01-01" }));
    }

    #[test]
    fn test_prune_keeps_array_positions() {
        let value = prune_value(json!([null, "2024-02-01"])).unwrap();
        assert_eq!(value, json!([null, "2024-02-01"]));
    }

    #[test]
    fn test_whitespace_is_not_blank() {
        assert!(!is_blank(&json!(" ")));
        assert!(is_blank(&json!("")));
    }
}
