//! Filter values submitted from the filter form

use serde_json::Value;
pub use value_mapping::FilterMap;
use value_mapping::prune_filters;

/// Prune a JSON object of form values; non-objects yield no filters
pub fn filters_from_value(value: Value) -> FilterMap {
    match value {
        Value::Object(map) => prune_filters(map),
        _ => FilterMap::new(),
    }
}

/// Overlay `overlay` onto `base`, then prune
pub fn merge_filters(base: &FilterMap, overlay: &FilterMap) -> FilterMap {
    let mut merged = base.clone();
    merged.extend(overlay.iter().map(|(key, value)| (key.clone(), value.clone())));
    prune_filters(merged)
}

/// Filters as a JSON object
pub fn filters_to_value(filters: &FilterMap) -> Value {
    Value::Object(
        filters
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
    )
}
