//! Query builder tests

use crate::query_builder::{
    filters_from_value, merge_filters, FilterMap, PaginationMeta, QueryParams, SortOrder, Sorter,
};
use serde_json::json;

// ========================================
// Filters
// ========================================

#[test]
fn test_filters_from_value_prunes() {
    let filters = filters_from_value(json!({ "name": "", "status": "open", "owner": null }));
    assert_eq!(filters.len(), 1);
    assert_eq!(filters["status"], json!("open"));

    assert!(filters_from_value(json!(["not", "an", "object"])).is_empty());
}

#[test]
fn test_merge_filters_overlay_wins_and_blank_clears() {
    let base = filters_from_value(json!({ "status": "open", "region": "eu" }));
    let mut overlay = FilterMap::new();
    overlay.insert("status".to_string(), json!("closed"));
    overlay.insert("region".to_string(), json!(""));

    let merged = merge_filters(&base, &overlay);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged["status"], json!("closed"));
}

// ========================================
// Sorting
// ========================================

#[test]
fn test_sorter_from_widget_parts() {
    assert_eq!(
        Sorter::from_parts(Some("createdAt"), Some("descend")),
        Some(Sorter::descend("createdAt"))
    );
    assert_eq!(Sorter::from_parts(Some("createdAt"), None), None);
    assert_eq!(Sorter::from_parts(Some(""), Some("ascend")), None);
    assert_eq!(Sorter::from_parts(Some("name"), Some("sideways")), None);
    assert_eq!(SortOrder::parse("asc"), Some(SortOrder::Ascend));
}

#[test]
fn test_sorter_serializes_like_the_widget() {
    let value = serde_json::to_value(Sorter::ascend("name")).unwrap();
    assert_eq!(value, json!({ "columnKey": "name", "order": "ascend" }));
}

// ========================================
// Request building
// ========================================

#[test]
fn test_request_flattens_filters() {
    let params = QueryParams::new(3, 20)
        .filter("status", json!("open"))
        .sorter(Some(Sorter::descend("amount")));

    assert_eq!(
        params.to_request(),
        json!({
            "status": "open",
            "current": 3,
            "pageSize": 20,
            "sortField": "amount",
            "sortOrder": "descend"
        })
    );
}

#[test]
fn test_reserved_names_override_filters() {
    let params = QueryParams::new(1, 10)
        .filter("current", json!(99))
        .filter("sortField", json!("spoofed"));

    let request = params.to_request();
    assert_eq!(request["current"], json!(1));
    assert!(request.get("sortField").is_none());
}

#[test]
fn test_export_params_keep_filters_and_sorter() {
    let params = QueryParams::new(7, 50)
        .filter("status", json!("open"))
        .sorter(Some(Sorter::ascend("name")));

    let export = params.for_export();
    assert!(export.is_export());
    assert_eq!(export.page, 1);
    assert_eq!(export.page_size, 0);
    assert_eq!(export.filters, params.filters);
    assert_eq!(export.sorter, params.sorter);
}

// ========================================
// Pagination metadata
// ========================================

#[test]
fn test_pagination_meta_math() {
    let meta = PaginationMeta {
        current: 3,
        page_size: 20,
        total: 41,
        page_size_options: vec![20],
    };
    assert_eq!(meta.page_count(), 3);
    assert_eq!(meta.offset(), 40);

    let empty = PaginationMeta {
        total: 0,
        ..meta
    };
    assert_eq!(empty.page_count(), 1);
}
