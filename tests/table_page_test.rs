//! Integration tests for table pages
//!
//! Pages run against the in-memory cache backend with scripted fetchers and
//! in-memory preset sources.

use serde_json::json;
use std::sync::Arc;
use table_query::testing::ScriptedFetcher;
use tablehaus::prelude::*;

#[allow(dead_code)]
#[derive(TableColumns)]
#[table_columns(rename_all = "camelCase")]
struct OrderRow {
    id: u64,

    #[column(title = "Customer")]
    customer_name: String,

    #[column(hidden)]
    notes: String,

    #[column(skip)]
    raw: serde_json::Value,
}

/// Preset source whose backend is always down
struct OfflineSource;

#[async_trait]
impl PresetSource for OfflineSource {
    async fn load(&self, _kind: &str) -> Result<Vec<PresetEntry>, PresetError> {
        Err(PresetError::Source("presets offline".to_string()))
    }

    async fn add(&self, _kind: &str, _name: &str, _data: &str) -> Result<PresetEntry, PresetError> {
        Err(PresetError::Source("presets offline".to_string()))
    }

    async fn delete(&self, _kind: &str, _id: &str) -> Result<(), PresetError> {
        Err(PresetError::Source("presets offline".to_string()))
    }
}

async fn seeded_presets() -> Arc<MemoryPresetSource> {
    let source = Arc::new(MemoryPresetSource::new());
    source
        .insert(
            "orders",
            PresetEntry::new("closed", "Closed", r#"{"status":"closed","lastUpdated":5}"#),
        )
        .await;
    source
        .insert(
            "orders",
            PresetEntry::new("late", "Late", r#"{"status":"late","lastUpdated":10}"#),
        )
        .await;
    source
}

fn order_page(haus: &TableHaus, fetcher: Arc<ScriptedFetcher>) -> TablePageBuilder {
    haus.page("orders", fetcher)
        .initial_filters(filters_from_value(json!({ "region": "eu", "status": "open" })))
        .columns_from::<OrderRow>()
}

#[test]
fn test_derived_columns() {
    let columns = OrderRow::column_descriptors();
    let keys: Vec<&str> = columns.iter().map(|c| c.key.as_str()).collect();
    let titles: Vec<&str> = columns.iter().map(|c| c.title.as_str()).collect();

    assert_eq!(keys, vec!["id", "customerName", "notes"]);
    assert_eq!(titles, vec!["Id", "Customer", "Notes"]);
    assert_eq!(OrderRow::COLUMN_KEYS, &["id", "customerName", "notes"]);
    assert!(!columns[2].visible);
    assert_eq!(columns[1].order, 1);
}

#[tokio::test]
async fn test_initialize_applies_default_preset_before_fetch() {
    let mut haus = TableHaus::new(AppConfig::default()).unwrap();
    let fetcher = Arc::new(ScriptedFetcher::new());
    fetcher.respond(json!({ "mainResult": [{ "id": 1 }], "totalCount": 7 }));

    let page = order_page(&haus, fetcher.clone())
        .presets("orders", seeded_presets().await)
        .build()
        .unwrap();
    let page = haus.register_page(page).unwrap();

    let data = page.initialize().await.unwrap();
    assert_eq!(data.rows.len(), 1);
    assert_eq!(data.total, 7);

    let calls = fetcher.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].filters,
        filters_from_value(json!({ "region": "eu", "status": "late" }))
    );
}

#[tokio::test]
async fn test_initialize_survives_preset_failure() {
    let queue = Arc::new(NotificationQueue::new());
    let haus = TableHaus::new(AppConfig::default())
        .unwrap()
        .with_notifier(queue.clone());
    let fetcher = Arc::new(ScriptedFetcher::new());

    let page = order_page(&haus, fetcher.clone())
        .presets("orders", Arc::new(OfflineSource))
        .build()
        .unwrap();

    page.initialize().await.unwrap();
    assert_eq!(fetcher.call_count(), 1);
    assert_eq!(
        fetcher.calls()[0].filters,
        filters_from_value(json!({ "region": "eu", "status": "open" }))
    );

    let messages: Vec<String> = queue.drain().into_iter().map(|n| n.message).collect();
    assert_eq!(messages, vec!["presets offline"]);

    let context = page.render_context().await.unwrap();
    assert!(context.presets_enabled);
    assert!(context.presets.is_empty());
    assert_eq!(context.default_preset_id, None);
}

#[tokio::test]
async fn test_apply_preset_and_render_context() {
    let haus = TableHaus::new(AppConfig::default()).unwrap();
    let fetcher = Arc::new(ScriptedFetcher::new());
    fetcher.always(Ok(json!({ "data": [{ "id": 1 }, { "id": 2 }], "total": 30 })));

    let page = order_page(&haus, fetcher.clone())
        .presets("orders", seeded_presets().await)
        .build()
        .unwrap();

    page.initialize().await.unwrap();
    let context = page.render_context().await.unwrap();
    assert_eq!(context.default_preset_id.as_deref(), Some("late"));

    page.apply_preset("closed").await.unwrap();
    assert_eq!(fetcher.call_count(), 2);

    let context = page.render_context().await.unwrap();
    assert_eq!(context.default_preset_id.as_deref(), Some("closed"));
    assert_eq!(context.filters, filters_from_value(json!({ "status": "closed" })));
    assert_eq!(context.data_source.len(), 2);
    assert_eq!(context.pagination.total, 30);
    assert_eq!(context.pagination.current, 1);
    assert!(!context.loading);
    assert!(!context.fetch_suppressed);

    let columns: Vec<&str> = context.columns.iter().map(|c| c.key.as_str()).collect();
    assert_eq!(columns, vec!["id", "customerName"]);

    assert!(matches!(
        page.apply_preset("missing").await,
        Err(TableHausError::Preset(PresetError::NotFound(_)))
    ));
}

#[tokio::test]
async fn test_save_preset_uses_submitted_filters() {
    let haus = TableHaus::new(AppConfig::default()).unwrap();
    let source = seeded_presets().await;
    let page = order_page(&haus, Arc::new(ScriptedFetcher::new()))
        .presets("orders", source.clone())
        .build()
        .unwrap();
    page.initialize().await.unwrap();

    let saved = page.save_preset("Mine").await.unwrap().unwrap();
    let snapshot = saved.snapshot().unwrap();
    assert_eq!(
        snapshot.filters,
        filters_from_value(json!({ "region": "eu", "status": "late" }))
    );
    assert!(snapshot.last_updated > 0);
    assert_eq!(source.len("orders").await, 3);
    assert_eq!(page.presets().cached_presets().await.len(), 3);

    assert!(page.delete_preset(&saved.id).await.unwrap());
    assert_eq!(source.len("orders").await, 2);

    let plain = haus
        .page("plain", Arc::new(ScriptedFetcher::new()))
        .build()
        .unwrap();
    assert_eq!(plain.save_preset("Mine").await.unwrap(), None);
    assert!(!plain.render_context().await.unwrap().presets_enabled);
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_retries_show_in_render_context() {
    let haus = TableHaus::new(AppConfig::default()).unwrap();
    let fetcher = Arc::new(ScriptedFetcher::new());
    fetcher.always(Err(FetchError::from_payload(json!({
        "error": { "message": "Service unavailable" }
    }))));

    let page = order_page(&haus, fetcher.clone()).build().unwrap();

    let err = page.initialize().await.unwrap_err();
    assert!(matches!(
        err,
        TableHausError::Query(QueryError::RetriesExhausted { attempts: 2, .. })
    ));
    assert_eq!(fetcher.call_count(), 2);

    let context = page.render_context().await.unwrap();
    assert!(context.fetch_suppressed);
    assert!(!context.retrying);
    assert!(context.data_source.is_empty());
    assert_eq!(context.error.as_deref(), Some("Service unavailable"));

    // Nothing is fetched again until filters are submitted
    page.query().load().await.unwrap();
    assert_eq!(fetcher.call_count(), 2);

    fetcher.respond(json!({ "data": [{ "id": 9 }] }));
    page.query().submit_filters(FilterMap::new()).await;
    let data = page.query().load().await.unwrap();
    assert_eq!(data.rows.len(), 1);
    assert_eq!(fetcher.call_count(), 3);
}

#[tokio::test]
async fn test_page_registry() {
    let mut haus = TableHaus::new(AppConfig::default()).unwrap();
    haus.health_check().await.unwrap();

    let first = haus.page("orders", Arc::new(ScriptedFetcher::new())).build().unwrap();
    let again = haus.page("orders", Arc::new(ScriptedFetcher::new())).build().unwrap();
    let other = haus.page("invoices", Arc::new(ScriptedFetcher::new())).build().unwrap();

    haus.register_page(first).unwrap();
    haus.register_page(other).unwrap();
    assert!(matches!(
        haus.register_page(again),
        Err(TableHausError::PageAlreadyRegistered(name)) if name == "orders"
    ));

    let mut names = haus.list_pages();
    names.sort();
    assert_eq!(names, vec!["invoices", "orders"]);
    assert_eq!(haus.get_page("orders").unwrap().name(), "orders");

    haus.unregister_page("orders").unwrap();
    assert!(matches!(haus.get_page("orders"), Err(TableHausError::PageNotFound(_))));
    assert!(haus.unregister_page("orders").is_err());
}

#[tokio::test]
async fn test_pages_share_cache_without_collisions() {
    let haus = TableHaus::new(AppConfig::default()).unwrap();
    let orders_fetcher = Arc::new(ScriptedFetcher::new());
    let archive_fetcher = Arc::new(ScriptedFetcher::new());
    orders_fetcher.always(Ok(json!({ "data": [{ "id": 1 }] })));
    archive_fetcher.always(Ok(json!({ "data": [{ "id": 2 }, { "id": 3 }] })));

    let orders = haus.page("orders", orders_fetcher.clone()).build().unwrap();
    let archive = haus.page("orders_archive", archive_fetcher.clone()).build().unwrap();

    assert_eq!(orders.query().load().await.unwrap().rows.len(), 1);
    assert_eq!(archive.query().load().await.unwrap().rows.len(), 2);

    orders.query().clear_cache().await.unwrap();
    assert!(!orders.query().load().await.unwrap().from_cache);
    assert!(archive.query().load().await.unwrap().from_cache);
    assert_eq!(orders_fetcher.call_count(), 2);
    assert_eq!(archive_fetcher.call_count(), 1);
}
