use listing_catalog::catalog::{CatalogState, FetchOutcome, LocationFilter, SortKey};
use listing_catalog::config::Config;
use listing_catalog::domain::ListingKind;
use listing_catalog::source::{build_source, OrderBy};
use listing_catalog::CatalogLoader;
use serde_json::json;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::Mutex;

fn write_snapshot(dir: &TempDir, table: &str, rows: serde_json::Value) {
    fs::write(
        dir.path().join(format!("{table}.json")),
        serde_json::to_string_pretty(&rows).unwrap(),
    )
    .unwrap();
}

#[test]
fn config_file_sets_page_size_and_table_names() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("catalog.toml");
    fs::write(
        &path,
        r#"
[supabase]
project_ref = "abcd1234"
anon_key = "public-anon"

[supabase.tables]
hotels = "hotel_listings"

[catalog]
page_size = 6
max_price = 350.0
"#,
    )
    .unwrap();

    let config = Config::from_path(&path).unwrap();
    assert_eq!(config.catalog.page_size, 6);
    assert_eq!(config.catalog.max_price, 350.0);
    assert_eq!(config.supabase.tables.table_for(ListingKind::Hotel), "hotel_listings");
    assert_eq!(config.supabase.tables.table_for(ListingKind::Tour), "tours");
    assert_eq!(config.supabase_url().unwrap(), "https://abcd1234.supabase.co");
}

#[test]
fn missing_config_file_is_a_config_error() {
    let dir = TempDir::new().unwrap();
    let err = Config::from_path(dir.path().join("nope.toml")).unwrap_err();
    assert!(err.to_string().contains("nope.toml"));
}

#[tokio::test]
async fn hotels_load_from_snapshot_and_filter_by_state() {
    let dir = TempDir::new().unwrap();
    write_snapshot(
        &dir,
        "hotels",
        json!([
            {"id": "h1", "name": "The Patient Inn", "city": "Denver", "state": "Colorado", "price_per_night": "$149", "rating": 4.6},
            {"id": "h2", "name": "Bud and Breakfast", "city": "Portland", "state": "Oregon", "price_per_night": "$119", "rating": 4.9},
            {"id": "h3", "name": "Adagio", "city": "Denver", "state": "Colorado", "price_per_night": "$99", "rating": 4.2},
            {"id": "h3", "name": "Adagio (dup)", "city": "Denver", "state": "Colorado", "price_per_night": "$99"},
            {"name": "No id row"}
        ]),
    );

    let config = Config::default();
    let source = build_source(&config, Some(dir.path().to_path_buf())).unwrap();
    let state = Arc::new(Mutex::new(CatalogState::from_config(
        ListingKind::Hotel,
        &config.catalog,
    )));
    let loader = CatalogLoader::new(source, state.clone());

    let outcome = loader.load(Some(OrderBy::asc("name"))).await;
    assert!(matches!(outcome, FetchOutcome::Applied { count: 3 }));

    let mut state = state.lock().await;
    assert_eq!(state.locations(), ["Colorado", "Oregon"]);

    state.update_criteria(|c| {
        c.set_location(LocationFilter::Only("Colorado".to_string()));
        c.set_sort(SortKey::PriceAscending);
    });
    let page = state.visible_page();
    let names: Vec<&str> = page.items.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Adagio", "The Patient Inn"]);
    assert!(page.has_reset_capability);

    state.reset_criteria();
    let page = state.visible_page();
    // upstream order is the snapshot sorted by name
    let names: Vec<&str> = page.items.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Adagio", "Bud and Breakfast", "The Patient Inn"]);
}
