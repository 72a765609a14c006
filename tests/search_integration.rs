//! End-to-end interpret → search over a database-backed catalog

use tempfile::TempDir;
use wheelhouse::query::{interpret, Filters};
use wheelhouse::search;
use wheelhouse::storage::StorageManager;
use wheelhouse::WheelhouseError;

fn storage() -> (TempDir, StorageManager) {
    let temp_dir = TempDir::new().unwrap();
    let storage = StorageManager::new(temp_dir.path().to_path_buf()).unwrap();
    storage.seed_if_empty().unwrap();
    (temp_dir, storage)
}

#[test]
fn empty_filters_return_full_catalog_in_id_order() {
    let (_dir, storage) = storage();
    let result = storage.catalog.search(&Filters::default()).unwrap();
    let ids: Vec<i64> = result.iter().map(|v| v.id).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
    assert_eq!(result.len(), storage.stats().unwrap().vehicle_count);
}

#[test]
fn budget_query_bounds_price() {
    let (_dir, storage) = storage();
    let filters = interpret("до 2 млн").unwrap();
    assert_eq!(filters.price_max, Some(2_000_000));

    let result = storage.catalog.search(&filters).unwrap();
    assert!(!result.is_empty());
    assert!(result.iter().all(|v| v.price <= 2_000_000));
}

#[test]
fn premium_query_finds_only_premium_stock() {
    let (_dir, storage) = storage();
    let filters = interpret("дорогую премиум машину").unwrap();
    let result = storage.catalog.search(&filters).unwrap();

    assert!(!result.is_empty());
    for v in &result {
        assert!(v.price >= 3_000_000);
        assert!(v.has_tag("premium") || v.has_tag("luxury"));
        assert!(["BMW", "Mercedes-Benz", "Audi", "Lexus"].contains(&v.brand.as_str()));
    }
}

#[test]
fn german_query_selects_german_brands() {
    let (_dir, storage) = storage();
    let filters = interpret("немецкий автомобиль").unwrap();
    let result = storage.catalog.search(&filters).unwrap();

    let brands: Vec<&str> = result.iter().map(|v| v.brand.as_str()).collect();
    assert!(brands.contains(&"BMW"));
    assert!(brands.contains(&"Volkswagen"));
    assert!(!brands.contains(&"Toyota"));
}

#[test]
fn unknown_tag_returns_empty_without_error() {
    let (_dir, storage) = storage();
    let filters = Filters {
        tags: vec!["nonexistent_tag".to_string()],
        ..Default::default()
    };
    assert!(storage.catalog.search(&filters).unwrap().is_empty());
}

#[test]
fn results_are_catalog_members_with_unique_ids() {
    let (_dir, storage) = storage();
    let catalog = storage.catalog.list().unwrap();
    let filters = interpret("комфортный семейный внедорожник до 3 млн").unwrap();
    let result = storage.catalog.search(&filters).unwrap();

    let mut ids: Vec<i64> = result.iter().map(|v| v.id).collect();
    let before = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), before, "no duplicated identifiers");
    for id in &ids {
        assert!(catalog.iter().any(|v| v.id == *id), "no fabricated vehicles");
    }
}

#[test]
fn pushdown_and_in_memory_paths_agree_on_interpreted_queries() {
    let (_dir, storage) = storage();
    let catalog = storage.catalog.list().unwrap();

    let queries = [
        "семейный кроссовер до 2 млн",
        "дорогую немецкую машину",
        "экономичный хэтчбек для города",
        "тойота или лексус от 2 млн",
        "седан с большим багажником",
        "роскошную машину",
    ];

    for query in queries {
        let filters = interpret(query).unwrap();
        let from_db: Vec<i64> = storage
            .catalog
            .search(&filters)
            .unwrap()
            .iter()
            .map(|v| v.id)
            .collect();
        let in_memory: Vec<i64> = search::apply(&catalog, &filters)
            .iter()
            .map(|v| v.id)
            .collect();
        assert_eq!(from_db, in_memory, "query: {}", query);
    }
}

#[test]
fn empty_query_is_rejected_before_any_search() {
    assert!(matches!(interpret(""), Err(WheelhouseError::InvalidQuery)));
}
