/// Store behaviour shared by both backends
///
/// Every check is written once against `&dyn StrategyStore` and run for the
/// session store and the SQLite store.
use chrono::NaiveDate;
use hours_planner_mcp::*;
use rust_decimal::Decimal;
use std::str::FromStr;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_strategy(title: &str) -> NewStrategy {
    NewStrategy::new(title, date(2022, 1, 15), date(2024, 1, 15), 1200, 40, 5).unwrap()
}

fn backends() -> Vec<(&'static str, Box<dyn StrategyStore>)> {
    vec![
        ("session", Box::new(SessionStore::new(Session::new()).unwrap())),
        ("sqlite", Box::new(SqliteStore::in_memory().unwrap())),
    ]
}

async fn create_then_load_round_trips(store: &dyn StrategyStore) {
    let created = store.create_strategy(new_strategy("Round trip")).await.unwrap();
    let loaded = store.load_strategy(&created.id).await.unwrap().unwrap();

    assert_eq!(loaded, created);
    assert_eq!(loaded.hours_per_day, Some(Decimal::from_str("2.50").unwrap()));
    assert_eq!(store.find_id_by_title("Round trip").await.unwrap(), created.id);
}

async fn listing_is_sorted_case_insensitively(store: &dyn StrategyStore) {
    for title in ["b", "A", "c"] {
        store.create_strategy(new_strategy(title)).await.unwrap();
    }

    let titles: Vec<String> = store
        .sorted_strategies()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.title)
        .collect();
    assert_eq!(titles, vec!["A", "b", "c"]);
}

async fn delete_twice_reports_not_found(store: &dyn StrategyStore) {
    let created = store.create_strategy(new_strategy("Doomed")).await.unwrap();

    store.delete_strategy(&created.id).await.unwrap();
    assert!(store.load_strategy(&created.id).await.unwrap().is_none());

    let err = store.delete_strategy(&created.id).await.unwrap_err();
    assert!(err.is_not_found());
}

async fn duplicate_titles_are_rejected(store: &dyn StrategyStore) {
    store.create_strategy(new_strategy("Same")).await.unwrap();

    let err = store.create_strategy(new_strategy("Same")).await.unwrap_err();
    assert!(matches!(err, StorageError::DuplicateTitle { .. }));
    assert_eq!(store.sorted_strategies().await.unwrap().len(), 1);
}

async fn title_matching_is_case_sensitive(store: &dyn StrategyStore) {
    store.create_strategy(new_strategy("Thesis")).await.unwrap();

    assert!(store.matching_title("Thesis").await.unwrap());
    assert!(!store.matching_title("thesis").await.unwrap());
    assert!(store.find_id_by_title("THESIS").await.unwrap_err().is_not_found());
}

async fn recompute_is_idempotent(store: &dyn StrategyStore) {
    let created = store
        .create_strategy(NewStrategy::new("Alt", date(2021, 1, 15), date(2024, 1, 15), 1200, 30, 6).unwrap())
        .await
        .unwrap();

    let first = store.set_hours_needed_per_day(&created.id).await.unwrap();
    let second = store.set_hours_needed_per_day(&created.id).await.unwrap();
    assert_eq!(first, Decimal::from_str("1.32").unwrap());
    assert_eq!(first, second);
}

async fn setters_do_not_recompute(store: &dyn StrategyStore) {
    let created = store.create_strategy(new_strategy("Lazy")).await.unwrap();

    store.set_hours_left(&created.id, 2400).await.unwrap();
    let stale = store.load_strategy(&created.id).await.unwrap().unwrap();
    assert_eq!(stale.hours_left, 2400);
    assert_eq!(stale.hours_per_day, Some(Decimal::from_str("2.50").unwrap()));

    let fresh = store.set_hours_needed_per_day(&created.id).await.unwrap();
    assert_eq!(fresh, Decimal::from_str("5.00").unwrap());
}

async fn out_of_range_workdays_reach_the_calculation(store: &dyn StrategyStore) {
    let created = store.create_strategy(new_strategy("Odd week")).await.unwrap();

    store.set_days_to_work(&created.id, 8).await.unwrap();
    assert!(store.set_hours_needed_per_day(&created.id).await.is_ok());

    store.set_days_to_work(&created.id, 0).await.unwrap();
    let err = store.set_hours_needed_per_day(&created.id).await.unwrap_err();
    assert!(matches!(err, StorageError::Computation(_)));

    let cleared = store.load_strategy(&created.id).await.unwrap().unwrap();
    assert_eq!(cleared.days_to_work, 0);
    assert!(cleared.hours_per_day.is_none());
}

async fn degenerate_create_stores_nothing(store: &dyn StrategyStore) {
    let new = NewStrategy::new("Too short", date(2024, 1, 1), date(2024, 1, 2), 10, 0, 5).unwrap();

    let err = store.create_strategy(new).await.unwrap_err();
    assert!(matches!(err, StorageError::Computation(_)));
    assert!(!store.matching_title("Too short").await.unwrap());
}

async fn setters_on_missing_id_report_not_found(store: &dyn StrategyStore) {
    let missing = StrategyId::new();

    assert!(store.set_title(&missing, "x").await.unwrap_err().is_not_found());
    assert!(store.set_start_date(&missing, date(2024, 1, 1)).await.unwrap_err().is_not_found());
    assert!(store.set_vacation_days(&missing, 1).await.unwrap_err().is_not_found());
    assert!(store.set_hours_needed_per_day(&missing).await.unwrap_err().is_not_found());
    assert!(store.load_strategy(&missing).await.unwrap().is_none());
}

#[tokio::test]
async fn test_create_then_load_round_trips() {
    for (name, store) in backends() {
        println!("backend: {}", name);
        create_then_load_round_trips(store.as_ref()).await;
    }
}

#[tokio::test]
async fn test_listing_is_sorted_case_insensitively() {
    for (name, store) in backends() {
        println!("backend: {}", name);
        listing_is_sorted_case_insensitively(store.as_ref()).await;
    }
}

#[tokio::test]
async fn test_delete_twice_reports_not_found() {
    for (name, store) in backends() {
        println!("backend: {}", name);
        delete_twice_reports_not_found(store.as_ref()).await;
    }
}

#[tokio::test]
async fn test_duplicate_titles_are_rejected() {
    for (name, store) in backends() {
        println!("backend: {}", name);
        duplicate_titles_are_rejected(store.as_ref()).await;
    }
}

#[tokio::test]
async fn test_title_matching_is_case_sensitive() {
    for (name, store) in backends() {
        println!("backend: {}", name);
        title_matching_is_case_sensitive(store.as_ref()).await;
    }
}

#[tokio::test]
async fn test_recompute_is_idempotent() {
    for (name, store) in backends() {
        println!("backend: {}", name);
        recompute_is_idempotent(store.as_ref()).await;
    }
}

#[tokio::test]
async fn test_setters_do_not_recompute() {
    for (name, store) in backends() {
        println!("backend: {}", name);
        setters_do_not_recompute(store.as_ref()).await;
    }
}

#[tokio::test]
async fn test_out_of_range_workdays_reach_the_calculation() {
    for (name, store) in backends() {
        println!("backend: {}", name);
        out_of_range_workdays_reach_the_calculation(store.as_ref()).await;
    }
}

#[tokio::test]
async fn test_degenerate_create_stores_nothing() {
    for (name, store) in backends() {
        println!("backend: {}", name);
        degenerate_create_stores_nothing(store.as_ref()).await;
    }
}

#[tokio::test]
async fn test_setters_on_missing_id_report_not_found() {
    for (name, store) in backends() {
        println!("backend: {}", name);
        setters_on_missing_id_report_not_found(store.as_ref()).await;
    }
}
