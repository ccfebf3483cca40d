//! Integration tests for spendcast-core
//!
//! These tests exercise the full store → predict → analyze workflow against
//! a real SQLite database.

use chrono::{Duration, NaiveDate};
use spendcast_core::{
    db::Database,
    models::{CategoryType, NewTransaction},
    Error, PredictionConfig, PredictionEngine, SpendingAnalyzer,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    date(2026, 10, 16)
}

fn add(db: &Database, user: i64, day: NaiveDate, amount: f64, category: Option<i64>) {
    db.insert_transaction(
        user,
        &NewTransaction {
            date: day,
            amount,
            category_id: category,
            description: Some("test".to_string()),
        },
    )
    .expect("Failed to insert transaction");
}

// =============================================================================
// Prediction Workflow
// =============================================================================

#[test]
fn test_category_prediction_from_short_history() {
    let db = Database::in_memory().expect("Failed to create in-memory database");
    let user = db.create_user("ana").unwrap();
    let groceries = db
        .create_category(None, "Groceries", CategoryType::Expense)
        .unwrap();

    for i in 0..5 {
        add(&db, user, date(2026, 9, 1) + Duration::days(i * 4), 10.0, Some(groceries));
    }

    let engine = PredictionEngine::new(&db).with_today(today());
    let predicted = engine
        .predict(user, date(2026, 10, 20), Some(groceries))
        .unwrap();
    assert_eq!(predicted, 10.0);
}

#[test]
fn test_daily_prediction_learns_weekday_pattern() {
    let db = Database::in_memory().expect("Failed to create in-memory database");
    let user = db.create_user("ana").unwrap();

    // Ten Mondays of 20, starting 2026-06-01
    for week in 0..10 {
        add(&db, user, date(2026, 6, 1) + Duration::weeks(week), 20.0, None);
    }

    let engine = PredictionEngine::new(&db).with_today(today());
    let monday = engine
        .predict_daily_spending(user, date(2026, 10, 19))
        .unwrap();
    let tuesday = engine
        .predict_daily_spending(user, date(2026, 10, 20))
        .unwrap();

    assert!((monday - 20.0).abs() < 1e-6, "monday = {}", monday);
    assert!(tuesday.abs() < 1e-6, "tuesday = {}", tuesday);

    let analysis = engine.analyze_daily_spending(user).unwrap().unwrap();
    assert_eq!(analysis.daily_factors.len(), 6);
    assert_eq!(analysis.daily_factors[0].weekday, "MONDAY");
    assert!(analysis.r_squared > 0.99);
}

#[test]
fn test_rolling_views_over_database() {
    let db = Database::in_memory().expect("Failed to create in-memory database");
    let user = db.create_user("ana").unwrap();
    let rent = db
        .create_category(Some(user), "Rent", CategoryType::Expense)
        .unwrap();

    add(&db, user, date(2026, 8, 5), 120.0, Some(rent));
    add(&db, user, date(2026, 9, 5), 80.0, Some(rent));
    add(&db, user, date(2026, 10, 5), 100.0, None);

    let engine = PredictionEngine::new(&db).with_today(today());
    assert_eq!(engine.rolling_monthly_average(user, 3).unwrap(), 100.0);
    assert_eq!(engine.rolling_monthly_average(user, 0).unwrap(), 0.0);

    let series = engine.rolling_monthly_series(user, 2).unwrap();
    let entries: Vec<(&str, f64)> = series.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    assert_eq!(
        entries,
        vec![("2026-08", 120.0), ("2026-09", 100.0), ("2026-10", 90.0)]
    );

    let analyzer = SpendingAnalyzer::new(&db).with_today(today());
    let monthly = analyzer.monthly_spending(user, 2, Some(rent)).unwrap();
    assert_eq!(monthly.len(), 2);
    assert_eq!(monthly["2026-09"], 80.0);
    assert_eq!(monthly["2026-10"], 0.0);

    let window = analyzer.daily_spending(user, 14, None).unwrap().unwrap();
    assert_eq!(window.series.len(), 14);
    assert_eq!(window.total, 100.0);
}

#[test]
fn test_users_are_isolated() {
    let db = Database::in_memory().expect("Failed to create in-memory database");
    let ana = db.create_user("ana").unwrap();
    let ivo = db.create_user("ivo").unwrap();
    add(&db, ivo, date(2026, 10, 1), 500.0, None);

    let engine = PredictionEngine::new(&db).with_today(today());
    assert_eq!(engine.predict(ana, today(), None).unwrap(), 0.0);
    assert_eq!(engine.rolling_monthly_average(ana, 1).unwrap(), 0.0);
    assert!(engine.rolling_monthly_series(ana, 3).unwrap().is_empty());
}

#[test]
fn test_unknown_user_is_reported() {
    let db = Database::in_memory().expect("Failed to create in-memory database");
    let engine = PredictionEngine::new(&db).with_today(today());

    assert!(matches!(
        engine.predict(42, today(), None),
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        engine.quick_prediction(42, None, None),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn test_config_tolerance_reaches_engine() {
    let db = Database::in_memory().expect("Failed to create in-memory database");
    let user = db.create_user("ana").unwrap();
    for day in 0..14 {
        add(&db, user, date(2026, 9, 1) + Duration::days(day), 5.0 + day as f64, None);
    }

    let strict = PredictionConfig::from_toml("[regression]\nsingular_tolerance = 1.0\n").unwrap();
    let engine = PredictionEngine::with_config(&db, &strict).with_today(today());

    // Every fit is rejected, so the daily forecast is the mean day total
    assert!(engine.analyze_daily_spending(user).unwrap().is_none());
    assert_eq!(engine.predict_daily_spending(user, today()).unwrap(), 11.5);
}
