//! Database tests

use super::*;
use crate::error::Error;
use crate::models::*;
use crate::store::TransactionStore;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_tx(day: NaiveDate, amount: f64, category_id: Option<i64>) -> NewTransaction {
    NewTransaction {
        date: day,
        amount,
        category_id,
        description: None,
    }
}

#[test]
fn test_in_memory_db() {
    let db = Database::in_memory().unwrap();
    assert!(db.list_users().unwrap().is_empty());
    assert!(db.list_categories(None).unwrap().is_empty());
}

#[test]
fn test_schema_exists() {
    let db = Database::in_memory().unwrap();
    let conn = db.conn().unwrap();

    let result: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM pragma_table_info('transactions') WHERE name IN ('id', 'user_id', 'category_id', 'date', 'amount', 'description')",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(result, 6, "transactions table should have 6 expected columns");
}

#[test]
fn test_user_crud() {
    let db = Database::in_memory().unwrap();

    let id = db.create_user("ana").unwrap();
    assert!(id > 0);

    let user = db.find_user(id).unwrap().unwrap();
    assert_eq!(user.username, "ana");
    assert_eq!(db.find_user_by_name("ana").unwrap().unwrap().id, id);
    assert!(db.find_user(id + 100).unwrap().is_none());

    // Usernames are unique
    assert!(db.create_user("ana").is_err());
    assert!(matches!(db.create_user("  "), Err(Error::InvalidData(_))));
}

#[test]
fn test_categories_visibility() {
    let db = Database::in_memory().unwrap();
    let ana = db.create_user("ana").unwrap();
    let ivo = db.create_user("ivo").unwrap();

    let food = db
        .create_category(None, "Food", CategoryType::Expense)
        .unwrap();
    let salary = db
        .create_category(Some(ana), "Salary", CategoryType::Income)
        .unwrap();
    db.create_category(Some(ivo), "Games", CategoryType::Expense)
        .unwrap();

    let visible: Vec<i64> = db
        .list_categories(Some(ana))
        .unwrap()
        .iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(visible, vec![food, salary]);

    let global = db.list_categories(None).unwrap();
    assert_eq!(global.len(), 1);
    assert_eq!(global[0].category_type, CategoryType::Expense);

    let salary = db.get_category(salary).unwrap().unwrap();
    assert_eq!(salary.category_type, CategoryType::Income);
    assert_eq!(salary.user_id, Some(ana));
}

#[test]
fn test_insert_transaction_validation() {
    let db = Database::in_memory().unwrap();
    let ana = db.create_user("ana").unwrap();
    let ivo = db.create_user("ivo").unwrap();
    let private = db
        .create_category(Some(ivo), "Games", CategoryType::Expense)
        .unwrap();
    let d = date(2026, 3, 1);

    assert!(matches!(
        db.insert_transaction(999, &new_tx(d, 1.0, None)),
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        db.insert_transaction(ana, &new_tx(d, f64::NAN, None)),
        Err(Error::InvalidData(_))
    ));
    assert!(matches!(
        db.insert_transaction(ana, &new_tx(d, 1.0, Some(private))),
        Err(Error::InvalidData(_))
    ));
    assert!(matches!(
        db.insert_transaction(ana, &new_tx(d, 1.0, Some(12345))),
        Err(Error::NotFound(_))
    ));
    assert_eq!(db.count_transactions(ana).unwrap(), 0);
}

#[test]
fn test_store_lists_records_in_date_order() {
    let db = Database::in_memory().unwrap();
    let ana = db.create_user("ana").unwrap();
    let ivo = db.create_user("ivo").unwrap();
    let food = db
        .create_category(None, "Food", CategoryType::Expense)
        .unwrap();

    db.insert_transaction(ana, &new_tx(date(2026, 3, 9), 12.5, Some(food)))
        .unwrap();
    db.insert_transaction(ana, &new_tx(date(2026, 1, 2), 3.0, None))
        .unwrap();
    db.insert_transaction(ivo, &new_tx(date(2026, 2, 2), 99.0, None))
        .unwrap();

    let records = db.list_transactions_for_user(ana).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].date, date(2026, 1, 2));
    assert_eq!(records[0].category, None);
    assert_eq!(records[1].amount, 12.5);
    assert_eq!(
        records[1].category,
        Some(CategoryRef {
            id: food,
            category_type: CategoryType::Expense
        })
    );
}

#[test]
fn test_store_date_filters() {
    let db = Database::in_memory().unwrap();
    let ana = db.create_user("ana").unwrap();
    for day in 1..=10 {
        db.insert_transaction(ana, &new_tx(date(2026, 3, day), 1.0, None))
            .unwrap();
    }

    let since = db
        .list_transactions_for_user_since(ana, date(2026, 3, 8))
        .unwrap();
    assert_eq!(since.len(), 3);

    let between = db
        .list_transactions_for_user_between(ana, date(2026, 3, 2), date(2026, 3, 4))
        .unwrap();
    assert_eq!(between.len(), 3);
    assert_eq!(between[0].date, date(2026, 3, 2));
}

#[test]
fn test_store_get_user_not_found() {
    let db = Database::in_memory().unwrap();
    assert!(matches!(
        TransactionStore::get_user(&db, 7),
        Err(Error::NotFound(_))
    ));
}
