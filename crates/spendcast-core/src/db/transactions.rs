//! Transaction operations and the SQLite-backed transaction store

use chrono::NaiveDate;
use rusqlite::params;

use super::{parse_date, Database};
use crate::error::{Error, Result};
use crate::models::{CategoryRef, CategoryType, NewTransaction, TransactionRecord, User};
use crate::store::TransactionStore;

/// Columns shared by every record query; joined with the category type
const RECORD_SELECT: &str = r#"
    SELECT t.id, t.amount, t.date, t.category_id, c.category_type
    FROM transactions t
    LEFT JOIN categories c ON c.id = t.category_id
"#;

fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<TransactionRecord> {
    let date_str: String = row.get(2)?;
    let category_id: Option<i64> = row.get(3)?;
    let category_type: Option<String> = row.get(4)?;

    Ok(TransactionRecord {
        id: row.get(0)?,
        amount: row.get(1)?,
        date: parse_date(2, &date_str)?,
        category: category_id.map(|id| CategoryRef {
            id,
            category_type: category_type
                .and_then(|s| s.parse().ok())
                .unwrap_or(CategoryType::Expense),
        }),
    })
}

impl Database {
    /// Insert a transaction for a user, returning its id
    pub fn insert_transaction(&self, user_id: i64, tx: &NewTransaction) -> Result<i64> {
        if !tx.amount.is_finite() {
            return Err(Error::InvalidData(format!(
                "amount must be a finite number, got {}",
                tx.amount
            )));
        }
        if self.find_user(user_id)?.is_none() {
            return Err(Error::NotFound(format!("user {}", user_id)));
        }
        if let Some(category_id) = tx.category_id {
            match self.get_category(category_id)? {
                Some(category) if category.user_id.map_or(true, |owner| owner == user_id) => {}
                Some(_) => {
                    return Err(Error::InvalidData(format!(
                        "category {} belongs to another user",
                        category_id
                    )))
                }
                None => return Err(Error::NotFound(format!("category {}", category_id))),
            }
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO transactions (user_id, category_id, date, amount, description)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                tx.category_id,
                tx.date.format("%Y-%m-%d").to_string(),
                tx.amount,
                tx.description,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Count a user's transactions
    pub fn count_transactions(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn query_records(
        &self,
        filter: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<TransactionRecord>> {
        let conn = self.conn()?;
        let sql = format!("{} WHERE {} ORDER BY t.date, t.id", RECORD_SELECT, filter);
        let mut stmt = conn.prepare(&sql)?;

        let records = stmt
            .query_map(params, row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }
}

impl TransactionStore for Database {
    fn get_user(&self, user_id: i64) -> Result<User> {
        self.find_user(user_id)?
            .ok_or_else(|| Error::NotFound(format!("user {}", user_id)))
    }

    fn list_transactions_for_user(&self, user_id: i64) -> Result<Vec<TransactionRecord>> {
        self.query_records("t.user_id = ?", params![user_id])
    }

    fn list_transactions_for_user_since(
        &self,
        user_id: i64,
        from: NaiveDate,
    ) -> Result<Vec<TransactionRecord>> {
        self.query_records(
            "t.user_id = ? AND t.date >= ?",
            params![user_id, from.format("%Y-%m-%d").to_string()],
        )
    }

    fn list_transactions_for_user_between(
        &self,
        user_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TransactionRecord>> {
        self.query_records(
            "t.user_id = ? AND t.date >= ? AND t.date <= ?",
            params![
                user_id,
                start.format("%Y-%m-%d").to_string(),
                end.format("%Y-%m-%d").to_string()
            ],
        )
    }
}
