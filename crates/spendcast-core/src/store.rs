//! Read-only access to users and their transaction history
//!
//! The prediction engine never writes. Anything that can hand out a user and
//! that user's transactions can back it: the SQLite [`Database`](crate::Database)
//! or a [`MemoryStore`] snapshot.

use chrono::{NaiveDate, Utc};

use crate::error::{Error, Result};
use crate::models::{TransactionRecord, User};

/// Source of historical transactions
pub trait TransactionStore {
    /// Look up a user, failing with [`Error::NotFound`] for unknown ids
    fn get_user(&self, user_id: i64) -> Result<User>;

    /// All transactions for a user, oldest first
    fn list_transactions_for_user(&self, user_id: i64) -> Result<Vec<TransactionRecord>>;

    /// Transactions dated on or after `from`
    fn list_transactions_for_user_since(
        &self,
        user_id: i64,
        from: NaiveDate,
    ) -> Result<Vec<TransactionRecord>> {
        let mut transactions = self.list_transactions_for_user(user_id)?;
        transactions.retain(|t| t.date >= from);
        Ok(transactions)
    }

    /// Transactions dated within `start..=end`
    fn list_transactions_for_user_between(
        &self,
        user_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TransactionRecord>> {
        let mut transactions = self.list_transactions_for_user(user_id)?;
        transactions.retain(|t| t.date >= start && t.date <= end);
        Ok(transactions)
    }
}

/// In-memory snapshot of users and transactions
///
/// Transactions are returned in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    users: Vec<User>,
    transactions: Vec<(i64, TransactionRecord)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user with the given id
    pub fn add_user(&mut self, user_id: i64, username: &str) {
        self.users.push(User {
            id: user_id,
            username: username.to_string(),
            created_at: Utc::now(),
        });
    }

    /// Append a transaction to a user's history
    pub fn add_transaction(&mut self, user_id: i64, transaction: TransactionRecord) {
        self.transactions.push((user_id, transaction));
    }

    /// Number of stored transactions across all users
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

impl TransactionStore for MemoryStore {
    fn get_user(&self, user_id: i64) -> Result<User> {
        self.users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("user {}", user_id)))
    }

    fn list_transactions_for_user(&self, user_id: i64) -> Result<Vec<TransactionRecord>> {
        Ok(self
            .transactions
            .iter()
            .filter(|(owner, _)| *owner == user_id)
            .map(|(_, t)| t.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, day: u32) -> TransactionRecord {
        TransactionRecord {
            id,
            amount: 10.0,
            date: NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
            category: None,
        }
    }

    #[test]
    fn test_unknown_user_is_not_found() {
        let store = MemoryStore::new();
        let err = store.get_user(42).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_transactions_are_scoped_to_user() {
        let mut store = MemoryStore::new();
        store.add_user(1, "ana");
        store.add_user(2, "ivo");
        store.add_transaction(1, record(1, 1));
        store.add_transaction(2, record(2, 2));
        store.add_transaction(1, record(3, 3));

        let ids: Vec<i64> = store
            .list_transactions_for_user(1)
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_default_date_filters() {
        let mut store = MemoryStore::new();
        store.add_user(1, "ana");
        for day in 1..=10 {
            store.add_transaction(1, record(day as i64, day));
        }

        let since = store
            .list_transactions_for_user_since(1, NaiveDate::from_ymd_opt(2026, 3, 8).unwrap())
            .unwrap();
        assert_eq!(since.len(), 3);

        let between = store
            .list_transactions_for_user_between(
                1,
                NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
                NaiveDate::from_ymd_opt(2026, 3, 4).unwrap(),
            )
            .unwrap();
        assert_eq!(between.len(), 3);
    }
}
