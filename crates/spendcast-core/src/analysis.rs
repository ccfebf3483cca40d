//! Spending views over recent history
//!
//! Plain aggregation, no modelling: calendar-month totals for the last N
//! months and day totals for the last N days, both gap-filled with zeros.

use std::collections::BTreeMap;

use chrono::{Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::models::TransactionRecord;
use crate::prediction::{month_range, month_start, months_before};
use crate::store::TransactionStore;

/// Day totals for a trailing window ending today
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySpendingWindow {
    /// `YYYY-MM-DD` -> total, one entry per day in the window
    pub series: BTreeMap<String, f64>,
    pub total: f64,
    pub days: i64,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

fn matches_category(t: &TransactionRecord, category_id: Option<i64>) -> bool {
    t.amount.is_finite() && category_id.map_or(true, |id| t.category_id() == Some(id))
}

/// Aggregated spending views for a user
pub struct SpendingAnalyzer<'a, S: TransactionStore + ?Sized> {
    store: &'a S,
    today: Option<NaiveDate>,
}

impl<'a, S: TransactionStore + ?Sized> SpendingAnalyzer<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store, today: None }
    }

    /// Pin "today" instead of reading the local clock
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// `YYYY-MM` -> total for the last `months` months including the current one
    pub fn monthly_spending(
        &self,
        user_id: i64,
        months: i64,
        category_id: Option<i64>,
    ) -> Result<BTreeMap<String, f64>> {
        self.store.get_user(user_id)?;
        if months <= 0 {
            return Ok(BTreeMap::new());
        }

        let today = self.today();
        let end = month_start(today);
        let start = months_before(end, months - 1);
        let last_day = end
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(today);

        let transactions = self
            .store
            .list_transactions_for_user_between(user_id, start, last_day)?;

        let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for t in transactions.iter().filter(|t| matches_category(t, category_id)) {
            *totals.entry(month_start(t.date)).or_insert(0.0) += t.amount;
        }

        let series: BTreeMap<String, f64> = month_range(start, end)
            .into_iter()
            .map(|month| {
                let total = totals.get(&month).copied().unwrap_or(0.0);
                (month.format("%Y-%m").to_string(), total)
            })
            .collect();

        debug!(user_id, months, ?category_id, "Monthly spending view");
        Ok(series)
    }

    /// Day totals for the last `days` days including today; `None` when
    /// `days` is not positive
    pub fn daily_spending(
        &self,
        user_id: i64,
        days: i64,
        category_id: Option<i64>,
    ) -> Result<Option<DailySpendingWindow>> {
        self.store.get_user(user_id)?;
        if days <= 0 {
            return Ok(None);
        }

        let end = self.today();
        let start = Duration::try_days(days - 1)
            .and_then(|span| end.checked_sub_signed(span))
            .unwrap_or(NaiveDate::MIN);

        let transactions = self
            .store
            .list_transactions_for_user_between(user_id, start, end)?;

        let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for t in transactions.iter().filter(|t| matches_category(t, category_id)) {
            *totals.entry(t.date).or_insert(0.0) += t.amount;
        }

        let mut series = BTreeMap::new();
        let mut total = 0.0;
        for day in start.iter_days().take_while(|day| *day <= end) {
            let value = totals.get(&day).copied().unwrap_or(0.0);
            total += value;
            series.insert(day.format("%Y-%m-%d").to_string(), value);
        }

        debug!(user_id, days, ?category_id, total, "Daily spending view");
        Ok(Some(DailySpendingWindow {
            series,
            total,
            days,
            start,
            end,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::{CategoryRef, CategoryType};
    use crate::store::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tx(id: i64, day: NaiveDate, amount: f64, category: Option<i64>) -> TransactionRecord {
        TransactionRecord {
            id,
            amount,
            date: day,
            category: category.map(|id| CategoryRef {
                id,
                category_type: CategoryType::Expense,
            }),
        }
    }

    fn store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.add_user(1, "ana");
        store.add_transaction(1, tx(1, date(2026, 6, 30), 99.0, Some(1)));
        store.add_transaction(1, tx(2, date(2026, 8, 3), 40.0, Some(1)));
        store.add_transaction(1, tx(3, date(2026, 8, 28), 10.0, Some(2)));
        store.add_transaction(1, tx(4, date(2026, 10, 14), 5.0, None));
        store.add_transaction(1, tx(5, date(2026, 10, 16), 7.0, Some(1)));
        store.add_transaction(1, tx(6, date(2026, 10, 20), 1000.0, Some(1)));
        store
    }

    fn analyzer(store: &MemoryStore) -> SpendingAnalyzer<'_, MemoryStore> {
        SpendingAnalyzer::new(store).with_today(date(2026, 10, 16))
    }

    #[test]
    fn test_monthly_spending_window() {
        let store = store();
        let monthly = analyzer(&store).monthly_spending(1, 3, None).unwrap();

        let entries: Vec<(&str, f64)> = monthly.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        // Future-dated October transaction still counts toward the current month
        assert_eq!(
            entries,
            vec![("2026-08", 50.0), ("2026-09", 0.0), ("2026-10", 1012.0)]
        );
    }

    #[test]
    fn test_monthly_spending_by_category() {
        let store = store();
        let monthly = analyzer(&store).monthly_spending(1, 3, Some(2)).unwrap();
        assert_eq!(monthly["2026-08"], 10.0);
        assert_eq!(monthly["2026-10"], 0.0);
    }

    #[test]
    fn test_monthly_spending_non_positive_is_empty() {
        let store = store();
        assert!(analyzer(&store).monthly_spending(1, 0, None).unwrap().is_empty());
    }

    #[test]
    fn test_daily_spending_window() {
        let store = store();
        let window = analyzer(&store).daily_spending(1, 3, None).unwrap().unwrap();

        assert_eq!(window.start, date(2026, 10, 14));
        assert_eq!(window.end, date(2026, 10, 16));
        assert_eq!(window.days, 3);
        assert_eq!(window.series.len(), 3);
        assert_eq!(window.series["2026-10-15"], 0.0);
        assert_eq!(window.total, 12.0);
    }

    #[test]
    fn test_daily_spending_by_category_and_empty() {
        let store = store();
        let analyzer = analyzer(&store);

        let window = analyzer.daily_spending(1, 3, Some(1)).unwrap().unwrap();
        assert_eq!(window.total, 7.0);
        assert!(analyzer.daily_spending(1, 0, None).unwrap().is_none());
    }

    #[test]
    fn test_unknown_user() {
        let store = store();
        let analyzer = analyzer(&store);
        assert!(matches!(
            analyzer.monthly_spending(5, 3, None),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            analyzer.daily_spending(5, 3, None),
            Err(Error::NotFound(_))
        ));
    }
}
