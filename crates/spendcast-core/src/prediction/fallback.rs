//! Historical averages used when regression is not possible

use crate::models::TransactionRecord;

/// Arithmetic mean, `None` for an empty input
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Average transaction amount, conditioned on `category_id` when it matches
/// anything, otherwise over all transactions. Never negative; 0 when empty.
pub fn average(transactions: &[TransactionRecord], category_id: Option<i64>) -> f64 {
    let in_category = category_id.and_then(|id| {
        mean(
            transactions
                .iter()
                .filter(|t| t.category_id() == Some(id))
                .map(|t| t.amount),
        )
    });

    in_category
        .or_else(|| mean(transactions.iter().map(|t| t.amount)))
        .unwrap_or(0.0)
        .max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryRef, CategoryType};
    use chrono::NaiveDate;

    fn tx(amount: f64, category: Option<i64>) -> TransactionRecord {
        TransactionRecord {
            id: 0,
            amount,
            date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            category: category.map(|id| CategoryRef {
                id,
                category_type: CategoryType::Expense,
            }),
        }
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(average(&[], Some(1)), 0.0);
        assert_eq!(average(&[], None), 0.0);
    }

    #[test]
    fn test_category_average() {
        let txs = vec![tx(10.0, Some(1)), tx(30.0, Some(1)), tx(100.0, Some(2))];
        assert_eq!(average(&txs, Some(1)), 20.0);
        assert_eq!(average(&txs, Some(2)), 100.0);
    }

    #[test]
    fn test_unknown_category_uses_global_average() {
        let txs = vec![tx(10.0, Some(1)), tx(20.0, None), tx(30.0, Some(2))];
        assert_eq!(average(&txs, Some(9)), 20.0);
        assert_eq!(average(&txs, None), 20.0);
    }

    #[test]
    fn test_clamped_to_zero() {
        let txs = vec![tx(-50.0, Some(1)), tx(10.0, Some(1))];
        assert_eq!(average(&txs, Some(1)), 0.0);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(Vec::<f64>::new()), None);
        assert_eq!(mean([1.0, 2.0, 6.0]), Some(3.0));
    }
}
