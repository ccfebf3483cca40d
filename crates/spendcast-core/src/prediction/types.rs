//! Result types returned by the prediction engine

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Trailing monthly averages keyed by `YYYY-MM` (chronological key order)
pub type MonthlySeries = BTreeMap<String, f64>;

/// Weekday labels for the Mon..Sat dummy columns
pub const WEEKDAY_LABELS: [&str; 6] = [
    "MONDAY",
    "TUESDAY",
    "WEDNESDAY",
    "THURSDAY",
    "FRIDAY",
    "SATURDAY",
];

/// Effect of one weekday relative to Sunday
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdayFactor {
    pub weekday: String,
    pub coefficient: f64,
}

/// One day of the daily backtest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAnalysisPoint {
    pub date: NaiveDate,
    pub actual_amount: f64,
    pub predicted_amount: f64,
    /// `actual - predicted`
    pub error: f64,
}

/// In-sample diagnostics of the day-of-week spending model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySpendingAnalysis {
    pub r_squared: f64,
    pub mean_absolute_error: f64,
    /// Intercept, i.e. expected Sunday spending
    pub base_spending: f64,
    /// Monday through Saturday, in order
    pub daily_factors: Vec<WeekdayFactor>,
    pub series: Vec<DailyAnalysisPoint>,
}

impl DailySpendingAnalysis {
    /// Zeroed report for histories too short to analyze
    pub fn empty() -> Self {
        Self {
            r_squared: 0.0,
            mean_absolute_error: 0.0,
            base_spending: 0.0,
            daily_factors: Vec::new(),
            series: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Category forecast when a category is given, daily forecast otherwise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickPrediction {
    pub user_id: i64,
    pub date: NaiveDate,
    pub category_id: Option<i64>,
    pub predicted: f64,
}
