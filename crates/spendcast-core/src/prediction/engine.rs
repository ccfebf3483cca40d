//! Prediction engine - turns a user's history into spending forecasts
//!
//! Every operation loads a fresh snapshot from the store, so results depend
//! only on the stored transactions and the engine's notion of "today".

use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate};
use tracing::{debug, warn};

use crate::config::PredictionConfig;
use crate::error::Result;
use crate::models::TransactionRecord;
use crate::store::TransactionStore;

use super::fallback;
use super::features::{FeatureAxes, FeatureEncoder, DAY_DUMMY_COUNT};
use super::regression::{FitOutcome, FittedModel, OlsFitter};
use super::types::{
    DailyAnalysisPoint, DailySpendingAnalysis, MonthlySeries, QuickPrediction, WeekdayFactor,
    WEEKDAY_LABELS,
};

/// First day of the month containing `date`
pub(crate) fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Month starts from `start` to `end`, both inclusive
pub(crate) fn month_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut months = Vec::new();
    let mut current = month_start(start);
    while current <= end {
        months.push(current);
        match current.checked_add_months(Months::new(1)) {
            Some(next) => current = next,
            None => break,
        }
    }
    months
}

/// `date` moved back `months` months, saturating at the earliest date
pub(crate) fn months_before(date: NaiveDate, months: i64) -> NaiveDate {
    u32::try_from(months)
        .ok()
        .and_then(|m| date.checked_sub_months(Months::new(m)))
        .unwrap_or(NaiveDate::MIN)
}

/// Drop records whose amount cannot take part in arithmetic
fn usable(mut transactions: Vec<TransactionRecord>) -> Vec<TransactionRecord> {
    transactions.retain(|t| t.amount.is_finite());
    transactions
}

/// Total spent per calendar day
fn daily_totals(transactions: &[TransactionRecord]) -> BTreeMap<NaiveDate, f64> {
    let mut totals = BTreeMap::new();
    for t in transactions {
        *totals.entry(t.date).or_insert(0.0) += t.amount;
    }
    totals
}

/// Every calendar day between the first and last day with data, zero-filled
fn gap_filled_days(totals: &BTreeMap<NaiveDate, f64>) -> Vec<(NaiveDate, f64)> {
    let (Some(first), Some(last)) = (totals.keys().next(), totals.keys().next_back()) else {
        return Vec::new();
    };
    first
        .iter_days()
        .take_while(|day| day <= last)
        .map(|day| (day, totals.get(&day).copied().unwrap_or(0.0)))
        .collect()
}

fn average_daily_total(totals: &BTreeMap<NaiveDate, f64>) -> f64 {
    fallback::mean(totals.values().copied())
        .unwrap_or(0.0)
        .max(0.0)
}

/// Outcome of fitting the day-of-week model
enum DailyFit {
    /// Not more distinct days with data than weekday dummies
    Insufficient,
    Singular,
    Fitted {
        model: FittedModel,
        sample: Vec<(NaiveDate, f64)>,
    },
}

/// Spending prediction over a read-only transaction store
pub struct PredictionEngine<'a, S: TransactionStore + ?Sized> {
    store: &'a S,
    fitter: OlsFitter,
    today: Option<NaiveDate>,
}

impl<'a, S: TransactionStore + ?Sized> PredictionEngine<'a, S> {
    /// Create an engine with default configuration
    pub fn new(store: &'a S) -> Self {
        Self::with_config(store, &PredictionConfig::default())
    }

    /// Create an engine with explicit configuration
    pub fn with_config(store: &'a S, config: &PredictionConfig) -> Self {
        Self {
            store,
            fitter: OlsFitter::new(config.singular_tolerance),
            today: None,
        }
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

    /// Verify the user exists, then load their usable transactions
    fn load(&self, user_id: i64) -> Result<Vec<TransactionRecord>> {
        self.store.get_user(user_id)?;
        Ok(usable(self.store.list_transactions_for_user(user_id)?))
    }

    /// Forecast the amount of a transaction on `date`, optionally in a category
    ///
    /// Regresses amount on day-of-week, month and category dummies. Falls back
    /// to the (category) average when the history cannot support the fit.
    pub fn predict(&self, user_id: i64, date: NaiveDate, category_id: Option<i64>) -> Result<f64> {
        let transactions = self.load(user_id)?;
        if transactions.is_empty() {
            return Ok(0.0);
        }

        let encoder = FeatureEncoder::for_transactions(FeatureAxes::FULL, &transactions);
        let rows = transactions.len();
        let columns = encoder.column_count();
        if rows <= columns {
            debug!(
                user_id,
                rows, columns, "Not enough transactions for regression, using average"
            );
            return Ok(fallback::average(&transactions, category_id));
        }

        let (x, y) = encoder.encode(&transactions);
        match self.fitter.fit(&x, &y) {
            FitOutcome::Fitted(model) => {
                let features = encoder.encode_point(date, category_id);
                let predicted = model.predict(&features);
                debug!(user_id, %date, ?category_id, predicted, "Category forecast");
                Ok(predicted.max(0.0))
            }
            FitOutcome::Singular => {
                warn!(
                    user_id,
                    rows, columns, "Singular fit while predicting, falling back to averages"
                );
                Ok(fallback::average(&transactions, category_id))
            }
        }
    }

    fn fit_daily(&self, encoder: &FeatureEncoder, totals: &BTreeMap<NaiveDate, f64>) -> DailyFit {
        if totals.len() <= DAY_DUMMY_COUNT {
            return DailyFit::Insufficient;
        }

        let sample = gap_filled_days(totals);
        let (x, y) = encoder.encode_samples(sample.iter().map(|(day, total)| (*day, None, *total)));
        match self.fitter.fit(&x, &y) {
            FitOutcome::Fitted(model) => DailyFit::Fitted { model, sample },
            FitOutcome::Singular => DailyFit::Singular,
        }
    }

    /// Forecast the total spent on `date` from day-of-week effects alone
    pub fn predict_daily_spending(&self, user_id: i64, date: NaiveDate) -> Result<f64> {
        let transactions = self.load(user_id)?;
        if transactions.is_empty() {
            return Ok(0.0);
        }

        let totals = daily_totals(&transactions);
        let encoder = FeatureEncoder::day_of_week();
        match self.fit_daily(&encoder, &totals) {
            DailyFit::Fitted { model, .. } => {
                Ok(model.predict(&encoder.encode_point(date, None)).max(0.0))
            }
            DailyFit::Insufficient => {
                debug!(
                    user_id,
                    days = totals.len(),
                    "Too few days with data, using daily average"
                );
                Ok(average_daily_total(&totals))
            }
            DailyFit::Singular => {
                warn!(user_id, "Singular daily fit, using daily average");
                Ok(average_daily_total(&totals))
            }
        }
    }

    /// Sum of everything dated on or after `today - months`, per month
    pub fn rolling_monthly_average(&self, user_id: i64, months: i64) -> Result<f64> {
        self.store.get_user(user_id)?;
        if months <= 0 {
            return Ok(0.0);
        }

        let from = months_before(self.today(), months);
        let transactions = usable(self.store.list_transactions_for_user_since(user_id, from)?);
        let sum: f64 = transactions.iter().map(|t| t.amount).sum();

        Ok((sum / months as f64).max(0.0))
    }

    /// Trailing `window`-month average of monthly totals, from the first
    /// month with data through the current month with no gaps
    pub fn rolling_monthly_series(&self, user_id: i64, window: i64) -> Result<MonthlySeries> {
        let transactions = self.load(user_id)?;
        if transactions.is_empty() || window <= 0 {
            return Ok(MonthlySeries::new());
        }

        let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for t in &transactions {
            *totals.entry(month_start(t.date)).or_insert(0.0) += t.amount;
        }

        let current = month_start(self.today());
        let earliest = totals
            .keys()
            .next()
            .map_or(current, |first| (*first).min(current));

        let months = month_range(earliest, current);
        let values: Vec<f64> = months
            .iter()
            .map(|m| totals.get(m).copied().unwrap_or(0.0))
            .collect();

        let window = usize::try_from(window).unwrap_or(usize::MAX);
        let mut series = MonthlySeries::new();
        for (i, month) in months.iter().enumerate() {
            let start = (i + 1).saturating_sub(window);
            let average = fallback::mean(values[start..=i].iter().copied()).unwrap_or(0.0);
            series.insert(month.format("%Y-%m").to_string(), average);
        }

        Ok(series)
    }

    /// Backtest the day-of-week model against the days it was fitted on
    ///
    /// Returns an empty report for fewer than seven days with data and `None`
    /// when the fit itself is singular.
    pub fn analyze_daily_spending(&self, user_id: i64) -> Result<Option<DailySpendingAnalysis>> {
        let transactions = self.load(user_id)?;
        let totals = daily_totals(&transactions);
        let encoder = FeatureEncoder::day_of_week();

        let (model, sample) = match self.fit_daily(&encoder, &totals) {
            DailyFit::Insufficient => return Ok(Some(DailySpendingAnalysis::empty())),
            DailyFit::Singular => {
                warn!(user_id, "Singular daily fit, no analysis available");
                return Ok(None);
            }
            DailyFit::Fitted { model, sample } => (model, sample),
        };

        let series: Vec<DailyAnalysisPoint> = sample
            .into_iter()
            .map(|(date, actual)| {
                let predicted = model.predict(&encoder.encode_point(date, None)).max(0.0);
                DailyAnalysisPoint {
                    date,
                    actual_amount: actual,
                    predicted_amount: predicted,
                    error: actual - predicted,
                }
            })
            .collect();

        let mean_absolute_error =
            fallback::mean(series.iter().map(|p| p.error.abs())).unwrap_or(0.0);

        let daily_factors = WEEKDAY_LABELS
            .iter()
            .zip(&model.coefficients)
            .map(|(label, coefficient)| WeekdayFactor {
                weekday: label.to_string(),
                coefficient: *coefficient,
            })
            .collect();

        debug!(
            user_id,
            days = series.len(),
            r_squared = model.r_squared,
            mean_absolute_error,
            "Daily spending analysis complete"
        );

        Ok(Some(DailySpendingAnalysis {
            r_squared: model.r_squared,
            mean_absolute_error,
            base_spending: model.intercept,
            daily_factors,
            series,
        }))
    }

    /// Category forecast when `category_id` is given, daily forecast otherwise;
    /// `date` defaults to today
    pub fn quick_prediction(
        &self,
        user_id: i64,
        date: Option<NaiveDate>,
        category_id: Option<i64>,
    ) -> Result<QuickPrediction> {
        let date = date.unwrap_or_else(|| self.today());
        let predicted = match category_id {
            Some(_) => self.predict(user_id, date, category_id)?,
            None => self.predict_daily_spending(user_id, date)?,
        };

        Ok(QuickPrediction {
            user_id,
            date,
            category_id,
            predicted,
        })
    }
}
