//! Spending prediction
//!
//! Linear models over dummy-encoded calendar features, with averaging
//! fallbacks when a history is too short or degenerate to fit.

mod engine;
pub mod fallback;
pub mod features;
pub mod regression;
mod types;

pub(crate) use engine::{month_range, month_start, months_before};
pub use engine::PredictionEngine;
pub use regression::{FitOutcome, FittedModel, OlsFitter};
pub use types::{
    DailyAnalysisPoint, DailySpendingAnalysis, MonthlySeries, QuickPrediction, WeekdayFactor,
    WEEKDAY_LABELS,
};
