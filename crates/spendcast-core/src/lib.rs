//! Spendcast Core Library
//!
//! Spending prediction for the Spendcast personal finance tracker:
//! - Feature encoding of transactions (day-of-week, month, category dummies)
//! - Ordinary least squares fitting with singular-fit detection
//! - Historical-average fallbacks when regression is not possible
//! - Prediction engine: point forecasts, rolling averages, backtests
//! - Spending views (monthly totals, trailing daily window)
//! - SQLite-backed transaction store

pub mod analysis;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod prediction;
pub mod store;

pub use analysis::{DailySpendingWindow, SpendingAnalyzer};
pub use config::PredictionConfig;
pub use db::Database;
pub use error::{Error, Result};
pub use prediction::{
    DailyAnalysisPoint, DailySpendingAnalysis, FitOutcome, FittedModel, PredictionEngine,
    QuickPrediction,
};
pub use store::{MemoryStore, TransactionStore};
