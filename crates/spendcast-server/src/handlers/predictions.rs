//! Prediction handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::parse_date;
use crate::{AppError, AppState};
use spendcast_core::prediction::MonthlySeries;
use spendcast_core::{DailySpendingAnalysis, QuickPrediction};

#[derive(Debug, Deserialize)]
pub struct PredictQuery {
    pub user_id: i64,
    /// Target date (YYYY-MM-DD)
    pub date: String,
    pub category_id: Option<i64>,
}

/// A single forecast
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub user_id: i64,
    pub date: NaiveDate,
    pub category_id: Option<i64>,
    pub predicted: f64,
}

fn required_date(value: &str) -> Result<NaiveDate, AppError> {
    parse_date(Some(value), "date")?.ok_or_else(|| AppError::bad_request("date is required"))
}

/// GET /api/predict - Forecast a transaction amount for a date and category
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PredictQuery>,
) -> Result<Json<PredictionResponse>, AppError> {
    let date = required_date(&params.date)?;
    let predicted = state
        .engine()
        .predict(params.user_id, date, params.category_id)?;

    Ok(Json(PredictionResponse {
        user_id: params.user_id,
        date,
        category_id: params.category_id,
        predicted,
    }))
}

#[derive(Debug, Deserialize)]
pub struct PredictTestQuery {
    pub user_id: i64,
    pub category_id: Option<i64>,
    /// Defaults to today
    pub date: Option<String>,
}

/// GET /api/predict/test - Category forecast if a category is given, daily otherwise
pub async fn predict_test(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PredictTestQuery>,
) -> Result<Json<QuickPrediction>, AppError> {
    let date = parse_date(params.date.as_deref(), "date")?;
    let prediction = state
        .engine()
        .quick_prediction(params.user_id, date, params.category_id)?;

    Ok(Json(prediction))
}

#[derive(Debug, Deserialize)]
pub struct PredictDailyQuery {
    pub user_id: i64,
    pub date: String,
}

/// GET /api/predict/daily - Forecast total spending for a date
pub async fn predict_daily(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PredictDailyQuery>,
) -> Result<Json<PredictionResponse>, AppError> {
    let date = required_date(&params.date)?;
    let predicted = state
        .engine()
        .predict_daily_spending(params.user_id, date)?;

    Ok(Json(PredictionResponse {
        user_id: params.user_id,
        date,
        category_id: None,
        predicted,
    }))
}

#[derive(Debug, Deserialize)]
pub struct RollingAverageQuery {
    pub user_id: i64,
    pub months: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RollingAverageResponse {
    pub user_id: i64,
    pub months: i64,
    pub average: f64,
}

/// GET /api/predict/rolling-average - Average monthly spending over recent months
pub async fn rolling_average(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RollingAverageQuery>,
) -> Result<Json<RollingAverageResponse>, AppError> {
    let months = params.months.unwrap_or(state.prediction.rolling_months);
    let average = state
        .engine()
        .rolling_monthly_average(params.user_id, months)?;

    Ok(Json(RollingAverageResponse {
        user_id: params.user_id,
        months,
        average,
    }))
}

#[derive(Debug, Deserialize)]
pub struct RollingSeriesQuery {
    pub user_id: i64,
    pub window: Option<i64>,
}

/// GET /api/predict/rolling-series - Trailing monthly averages, month -> value
pub async fn rolling_series(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RollingSeriesQuery>,
) -> Result<Json<MonthlySeries>, AppError> {
    let window = params.window.unwrap_or(state.prediction.series_window);
    let series = state
        .engine()
        .rolling_monthly_series(params.user_id, window)?;

    Ok(Json(series))
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: i64,
}

/// GET /api/predict/analysis - Backtest of the day-of-week model
///
/// Returns `null` when the model could not be fitted.
pub async fn daily_analysis(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UserQuery>,
) -> Result<Json<Option<DailySpendingAnalysis>>, AppError> {
    let analysis = state.engine().analyze_daily_spending(params.user_id)?;
    Ok(Json(analysis))
}
