//! Spending view handlers

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{AppError, AppState};
use spendcast_core::DailySpendingWindow;

#[derive(Debug, Deserialize)]
pub struct MonthlySpendingQuery {
    pub user_id: i64,
    pub months: Option<i64>,
    pub category_id: Option<i64>,
}

/// GET /api/analysis/monthly - Month -> total for recent months
pub async fn monthly_spending(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MonthlySpendingQuery>,
) -> Result<Json<BTreeMap<String, f64>>, AppError> {
    let months = params.months.unwrap_or(state.prediction.rolling_months);
    let monthly = state
        .analyzer()
        .monthly_spending(params.user_id, months, params.category_id)?;

    Ok(Json(monthly))
}

#[derive(Debug, Deserialize)]
pub struct DailySpendingQuery {
    pub user_id: i64,
    pub days: Option<i64>,
    pub category_id: Option<i64>,
}

/// GET /api/analysis/daily - Day totals for a trailing window
///
/// Returns `null` for a non-positive window.
pub async fn daily_spending(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DailySpendingQuery>,
) -> Result<Json<Option<DailySpendingWindow>>, AppError> {
    let days = params.days.unwrap_or(state.prediction.analysis_days);
    let window = state
        .analyzer()
        .daily_spending(params.user_id, days, params.category_id)?;

    Ok(Json(window))
}
