//! Prediction and spending view commands

use anyhow::Result;
use chrono::NaiveDate;
use spendcast_core::db::Database;
use spendcast_core::{PredictionConfig, PredictionEngine, SpendingAnalyzer};

use super::print_json;

/// Width of the bar chart used by the series views
const BAR_WIDTH: usize = 30;

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let filled = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(filled.min(BAR_WIDTH))
}

pub fn cmd_predict(
    db: &Database,
    config: &PredictionConfig,
    user: i64,
    date: NaiveDate,
    category: Option<i64>,
    json: bool,
) -> Result<()> {
    let engine = PredictionEngine::with_config(db, config);
    let predicted = engine.predict(user, date, category)?;

    if json {
        return print_json(&serde_json::json!({
            "user_id": user,
            "date": date,
            "category_id": category,
            "predicted": predicted,
        }));
    }

    let scope = category
        .map(|id| format!("category {}", id))
        .unwrap_or_else(|| "any category".to_string());
    println!("🔮 Predicted amount on {} ({}): {:.2}", date, scope, predicted);
    Ok(())
}

pub fn cmd_daily(
    db: &Database,
    config: &PredictionConfig,
    user: i64,
    date: NaiveDate,
    json: bool,
) -> Result<()> {
    let engine = PredictionEngine::with_config(db, config);
    let predicted = engine.predict_daily_spending(user, date)?;

    if json {
        return print_json(&serde_json::json!({
            "user_id": user,
            "date": date,
            "predicted": predicted,
        }));
    }

    println!(
        "🔮 Predicted spending on {} ({}): {:.2}",
        date,
        date.format("%A"),
        predicted
    );
    Ok(())
}

pub fn cmd_rolling_average(
    db: &Database,
    config: &PredictionConfig,
    user: i64,
    months: Option<i64>,
    json: bool,
) -> Result<()> {
    let months = months.unwrap_or(config.rolling_months);
    let engine = PredictionEngine::with_config(db, config);
    let average = engine.rolling_monthly_average(user, months)?;

    if json {
        return print_json(&serde_json::json!({
            "user_id": user,
            "months": months,
            "average": average,
        }));
    }

    println!("📊 Average monthly spending (last {} months): {:.2}", months, average);
    Ok(())
}

pub fn cmd_rolling_series(
    db: &Database,
    config: &PredictionConfig,
    user: i64,
    window: Option<i64>,
    json: bool,
) -> Result<()> {
    let window = window.unwrap_or(config.series_window);
    let engine = PredictionEngine::with_config(db, config);
    let series = engine.rolling_monthly_series(user, window)?;

    if json {
        return print_json(&series);
    }

    if series.is_empty() {
        println!("No monthly data to average.");
        return Ok(());
    }

    let max = series.values().copied().fold(0.0_f64, f64::max);
    println!();
    println!("📈 Rolling {}-month average", window);
    println!("   ─────────────────────────────────────────────");
    for (month, value) in &series {
        println!("   {} │ {:>10.2} │ {}", month, value, bar(*value, max));
    }

    Ok(())
}

pub fn cmd_analyze(db: &Database, config: &PredictionConfig, user: i64, json: bool) -> Result<()> {
    let engine = PredictionEngine::with_config(db, config);
    let analysis = engine.analyze_daily_spending(user)?;

    if json {
        return print_json(&analysis);
    }

    let analysis = match analysis {
        Some(analysis) if !analysis.is_empty() => analysis,
        Some(_) => {
            println!("Not enough history yet: need spending on at least 7 different days.");
            return Ok(());
        }
        None => {
            println!("⚠️  The weekday model could not be fitted for this history.");
            return Ok(());
        }
    };

    println!();
    println!("📅 Weekday spending model");
    println!("   ─────────────────────────────────────────────");
    println!("   Days analyzed:       {}", analysis.series.len());
    println!("   R²:                  {:.3}", analysis.r_squared);
    println!("   Mean absolute error: {:.2}", analysis.mean_absolute_error);
    println!("   Sunday baseline:     {:.2}", analysis.base_spending);
    println!();
    for factor in &analysis.daily_factors {
        println!("   {:<10} {:>+10.2}", factor.weekday, factor.coefficient);
    }

    Ok(())
}

pub fn cmd_monthly(
    db: &Database,
    config: &PredictionConfig,
    user: i64,
    months: Option<i64>,
    category: Option<i64>,
    json: bool,
) -> Result<()> {
    let months = months.unwrap_or(config.rolling_months);
    let monthly = SpendingAnalyzer::new(db).monthly_spending(user, months, category)?;

    if json {
        return print_json(&monthly);
    }

    if monthly.is_empty() {
        println!("Nothing to show for {} months.", months);
        return Ok(());
    }

    let max = monthly.values().copied().fold(0.0_f64, f64::max);
    println!();
    println!("🗓️  Monthly spending");
    println!("   ─────────────────────────────────────────────");
    for (month, total) in &monthly {
        println!("   {} │ {:>10.2} │ {}", month, total, bar(*total, max));
    }

    Ok(())
}

pub fn cmd_daily_spending(
    db: &Database,
    config: &PredictionConfig,
    user: i64,
    days: Option<i64>,
    category: Option<i64>,
    json: bool,
) -> Result<()> {
    let days = days.unwrap_or(config.analysis_days);
    let window = SpendingAnalyzer::new(db).daily_spending(user, days, category)?;

    if json {
        return print_json(&window);
    }

    let Some(window) = window else {
        println!("Nothing to show for {} days.", days);
        return Ok(());
    };

    let max = window.series.values().copied().fold(0.0_f64, f64::max);
    println!();
    println!("🗓️  Daily spending {} → {}", window.start, window.end);
    println!("   ─────────────────────────────────────────────");
    for (day, total) in &window.series {
        println!("   {} │ {:>10.2} │ {}", day, total, bar(*total, max));
    }
    println!("   ─────────────────────────────────────────────");
    println!("   Total: {:.2}", window.total);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_scales_to_max() {
        assert_eq!(bar(10.0, 10.0).chars().count(), BAR_WIDTH);
        assert_eq!(bar(5.0, 10.0).chars().count(), BAR_WIDTH / 2);
        assert!(bar(0.0, 10.0).is_empty());
        assert!(bar(-3.0, 10.0).is_empty());
        assert!(bar(3.0, 0.0).is_empty());
    }
}
