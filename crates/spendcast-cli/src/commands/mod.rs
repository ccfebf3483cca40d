//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init) and shared utilities (open_db, load_config)
//! - `entities` - Users, categories and transactions
//! - `predict` - Forecasts, rolling averages and spending views
//! - `serve` - Web server command

pub mod core;
pub mod entities;
pub mod predict;
pub mod serve;

// Re-export command functions for main.rs
pub use self::core::*;
pub use entities::*;
pub use predict::*;
pub use serve::*;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;

/// Parse a `YYYY-MM-DD` argument
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}' (use YYYY-MM-DD)", value))
}

/// Print `value` as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
