//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `load_config` - Resolve the prediction config
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use spendcast_core::{db::Database, PredictionConfig};

/// Open (and migrate) the database
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    Database::new(path_str).context("Failed to open database")
}

/// Load prediction config from `--config`, the data dir override, or defaults
pub fn load_config(path: Option<&Path>) -> Result<PredictionConfig> {
    match path {
        Some(path) => PredictionConfig::from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => PredictionConfig::load().context("Failed to load prediction config"),
    }
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path)?;
    let users = db.list_users()?;

    println!("✅ Database initialized successfully!");
    if users.is_empty() {
        println!();
        println!("Next steps:");
        println!("  1. Add a user: spendcast users add <name>");
        println!("  2. Record spending: spendcast transactions add --user 1 --amount 12.50");
        println!("  3. Forecast: spendcast daily --user 1 --date 2026-01-30");
    } else {
        println!("   {} user(s) already present", users.len());
    }

    Ok(())
}
