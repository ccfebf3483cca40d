//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Spendcast - Predict where your money goes next
#[derive(Parser)]
#[command(name = "spendcast")]
#[command(about = "Spending prediction for a personal finance tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "spendcast.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Prediction config file (defaults to the data dir override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Manage users (add, list)
    Users {
        #[command(subcommand)]
        action: Option<UsersAction>,
    },

    /// Manage categories (add, list)
    Categories {
        #[command(subcommand)]
        action: Option<CategoriesAction>,
    },

    /// Manage transactions (add, list)
    Transactions {
        #[command(subcommand)]
        action: TransactionsAction,
    },

    /// Predict a transaction amount for a date (and optionally a category)
    Predict {
        /// User ID
        #[arg(short, long)]
        user: i64,

        /// Target date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,

        /// Category ID
        #[arg(short, long)]
        category: Option<i64>,
    },

    /// Predict total spending for a date from weekday patterns
    Daily {
        /// User ID
        #[arg(short, long)]
        user: i64,

        /// Target date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,
    },

    /// Average monthly spending over the last N months
    RollingAverage {
        /// User ID
        #[arg(short, long)]
        user: i64,

        /// Number of months (defaults to config)
        #[arg(short, long)]
        months: Option<i64>,
    },

    /// Trailing average of monthly totals, one value per month
    RollingSeries {
        /// User ID
        #[arg(short, long)]
        user: i64,

        /// Window width in months (defaults to config)
        #[arg(short, long)]
        window: Option<i64>,
    },

    /// Backtest the weekday spending model
    Analyze {
        /// User ID
        #[arg(short, long)]
        user: i64,
    },

    /// Monthly spending totals for recent months
    Monthly {
        /// User ID
        #[arg(short, long)]
        user: i64,

        /// Number of months including the current one (defaults to config)
        #[arg(short, long)]
        months: Option<i64>,

        /// Only count this category
        #[arg(short, long)]
        category: Option<i64>,
    },

    /// Daily spending totals for recent days
    DailySpending {
        /// User ID
        #[arg(short, long)]
        user: i64,

        /// Number of days including today (defaults to config)
        #[arg(short, long)]
        days: Option<i64>,

        /// Only count this category
        #[arg(short, long)]
        category: Option<i64>,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        ///
        /// WARNING: Do not use this flag when exposing the server to a network.
        /// By default, requests need an API key from SPENDCAST_API_KEYS.
        #[arg(long)]
        no_auth: bool,

        /// Allowed CORS origin (repeatable)
        #[arg(long = "allow-origin")]
        allowed_origins: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum UsersAction {
    /// List users
    List,

    /// Add a user
    Add {
        /// Username
        username: String,
    },
}

#[derive(Subcommand)]
pub enum CategoriesAction {
    /// List categories visible to a user (global only without --user)
    List {
        /// User ID
        #[arg(short, long)]
        user: Option<i64>,
    },

    /// Add a category
    Add {
        /// Category name
        name: String,

        /// Category type: income, expense
        #[arg(short = 't', long = "type", default_value = "expense")]
        category_type: String,

        /// Owning user (omit for a global category)
        #[arg(short, long)]
        user: Option<i64>,
    },
}

#[derive(Subcommand)]
pub enum TransactionsAction {
    /// List a user's transactions
    List {
        /// User ID
        #[arg(short, long)]
        user: i64,

        /// Maximum number of transactions to show (most recent)
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Record a transaction
    Add {
        /// User ID
        #[arg(short, long)]
        user: i64,

        /// Amount
        #[arg(short, long, allow_negative_numbers = true)]
        amount: f64,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Category ID
        #[arg(short, long)]
        category: Option<i64>,

        /// Free-text description
        #[arg(long)]
        description: Option<String>,
    },
}
