//! Spendcast CLI - Spending prediction for a personal finance tracker
//!
//! Usage:
//!   spendcast init                            Initialize database
//!   spendcast users add ana                   Add a user
//!   spendcast daily --user 1 --date DATE      Forecast spending for a day
//!   spendcast rolling-series --user 1         Trailing monthly averages
//!   spendcast serve --port 3000               Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref())?;
    let json = cli.json;

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Users { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None | Some(UsersAction::List) => commands::cmd_users_list(&db, json),
                Some(UsersAction::Add { username }) => {
                    commands::cmd_users_add(&db, &username, json)
                }
            }
        }
        Commands::Categories { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None => commands::cmd_categories_list(&db, None, json),
                Some(CategoriesAction::List { user }) => {
                    commands::cmd_categories_list(&db, user, json)
                }
                Some(CategoriesAction::Add {
                    name,
                    category_type,
                    user,
                }) => commands::cmd_categories_add(&db, &name, &category_type, user, json),
            }
        }
        Commands::Transactions { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                TransactionsAction::List { user, limit } => {
                    commands::cmd_transactions_list(&db, user, limit, json)
                }
                TransactionsAction::Add {
                    user,
                    amount,
                    date,
                    category,
                    description,
                } => {
                    let date = match date {
                        Some(date) => commands::parse_date(&date)?,
                        None => chrono::Local::now().date_naive(),
                    };
                    commands::cmd_transactions_add(
                        &db,
                        user,
                        amount,
                        date,
                        category,
                        description.as_deref(),
                        json,
                    )
                }
            }
        }
        Commands::Predict {
            user,
            date,
            category,
        } => {
            let db = commands::open_db(&cli.db)?;
            let date = commands::parse_date(&date)?;
            commands::cmd_predict(&db, &config, user, date, category, json)
        }
        Commands::Daily { user, date } => {
            let db = commands::open_db(&cli.db)?;
            let date = commands::parse_date(&date)?;
            commands::cmd_daily(&db, &config, user, date, json)
        }
        Commands::RollingAverage { user, months } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_rolling_average(&db, &config, user, months, json)
        }
        Commands::RollingSeries { user, window } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_rolling_series(&db, &config, user, window, json)
        }
        Commands::Analyze { user } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_analyze(&db, &config, user, json)
        }
        Commands::Monthly {
            user,
            months,
            category,
        } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_monthly(&db, &config, user, months, category, json)
        }
        Commands::DailySpending {
            user,
            days,
            category,
        } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_daily_spending(&db, &config, user, days, category, json)
        }
        Commands::Serve {
            port,
            host,
            no_auth,
            allowed_origins,
        } => commands::cmd_serve(&cli.db, config, &host, port, no_auth, allowed_origins).await,
    }
}
