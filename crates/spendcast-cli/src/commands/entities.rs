//! User, category and transaction commands

use anyhow::{Context, Result};
use chrono::NaiveDate;
use spendcast_core::db::Database;
use spendcast_core::models::{CategoryType, NewTransaction};
use spendcast_core::TransactionStore;

use super::{print_json, truncate};

pub fn cmd_users_list(db: &Database, json: bool) -> Result<()> {
    let users = db.list_users()?;
    if json {
        return print_json(&users);
    }

    if users.is_empty() {
        println!("No users yet. Add one with:");
        println!("  spendcast users add <name>");
        return Ok(());
    }

    println!();
    println!("👤 Users");
    println!("   ─────────────────────────────────────────────");
    for user in users {
        println!(
            "   [{}] {} (since {})",
            user.id,
            user.username,
            user.created_at.format("%Y-%m-%d")
        );
    }

    Ok(())
}

pub fn cmd_users_add(db: &Database, username: &str, json: bool) -> Result<()> {
    let id = db
        .create_user(username)
        .with_context(|| format!("Failed to create user '{}'", username))?;

    if json {
        return print_json(&serde_json::json!({ "id": id, "username": username.trim() }));
    }
    println!("✅ Created user '{}' (id {})", username.trim(), id);
    Ok(())
}

pub fn cmd_categories_list(db: &Database, user: Option<i64>, json: bool) -> Result<()> {
    let categories = db.list_categories(user)?;
    if json {
        return print_json(&categories);
    }

    if categories.is_empty() {
        println!("No categories found.");
        return Ok(());
    }

    println!();
    println!("🏷️  Categories");
    println!("   ─────────────────────────────────────────────");
    for category in categories {
        let scope = match category.user_id {
            Some(owner) => format!("user {}", owner),
            None => "global".to_string(),
        };
        println!(
            "   [{}] {:<24} {:<8} {}",
            category.id,
            truncate(&category.name, 24),
            category.category_type,
            scope
        );
    }

    Ok(())
}

pub fn cmd_categories_add(
    db: &Database,
    name: &str,
    category_type: &str,
    user: Option<i64>,
    json: bool,
) -> Result<()> {
    let category_type: CategoryType = category_type
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let id = db
        .create_category(user, name, category_type)
        .with_context(|| format!("Failed to create category '{}'", name))?;

    if json {
        return print_json(&serde_json::json!({
            "id": id,
            "name": name.trim(),
            "category_type": category_type,
            "user_id": user,
        }));
    }
    println!("✅ Created {} category '{}' (id {})", category_type, name.trim(), id);
    Ok(())
}

pub fn cmd_transactions_list(db: &Database, user: i64, limit: usize, json: bool) -> Result<()> {
    db.get_user(user)?;
    let transactions = db.list_transactions_for_user(user)?;
    let skip = transactions.len().saturating_sub(limit);
    let recent = &transactions[skip..];

    if json {
        return print_json(&recent);
    }

    if recent.is_empty() {
        println!("No transactions found. Record one with:");
        println!("  spendcast transactions add --user {} --amount 12.50", user);
        return Ok(());
    }

    println!();
    println!("📝 Recent Transactions");
    println!("   ─────────────────────────────────────────────");
    for tx in recent {
        let category = tx
            .category_id()
            .map(|id| format!("category {}", id))
            .unwrap_or_else(|| "uncategorized".to_string());
        println!(
            "   [{}] {} │ {:>10.2} │ {}",
            tx.id, tx.date, tx.amount, category
        );
    }

    Ok(())
}

pub fn cmd_transactions_add(
    db: &Database,
    user: i64,
    amount: f64,
    date: NaiveDate,
    category: Option<i64>,
    description: Option<&str>,
    json: bool,
) -> Result<()> {
    let tx = NewTransaction {
        date,
        amount,
        category_id: category,
        description: description.map(str::to_string),
    };
    let id = db
        .insert_transaction(user, &tx)
        .context("Failed to record transaction")?;

    if json {
        return print_json(&serde_json::json!({
            "id": id,
            "user_id": user,
            "date": date,
            "amount": amount,
            "category_id": category,
        }));
    }
    println!("✅ Recorded {:.2} on {} (transaction {})", amount, date, id);
    Ok(())
}
