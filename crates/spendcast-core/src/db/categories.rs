//! Category operations

use rusqlite::{params, OptionalExtension};

use super::Database;
use crate::error::{Error, Result};
use crate::models::{Category, CategoryType};

fn row_to_category(row: &rusqlite::Row) -> rusqlite::Result<Category> {
    let type_str: String = row.get(3)?;
    Ok(Category {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        category_type: type_str.parse().unwrap_or(CategoryType::Expense),
    })
}

impl Database {
    /// Create a category; `user_id = None` makes it global
    pub fn create_category(
        &self,
        user_id: Option<i64>,
        name: &str,
        category_type: CategoryType,
    ) -> Result<i64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidData("category name must not be empty".into()));
        }

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO categories (user_id, name, category_type) VALUES (?, ?, ?)",
            params![user_id, name, category_type.as_str()],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Categories visible to a user (global plus their own), or only global
    /// categories when `user_id` is `None`
    pub fn list_categories(&self, user_id: Option<i64>) -> Result<Vec<Category>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, name, category_type FROM categories
            WHERE user_id IS NULL OR user_id = ?
            ORDER BY id
            "#,
        )?;

        let categories = stmt
            .query_map(params![user_id], row_to_category)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(categories)
    }

    /// Get a category by ID
    pub fn get_category(&self, id: i64) -> Result<Option<Category>> {
        let conn = self.conn()?;
        let category = conn
            .query_row(
                "SELECT id, user_id, name, category_type FROM categories WHERE id = ?",
                params![id],
                row_to_category,
            )
            .optional()?;

        Ok(category)
    }
}
