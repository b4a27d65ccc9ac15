//! Favorite foods
//!
//! A per-user set of bookmarked foods, toggled on and off.

use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use super::Food;
use crate::db::DbResult;

/// A favorite entry joined with its food
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Favorite {
    pub food: Food,
    pub added_at: String,
}

impl Favorite {
    /// Toggle a food in the user's favorites. Returns true if the food is
    /// now a favorite, false if it was removed.
    pub fn toggle(conn: &Connection, user_id: i64, food_id: i64) -> DbResult<bool> {
        let removed = conn.execute(
            "DELETE FROM favorite_foods WHERE user_id = ?1 AND food_id = ?2",
            params![user_id, food_id],
        )?;
        if removed > 0 {
            return Ok(false);
        }

        conn.execute(
            "INSERT INTO favorite_foods (user_id, food_id) VALUES (?1, ?2)",
            params![user_id, food_id],
        )?;
        Ok(true)
    }

    /// Check whether a food is in the user's favorites
    pub fn contains(conn: &Connection, user_id: i64, food_id: i64) -> DbResult<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM favorite_foods WHERE user_id = ?1 AND food_id = ?2",
            params![user_id, food_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// List the user's favorites, most recently added first
    pub fn list_for_user(conn: &Connection, user_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT f.*, ff.added_at
            FROM favorite_foods ff
            JOIN foods f ON f.id = ff.food_id
            WHERE ff.user_id = ?1
            ORDER BY ff.added_at DESC, ff.id DESC
            "#,
        )?;

        let favorites = stmt
            .query_map([user_id], |row| {
                Ok(Favorite {
                    food: Food {
                        id: row.get("id")?,
                        name: row.get("name")?,
                        nutrition: crate::models::Nutrition {
                            calories: row.get("calories")?,
                            protein: row.get("protein")?,
                            carbs: row.get("carbs")?,
                            fat: row.get("fat")?,
                            cholesterol_mg: row.get("cholesterol_mg")?,
                            sodium_mg: row.get("sodium_mg")?,
                            fibre_g: row.get("fibre_g")?,
                            vitc_mg: row.get("vitc_mg")?,
                            vita_ug: row.get("vita_ug")?,
                            iron_mg: row.get("iron_mg")?,
                        },
                        category: row.get("category")?,
                        created_at: row.get("created_at")?,
                    },
                    added_at: row.get("added_at")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(favorites)
    }
}
