//! Food model
//!
//! Reference nutrition data, one row per food, values per 100g. Created by
//! CSV import or manual entry; never mutated by the computation core.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use super::Nutrition;

/// A food from the reference database, nutrition per 100g
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Food {
    pub id: i64,
    pub name: String,
    #[serde(flatten)]
    pub nutrition: Nutrition,
    pub category: Option<String>,
    pub created_at: String,
}

/// Data for creating a new food
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodCreate {
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    #[serde(default)]
    pub cholesterol_mg: f64,
    #[serde(default)]
    pub sodium_mg: f64,
    #[serde(default)]
    pub fibre_g: f64,
    #[serde(default)]
    pub vitc_mg: f64,
    #[serde(default)]
    pub vita_ug: f64,
    #[serde(default)]
    pub iron_mg: f64,
    pub category: Option<String>,
}

impl Food {
    /// Create a Food from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            nutrition: Nutrition {
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
        })
    }

    /// Insert a new food into the database
    pub fn create(conn: &Connection, data: &FoodCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO foods (
                name, calories, protein, carbs, fat,
                cholesterol_mg, sodium_mg, fibre_g, vitc_mg, vita_ug, iron_mg,
                category
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                data.name,
                data.calories,
                data.protein,
                data.carbs,
                data.fat,
                data.cholesterol_mg,
                data.sodium_mg,
                data.fibre_g,
                data.vitc_mg,
                data.vita_ug,
                data.iron_mg,
                data.category,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a food by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM foods WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(food) => Ok(Some(food)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Search foods by name, case-insensitive substring match
    pub fn search(conn: &Connection, query: &str, limit: i64) -> DbResult<Vec<Self>> {
        let search_pattern = format!("%{}%", query);
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM foods
            WHERE name LIKE ?1
            ORDER BY name ASC
            LIMIT ?2
            "#,
        )?;

        let foods = stmt
            .query_map(params![search_pattern, limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(foods)
    }

    /// List foods ordered by name
    pub fn list(conn: &Connection, limit: i64, offset: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM foods ORDER BY name ASC LIMIT ?1 OFFSET ?2",
        )?;

        let foods = stmt
            .query_map(params![limit, offset], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(foods)
    }

    /// Count all foods
    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM foods", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Delete all foods. Used by the CSV importer, which replaces the
    /// reference table wholesale.
    pub fn delete_all(conn: &Connection) -> DbResult<usize> {
        let rows = conn.execute("DELETE FROM foods", [])?;
        Ok(rows)
    }
}
