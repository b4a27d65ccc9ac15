//! Food Log model
//!
//! A logged food entry: references a food, carries a gram quantity and a
//! meal type, and caches the scaled nutrition computed at log time. The
//! cache is a snapshot; it is only recomputed by an explicit [`FoodLog::rescale`].

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use super::{Food, Nutrition};

/// Meal type enum
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    /// Parse from string; unknown values fall back to snack
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "breakfast" => MealType::Breakfast,
            "lunch" => MealType::Lunch,
            "dinner" => MealType::Dinner,
            _ => MealType::Snack,
        }
    }

    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];
}

/// A logged food entry with cached scaled nutrition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodLog {
    pub id: i64,
    pub user_id: i64,
    pub food_id: i64,
    /// Quantity in grams, already unit-normalized
    pub quantity: f64,
    pub meal_type: MealType,
    /// Snapshot of `food.nutrition * quantity/100`, each field rounded to
    /// one decimal at log time
    pub nutrition: Nutrition,
    pub logged_at: String,
}

/// Data for creating a food log entry
#[derive(Debug, Clone)]
pub struct FoodLogCreate {
    pub user_id: i64,
    pub food_id: i64,
    /// Quantity in grams
    pub quantity: f64,
    pub meal_type: MealType,
    /// Timestamp override; defaults to now
    pub logged_at: Option<String>,
}

/// Inclusive day window bounds for a calendar date.
///
/// End-of-day is the last representable instant of the date
/// (`23:59:59.999999`); the window is inclusive on both ends. Timestamps
/// are stored as `YYYY-MM-DD HH:MM:SS` text, so lexicographic BETWEEN
/// matches the chronological window.
pub fn day_bounds(date: NaiveDate) -> (String, String) {
    (
        format!("{} 00:00:00", date.format("%Y-%m-%d")),
        format!("{} 23:59:59.999999", date.format("%Y-%m-%d")),
    )
}

impl FoodLog {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let meal_type_str: String = row.get("meal_type")?;
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            food_id: row.get("food_id")?,
            quantity: row.get("quantity")?,
            meal_type: MealType::from_str(&meal_type_str),
            nutrition: Nutrition {
                calories: row.get::<_, Option<f64>>("cached_calories")?.unwrap_or(0.0),
                protein: row.get::<_, Option<f64>>("cached_protein")?.unwrap_or(0.0),
                carbs: row.get::<_, Option<f64>>("cached_carbs")?.unwrap_or(0.0),
                fat: row.get::<_, Option<f64>>("cached_fat")?.unwrap_or(0.0),
                cholesterol_mg: row
                    .get::<_, Option<f64>>("cached_cholesterol_mg")?
                    .unwrap_or(0.0),
                sodium_mg: row.get::<_, Option<f64>>("cached_sodium_mg")?.unwrap_or(0.0),
                fibre_g: row.get::<_, Option<f64>>("cached_fibre_g")?.unwrap_or(0.0),
                vitc_mg: row.get::<_, Option<f64>>("cached_vitc_mg")?.unwrap_or(0.0),
                vita_ug: row.get::<_, Option<f64>>("cached_vita_ug")?.unwrap_or(0.0),
                iron_mg: row.get::<_, Option<f64>>("cached_iron_mg")?.unwrap_or(0.0),
            },
            logged_at: row.get("logged_at")?,
        })
    }

    /// Create a new food log entry.
    ///
    /// Scaled nutrition is computed from the referenced food at creation
    /// time and cached on the row.
    pub fn create(conn: &Connection, data: &FoodLogCreate) -> DbResult<Self> {
        let food = Food::get_by_id(conn, data.food_id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))?;

        let nutrition = food.nutrition.scale_per_100g(data.quantity);
        let logged_at = data
            .logged_at
            .clone()
            .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string());

        conn.execute(
            r#"
            INSERT INTO food_logs (
                user_id, food_id, quantity, meal_type,
                cached_calories, cached_protein, cached_carbs, cached_fat,
                cached_cholesterol_mg, cached_sodium_mg, cached_fibre_g,
                cached_vitc_mg, cached_vita_ug, cached_iron_mg,
                logged_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            "#,
            params![
                data.user_id,
                data.food_id,
                data.quantity,
                data.meal_type.as_str(),
                nutrition.calories,
                nutrition.protein,
                nutrition.carbs,
                nutrition.fat,
                nutrition.cholesterol_mg,
                nutrition.sodium_mg,
                nutrition.fibre_g,
                nutrition.vitc_mg,
                nutrition.vita_ug,
                nutrition.iron_mg,
                logged_at,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a food log by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM food_logs WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(log) => Ok(Some(log)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get all of a user's entries within one calendar day, newest first
    pub fn get_for_user_day(
        conn: &Connection,
        user_id: i64,
        date: NaiveDate,
    ) -> DbResult<Vec<Self>> {
        let (start, end) = day_bounds(date);
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM food_logs
            WHERE user_id = ?1 AND logged_at BETWEEN ?2 AND ?3
            ORDER BY logged_at DESC, id DESC
            "#,
        )?;

        let logs = stmt
            .query_map(params![user_id, start, end], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(logs)
    }

    /// Get all of a user's entries, newest first
    pub fn list_for_user(conn: &Connection, user_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM food_logs WHERE user_id = ?1 ORDER BY logged_at DESC, id DESC",
        )?;

        let logs = stmt
            .query_map([user_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(logs)
    }

    /// List every log id in the database (for bulk recalculation)
    pub fn list_all_ids(conn: &Connection) -> DbResult<Vec<i64>> {
        let mut stmt = conn.prepare("SELECT id FROM food_logs ORDER BY id")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<i64>, _>>()?;
        Ok(ids)
    }

    /// Distinct calendar dates on which the user logged anything, newest first
    pub fn distinct_log_dates(conn: &Connection, user_id: i64) -> DbResult<Vec<NaiveDate>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT DISTINCT date(logged_at) FROM food_logs
            WHERE user_id = ?1
            ORDER BY 1 DESC
            "#,
        )?;

        let dates = stmt
            .query_map([user_id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(dates
            .iter()
            .filter_map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .collect())
    }

    /// Recompute the cached nutrition from the current food row.
    ///
    /// This is the only way a log's cache ever changes; nothing recomputes
    /// it automatically when the referenced food is edited or reloaded.
    /// Returns None if the log no longer exists.
    pub fn rescale(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let log = match Self::get_by_id(conn, id)? {
            Some(log) => log,
            None => return Ok(None),
        };

        let food = Food::get_by_id(conn, log.food_id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))?;

        let nutrition = food.nutrition.scale_per_100g(log.quantity);

        conn.execute(
            r#"
            UPDATE food_logs SET
                cached_calories = ?1,
                cached_protein = ?2,
                cached_carbs = ?3,
                cached_fat = ?4,
                cached_cholesterol_mg = ?5,
                cached_sodium_mg = ?6,
                cached_fibre_g = ?7,
                cached_vitc_mg = ?8,
                cached_vita_ug = ?9,
                cached_iron_mg = ?10
            WHERE id = ?11
            "#,
            params![
                nutrition.calories,
                nutrition.protein,
                nutrition.carbs,
                nutrition.fat,
                nutrition.cholesterol_mg,
                nutrition.sodium_mg,
                nutrition.fibre_g,
                nutrition.vitc_mg,
                nutrition.vita_ug,
                nutrition.iron_mg,
                id,
            ],
        )?;

        Self::get_by_id(conn, id)
    }

    /// Delete a food log entry
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM food_logs WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    /// Count all food logs for a user
    pub fn count_for_user(conn: &Connection, user_id: i64) -> DbResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM food_logs WHERE user_id = ?1",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::{FoodCreate, User};

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn seed(conn: &Connection) -> (i64, i64) {
        let user = User::create(conn, "a@example.com", "alice").unwrap();
        let food = Food::create(
            conn,
            &FoodCreate {
                name: "Oats".to_string(),
                calories: 389.0,
                protein: 16.9,
                carbs: 66.3,
                fat: 6.9,
                cholesterol_mg: 0.0,
                sodium_mg: 2.0,
                fibre_g: 10.6,
                vitc_mg: 0.0,
                vita_ug: 0.0,
                iron_mg: 4.7,
                category: None,
            },
        )
        .unwrap();
        (user.id, food.id)
    }

    #[test]
    fn test_create_caches_scaled_nutrition() {
        let conn = test_conn();
        let (user_id, food_id) = seed(&conn);

        let log = FoodLog::create(
            &conn,
            &FoodLogCreate {
                user_id,
                food_id,
                quantity: 50.0,
                meal_type: MealType::Breakfast,
                logged_at: Some("2026-08-30 08:15:00".to_string()),
            },
        )
        .unwrap();

        assert_eq!(log.nutrition.calories, 194.5);
        assert_eq!(log.nutrition.protein, 8.5); // 8.45 rounds up
        assert_eq!(log.nutrition.fibre_g, 5.3);
        assert_eq!(log.meal_type, MealType::Breakfast);
    }

    #[test]
    fn test_day_window_is_inclusive() {
        let conn = test_conn();
        let (user_id, food_id) = seed(&conn);
        let date = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();

        for ts in ["2026-08-30 00:00:00", "2026-08-30 23:59:59", "2026-08-31 00:00:00"] {
            FoodLog::create(
                &conn,
                &FoodLogCreate {
                    user_id,
                    food_id,
                    quantity: 100.0,
                    meal_type: MealType::Snack,
                    logged_at: Some(ts.to_string()),
                },
            )
            .unwrap();
        }

        let logs = FoodLog::get_for_user_day(&conn, user_id, date).unwrap();
        assert_eq!(logs.len(), 2); // midnight of the next day excluded
    }

    #[test]
    fn test_rescale_follows_food_changes() {
        let conn = test_conn();
        let (user_id, food_id) = seed(&conn);

        let log = FoodLog::create(
            &conn,
            &FoodLogCreate {
                user_id,
                food_id,
                quantity: 100.0,
                meal_type: MealType::Lunch,
                logged_at: None,
            },
        )
        .unwrap();
        assert_eq!(log.nutrition.calories, 389.0);

        // Edit the food out from under the log; the cache must not move
        conn.execute("UPDATE foods SET calories = 400.0 WHERE id = ?1", [food_id])
            .unwrap();
        let stale = FoodLog::get_by_id(&conn, log.id).unwrap().unwrap();
        assert_eq!(stale.nutrition.calories, 389.0);

        // Only an explicit rescale recomputes it
        let fresh = FoodLog::rescale(&conn, log.id).unwrap().unwrap();
        assert_eq!(fresh.nutrition.calories, 400.0);
    }

    #[test]
    fn test_distinct_log_dates_newest_first() {
        let conn = test_conn();
        let (user_id, food_id) = seed(&conn);

        for ts in [
            "2026-08-28 09:00:00",
            "2026-08-30 09:00:00",
            "2026-08-30 13:00:00",
        ] {
            FoodLog::create(
                &conn,
                &FoodLogCreate {
                    user_id,
                    food_id,
                    quantity: 100.0,
                    meal_type: MealType::Snack,
                    logged_at: Some(ts.to_string()),
                },
            )
            .unwrap();
        }

        let dates = FoodLog::distinct_log_dates(&conn, user_id).unwrap();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2026, 8, 30).unwrap(),
                NaiveDate::from_ymd_opt(2026, 8, 28).unwrap(),
            ]
        );
    }
}
