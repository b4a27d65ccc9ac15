//! Food logging tools

use chrono::Local;
use serde::Serialize;
use tracing::info;

use crate::db::Database;
use crate::models::{Food, FoodLog, FoodLogCreate, MealType, Nutrition, User};
use crate::nutrition::{current_streak, to_grams};

use super::{ToolError, ToolResult};

/// Response for log_food
#[derive(Debug, Serialize)]
pub struct LogFoodResponse {
    pub id: i64,
    pub food_id: i64,
    pub food_name: String,
    /// Normalized quantity in grams
    pub quantity_g: f64,
    pub meal_type: MealType,
    #[serde(flatten)]
    pub nutrition: Nutrition,
    pub logged_at: String,
    pub current_streak: i64,
}

/// Response for delete_log
#[derive(Debug, Serialize)]
pub struct DeleteLogResponse {
    pub deleted_id: i64,
}

/// Log a food intake entry.
///
/// Quantity is given in the caller's serving unit and normalized to grams
/// before scaling. The entry caches the scaled nutrition, and the user's
/// logging streak is recomputed afterwards.
pub fn log_food(
    db: &Database,
    user_id: i64,
    food_id: i64,
    quantity: f64,
    unit: &str,
    meal_type: MealType,
    logged_at: Option<String>,
) -> ToolResult<LogFoodResponse> {
    if quantity <= 0.0 {
        return Err(ToolError::InvalidInput("quantity must be greater than 0".to_string()));
    }

    let conn = db.get_conn()?;

    if User::get_by_id(&conn, user_id)?.is_none() {
        return Err(ToolError::NotFound(format!("user {}", user_id)));
    }
    let food = Food::get_by_id(&conn, food_id)?
        .ok_or_else(|| ToolError::NotFound(format!("food {}", food_id)))?;

    let grams = to_grams(quantity, unit);
    let log = FoodLog::create(
        &conn,
        &FoodLogCreate {
            user_id,
            food_id,
            quantity: grams,
            meal_type,
            logged_at,
        },
    )?;

    let streak = refresh_streak(&conn, user_id)?;
    info!(user_id, log_id = log.id, grams, "logged food");

    Ok(LogFoodResponse {
        id: log.id,
        food_id: food.id,
        food_name: food.name,
        quantity_g: log.quantity,
        meal_type: log.meal_type,
        nutrition: log.nutrition,
        logged_at: log.logged_at,
        current_streak: streak,
    })
}

/// Delete a log entry. Refuses entries belonging to another user.
pub fn delete_log(db: &Database, user_id: i64, log_id: i64) -> ToolResult<DeleteLogResponse> {
    let conn = db.get_conn()?;

    let log = FoodLog::get_by_id(&conn, log_id)?
        .ok_or_else(|| ToolError::NotFound(format!("log {}", log_id)))?;
    if log.user_id != user_id {
        return Err(ToolError::NotFound(format!("log {}", log_id)));
    }

    FoodLog::delete(&conn, log_id)?;
    refresh_streak(&conn, user_id)?;
    info!(user_id, log_id, "deleted food log");

    Ok(DeleteLogResponse { deleted_id: log_id })
}

/// Recompute the user's streak from their log dates and persist it,
/// keeping the longest-streak high-water mark.
pub(crate) fn refresh_streak(conn: &rusqlite::Connection, user_id: i64) -> ToolResult<i64> {
    let user = User::get_by_id(conn, user_id)?
        .ok_or_else(|| ToolError::NotFound(format!("user {}", user_id)))?;

    let dates = FoodLog::distinct_log_dates(conn, user_id)?;
    let streak = current_streak(&dates, Local::now().date_naive());
    let longest = user.longest_streak.max(streak);
    User::set_streaks(conn, user_id, streak, longest)?;

    Ok(streak)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::foods::{search_foods, seed_sample_foods};
    use crate::tools::profile::create_user;

    fn test_db() -> Database {
        let db = Database::new_in_memory().unwrap();
        db.with_conn(|conn| crate::db::migrations::run_migrations(conn))
            .unwrap();
        db
    }

    fn setup(db: &Database) -> (i64, i64) {
        seed_sample_foods(db).unwrap();
        let user = create_user(db, "a@example.com", "alice").unwrap();
        let food_id = search_foods(db, "oats", 5).unwrap().foods[0].id;
        (user.id, food_id)
    }

    #[test]
    fn test_log_food_normalizes_unit_and_scales() {
        let db = test_db();
        let (user_id, food_id) = setup(&db);

        // 1 bowl = 180g of oats at 389 kcal per 100g
        let resp = log_food(&db, user_id, food_id, 1.0, "bowl", MealType::Breakfast, None).unwrap();
        assert_eq!(resp.quantity_g, 180.0);
        assert_eq!(resp.nutrition.calories, 700.2);
        assert_eq!(resp.current_streak, 1);
    }

    #[test]
    fn test_log_food_rejects_zero_quantity() {
        let db = test_db();
        let (user_id, food_id) = setup(&db);
        assert!(matches!(
            log_food(&db, user_id, food_id, 0.0, "g", MealType::Lunch, None),
            Err(ToolError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_log_unknown_food_is_not_found() {
        let db = test_db();
        let (user_id, _) = setup(&db);
        assert!(matches!(
            log_food(&db, user_id, 9999, 100.0, "g", MealType::Lunch, None),
            Err(ToolError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_log_checks_ownership() {
        let db = test_db();
        let (user_id, food_id) = setup(&db);
        let other = create_user(&db, "b@example.com", "bob").unwrap();

        let log = log_food(&db, user_id, food_id, 100.0, "g", MealType::Dinner, None).unwrap();

        assert!(matches!(
            delete_log(&db, other.id, log.id),
            Err(ToolError::NotFound(_))
        ));
        let resp = delete_log(&db, user_id, log.id).unwrap();
        assert_eq!(resp.deleted_id, log.id);
    }

    #[test]
    fn test_streak_counts_consecutive_days() {
        let db = test_db();
        let (user_id, food_id) = setup(&db);
        let today = Local::now().date_naive();

        for offset in [2, 1, 0] {
            let day = today - chrono::Duration::days(offset);
            log_food(
                &db,
                user_id,
                food_id,
                100.0,
                "g",
                MealType::Snack,
                Some(format!("{} 12:00:00", day.format("%Y-%m-%d"))),
            )
            .unwrap();
        }

        let conn = db.get_conn().unwrap();
        let user = User::get_by_id(&conn, user_id).unwrap().unwrap();
        assert_eq!(user.current_streak, 3);
        assert_eq!(user.longest_streak, 3);
    }
}
