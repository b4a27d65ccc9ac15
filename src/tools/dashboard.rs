//! Daily summary, weekly trends, and the dashboard composite

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::db::Database;
use crate::models::{Food, FoodLog, MealType, User};
use crate::nutrition::{
    daily_summary, day_calories, dedup_recent, meal_breakdown, progress_percent,
    remaining_calories, streak_badge, week_window, DailySummary, DayCalories,
    DEFAULT_RECENT_LIMIT,
};

use super::foods::FoodSummary;
use super::{ToolError, ToolResult};

/// Response for get_daily_summary
#[derive(Debug, Serialize)]
pub struct DailySummaryResponse {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub summary: DailySummary,
    pub calorie_target: i64,
    pub remaining_calories: f64,
    pub calorie_percent: f64,
    pub protein_percent: f64,
    pub carbs_percent: f64,
    pub fat_percent: f64,
}

/// Response for get_meal_breakdown
#[derive(Debug, Serialize)]
pub struct MealBreakdownResponse {
    pub date: NaiveDate,
    pub meals: BTreeMap<MealType, f64>,
}

/// Response for get_weekly_data
#[derive(Debug, Serialize)]
pub struct WeeklyDataResponse {
    pub days: Vec<DayCalories>,
    pub calorie_target: i64,
}

/// One logged entry in a dashboard meal group
#[derive(Debug, Serialize)]
pub struct DashboardLogEntry {
    pub id: i64,
    pub food_name: String,
    pub quantity_g: f64,
    pub calories: f64,
    pub logged_at: String,
}

/// Response for get_dashboard
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub date: NaiveDate,
    pub summary: DailySummaryResponse,
    pub meals: BTreeMap<MealType, Vec<DashboardLogEntry>>,
    pub weekly: WeeklyDataResponse,
    pub recent_foods: Vec<FoodSummary>,
    pub favorite_foods: Vec<FoodSummary>,
    pub streak_days: i64,
    pub streak_emoji: &'static str,
    pub streak_label: &'static str,
}

/// Parse an optional `YYYY-MM-DD` date, defaulting to today
fn resolve_date(date: Option<&str>) -> ToolResult<NaiveDate> {
    match date {
        None => Ok(Local::now().date_naive()),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map_err(|_| ToolError::InvalidInput(format!("invalid date: {}", s))),
    }
}

fn require_user(conn: &rusqlite::Connection, user_id: i64) -> ToolResult<User> {
    User::get_by_id(conn, user_id)?
        .ok_or_else(|| ToolError::NotFound(format!("user {}", user_id)))
}

fn build_summary(
    user: &User,
    date: NaiveDate,
    logs: &[FoodLog],
) -> DailySummaryResponse {
    let summary = daily_summary(logs);
    let targets = &user.targets;
    DailySummaryResponse {
        date,
        remaining_calories: remaining_calories(targets.calories, summary.totals.calories),
        calorie_percent: progress_percent(summary.totals.calories, targets.calories),
        protein_percent: progress_percent(summary.totals.protein, targets.protein_g),
        carbs_percent: progress_percent(summary.totals.carbs, targets.carbs_g),
        fat_percent: progress_percent(summary.totals.fat, targets.fat_g),
        calorie_target: targets.calories,
        summary,
    }
}

/// Aggregate one day's intake against the user's targets.
///
/// A day with no logs is a valid zero summary, not an error.
pub fn get_daily_summary(
    db: &Database,
    user_id: i64,
    date: Option<&str>,
) -> ToolResult<DailySummaryResponse> {
    let date = resolve_date(date)?;
    let conn = db.get_conn()?;
    let user = require_user(&conn, user_id)?;
    let logs = FoodLog::get_for_user_day(&conn, user_id, date)?;
    Ok(build_summary(&user, date, &logs))
}

/// Calories per meal type for one day. Absent meal types are omitted.
pub fn get_meal_breakdown(
    db: &Database,
    user_id: i64,
    date: Option<&str>,
) -> ToolResult<MealBreakdownResponse> {
    let date = resolve_date(date)?;
    let conn = db.get_conn()?;
    require_user(&conn, user_id)?;
    let logs = FoodLog::get_for_user_day(&conn, user_id, date)?;
    Ok(MealBreakdownResponse {
        date,
        meals: meal_breakdown(&logs),
    })
}

/// Seven daily calorie totals ending at the given date, oldest first
pub fn get_weekly_data(
    db: &Database,
    user_id: i64,
    end_date: Option<&str>,
) -> ToolResult<WeeklyDataResponse> {
    let end = resolve_date(end_date)?;
    let conn = db.get_conn()?;
    let user = require_user(&conn, user_id)?;

    let mut days = Vec::with_capacity(7);
    for date in week_window(end) {
        let logs = FoodLog::get_for_user_day(&conn, user_id, date)?;
        days.push(day_calories(date, &logs));
    }

    Ok(WeeklyDataResponse {
        days,
        calorie_target: user.targets.calories,
    })
}

/// The user's most recently logged distinct foods
pub fn get_recent_foods(
    db: &Database,
    user_id: i64,
    limit: Option<usize>,
) -> ToolResult<Vec<FoodSummary>> {
    let conn = db.get_conn()?;
    require_user(&conn, user_id)?;
    recent_foods(&conn, user_id, limit.unwrap_or(DEFAULT_RECENT_LIMIT))
}

fn recent_foods(
    conn: &rusqlite::Connection,
    user_id: i64,
    limit: usize,
) -> ToolResult<Vec<FoodSummary>> {
    let logs = FoodLog::list_for_user(conn, user_id)?;
    let ids: Vec<i64> = logs.iter().map(|l| l.food_id).collect();

    let mut foods = Vec::new();
    for id in dedup_recent(&ids, limit) {
        if let Some(food) = Food::get_by_id(conn, id)? {
            foods.push(FoodSummary::from(&food));
        }
    }
    Ok(foods)
}

/// Everything the daily dashboard needs in one call
pub fn get_dashboard(
    db: &Database,
    user_id: i64,
    date: Option<&str>,
) -> ToolResult<DashboardResponse> {
    let date = resolve_date(date)?;
    let conn = db.get_conn()?;
    let user = require_user(&conn, user_id)?;

    let logs = FoodLog::get_for_user_day(&conn, user_id, date)?;
    let summary = build_summary(&user, date, &logs);

    let mut meals: BTreeMap<MealType, Vec<DashboardLogEntry>> = BTreeMap::new();
    for log in &logs {
        let food_name = Food::get_by_id(&conn, log.food_id)?
            .map(|f| f.name)
            .unwrap_or_else(|| format!("food {}", log.food_id));
        meals.entry(log.meal_type).or_default().push(DashboardLogEntry {
            id: log.id,
            food_name,
            quantity_g: log.quantity,
            calories: log.nutrition.calories,
            logged_at: log.logged_at.clone(),
        });
    }

    let weekly = {
        let mut days = Vec::with_capacity(7);
        for d in week_window(date) {
            let day_logs = FoodLog::get_for_user_day(&conn, user_id, d)?;
            days.push(day_calories(d, &day_logs));
        }
        WeeklyDataResponse {
            days,
            calorie_target: user.targets.calories,
        }
    };

    let recent = recent_foods(&conn, user_id, DEFAULT_RECENT_LIMIT)?;
    let favorites = crate::models::Favorite::list_for_user(&conn, user_id)?
        .iter()
        .map(|f| FoodSummary::from(&f.food))
        .collect();

    let badge = streak_badge(user.current_streak);

    Ok(DashboardResponse {
        date,
        summary,
        meals,
        weekly,
        recent_foods: recent,
        favorite_foods: favorites,
        streak_days: user.current_streak,
        streak_emoji: badge.emoji,
        streak_label: badge.label,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::foods::{search_foods, seed_sample_foods, toggle_favorite};
    use crate::tools::logs::log_food;
    use crate::tools::profile::create_user;

    fn test_db() -> Database {
        let db = Database::new_in_memory().unwrap();
        db.with_conn(|conn| crate::db::migrations::run_migrations(conn))
            .unwrap();
        db
    }

    fn setup(db: &Database) -> i64 {
        seed_sample_foods(db).unwrap();
        create_user(db, "a@example.com", "alice").unwrap().id
    }

    fn food_id(db: &Database, name: &str) -> i64 {
        search_foods(db, name, 5).unwrap().foods[0].id
    }

    #[test]
    fn test_empty_day_is_zero_summary() {
        let db = test_db();
        let user_id = setup(&db);

        let resp = get_daily_summary(&db, user_id, Some("2026-08-30")).unwrap();
        assert_eq!(resp.summary.totals.calories, 0.0);
        assert_eq!(resp.summary.meal_count, 0);
        assert_eq!(resp.remaining_calories, 2000.0);
        assert_eq!(resp.calorie_percent, 0.0);
    }

    #[test]
    fn test_daily_summary_sums_day_only() {
        let db = test_db();
        let user_id = setup(&db);
        let banana = food_id(&db, "banana");

        for ts in ["2026-08-30 08:00:00", "2026-08-30 13:00:00", "2026-08-29 13:00:00"] {
            log_food(
                &db,
                user_id,
                banana,
                100.0,
                "g",
                MealType::Snack,
                Some(ts.to_string()),
            )
            .unwrap();
        }

        let resp = get_daily_summary(&db, user_id, Some("2026-08-30")).unwrap();
        assert_eq!(resp.summary.totals.calories, 178.0);
        assert_eq!(resp.summary.meal_count, 2);
        assert_eq!(resp.remaining_calories, 1822.0);
        assert_eq!(resp.calorie_percent, 8.9);
    }

    #[test]
    fn test_breakdown_omits_empty_meals() {
        let db = test_db();
        let user_id = setup(&db);
        let oats = food_id(&db, "oats");

        log_food(
            &db,
            user_id,
            oats,
            50.0,
            "g",
            MealType::Breakfast,
            Some("2026-08-30 08:00:00".to_string()),
        )
        .unwrap();

        let resp = get_meal_breakdown(&db, user_id, Some("2026-08-30")).unwrap();
        assert_eq!(resp.meals.len(), 1);
        assert_eq!(resp.meals[&MealType::Breakfast], 194.5);
    }

    #[test]
    fn test_weekly_data_is_oldest_first_with_gaps() {
        let db = test_db();
        let user_id = setup(&db);
        let rice = food_id(&db, "rice");

        log_food(
            &db,
            user_id,
            rice,
            200.0,
            "g",
            MealType::Lunch,
            Some("2026-08-28 13:00:00".to_string()),
        )
        .unwrap();

        let resp = get_weekly_data(&db, user_id, Some("2026-08-30")).unwrap();
        assert_eq!(resp.days.len(), 7);
        assert_eq!(resp.days[0].date, NaiveDate::from_ymd_opt(2026, 8, 24).unwrap());
        assert_eq!(resp.days[6].date, NaiveDate::from_ymd_opt(2026, 8, 30).unwrap());
        assert_eq!(resp.days[4].calories, 260.0); // the 28th
        assert_eq!(resp.days[6].calories, 0.0);
    }

    #[test]
    fn test_recent_foods_dedup_and_order() {
        let db = test_db();
        let user_id = setup(&db);
        let banana = food_id(&db, "banana");
        let oats = food_id(&db, "oats");

        for (id, ts) in [
            (banana, "2026-08-30 08:00:00"),
            (oats, "2026-08-30 09:00:00"),
            (banana, "2026-08-30 10:00:00"),
        ] {
            log_food(
                &db,
                user_id,
                id,
                100.0,
                "g",
                MealType::Snack,
                Some(ts.to_string()),
            )
            .unwrap();
        }

        let recent = get_recent_foods(&db, user_id, None).unwrap();
        let ids: Vec<i64> = recent.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![banana, oats]);
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        let db = test_db();
        let user_id = setup(&db);
        assert!(matches!(
            get_daily_summary(&db, user_id, Some("30-08-2026")),
            Err(ToolError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_dashboard_composite() {
        let db = test_db();
        let user_id = setup(&db);
        let banana = food_id(&db, "banana");
        toggle_favorite(&db, user_id, banana).unwrap();

        log_food(
            &db,
            user_id,
            banana,
            100.0,
            "g",
            MealType::Breakfast,
            Some("2026-08-30 08:00:00".to_string()),
        )
        .unwrap();

        let dash = get_dashboard(&db, user_id, Some("2026-08-30")).unwrap();
        assert_eq!(dash.summary.summary.totals.calories, 89.0);
        assert_eq!(dash.meals[&MealType::Breakfast].len(), 1);
        assert_eq!(dash.weekly.days.len(), 7);
        assert_eq!(dash.recent_foods[0].id, banana);
        assert_eq!(dash.favorite_foods.len(), 1);
        assert_eq!(dash.streak_label, "Start Streak");
    }
}
