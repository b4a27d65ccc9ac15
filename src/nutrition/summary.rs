//! Daily and weekly aggregation
//!
//! Pure functions over fetched log entries. Totals come from the cached
//! per-log nutrition, never recomputed from the foods table.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{round1, FoodLog, MealType, Nutrition};

/// Aggregated nutrition for one calendar day
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailySummary {
    #[serde(flatten)]
    pub totals: Nutrition,
    pub meal_count: usize,
}

/// One point in the weekly calorie series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayCalories {
    pub date: NaiveDate,
    /// Weekday label, e.g. "Mon"
    pub label: String,
    pub calories: f64,
}

/// Sum the cached nutrition of a day's entries.
///
/// A day with no entries is not an error; it sums to an all-zero summary.
pub fn daily_summary(logs: &[FoodLog]) -> DailySummary {
    let totals: Nutrition = logs.iter().map(|l| l.nutrition.clone()).sum();
    DailySummary {
        totals: totals.rounded(),
        meal_count: logs.len(),
    }
}

/// Calories per meal type. Meal types with no entries are omitted rather
/// than reported as zero.
pub fn meal_breakdown(logs: &[FoodLog]) -> BTreeMap<MealType, f64> {
    let mut breakdown: BTreeMap<MealType, f64> = BTreeMap::new();
    for log in logs {
        *breakdown.entry(log.meal_type).or_insert(0.0) += log.nutrition.calories;
    }
    for calories in breakdown.values_mut() {
        *calories = round1(*calories);
    }
    breakdown
}

/// The seven calendar dates ending at `end_date`, oldest first
pub fn week_window(end_date: NaiveDate) -> [NaiveDate; 7] {
    let mut dates = [end_date; 7];
    for (i, slot) in dates.iter_mut().enumerate() {
        *slot = end_date - Duration::days(6 - i as i64);
    }
    dates
}

/// Build a weekly calorie point from one day's entries
pub fn day_calories(date: NaiveDate, logs: &[FoodLog]) -> DayCalories {
    DayCalories {
        date,
        label: date.format("%a").to_string(),
        calories: round1(logs.iter().map(|l| l.nutrition.calories).sum()),
    }
}

/// Calories left against a daily target. Negative when over target.
pub fn remaining_calories(target: i64, consumed: f64) -> f64 {
    round1(target as f64 - consumed)
}

/// Progress toward a target as a percentage, capped at 100 and rounded to
/// one decimal place. A non-positive target reports 0.
pub fn progress_percent(consumed: f64, target: i64) -> f64 {
    if target <= 0 {
        return 0.0;
    }
    round1((consumed / target as f64 * 100.0).min(100.0))
}
