//! Nutrition computation core
//!
//! Pure calculation logic: unit normalization, target derivation,
//! daily/weekly aggregation, streaks, and recent-food selection. Database
//! access stays in the models; these functions work on plain values.

pub mod recent;
pub mod streak;
pub mod summary;
pub mod targets;
pub mod units;

pub use recent::{dedup_recent, DEFAULT_RECENT_LIMIT};
pub use streak::{current_streak, streak_badge, Badge};
pub use summary::{
    daily_summary, day_calories, meal_breakdown, progress_percent, remaining_calories,
    week_window, DailySummary, DayCalories,
};
pub use targets::{
    bmi, bmi_category, bmr, calculate_targets, ActivityLevel, Gender, Goal, TargetOutcome,
    Targets,
};
pub use units::{gram_multiplier, to_grams};
