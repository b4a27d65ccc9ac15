//! Logging streaks and badges

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// A streak badge: emoji plus label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub emoji: &'static str,
    pub label: &'static str,
}

/// Badge tier for a streak length
pub fn streak_badge(streak_days: i64) -> Badge {
    if streak_days >= 7 {
        Badge { emoji: "🔥", label: "Warrior" }
    } else if streak_days >= 3 {
        Badge { emoji: "💪", label: "Consistent" }
    } else {
        Badge { emoji: "🎯", label: "Start Streak" }
    }
}

/// Count consecutive days with at least one log, ending today or yesterday.
///
/// `log_dates` must be distinct calendar dates, newest first. A streak that
/// last saw a log yesterday is still alive; one that last saw a log two or
/// more days ago is 0.
pub fn current_streak(log_dates: &[NaiveDate], today: NaiveDate) -> i64 {
    let latest = match log_dates.first() {
        Some(d) => *d,
        None => return 0,
    };
    if latest != today && latest != today - Duration::days(1) {
        return 0;
    }

    let mut streak = 1;
    let mut expected = latest - Duration::days(1);
    for date in &log_dates[1..] {
        if *date != expected {
            break;
        }
        streak += 1;
        expected -= Duration::days(1);
    }
    streak
}
