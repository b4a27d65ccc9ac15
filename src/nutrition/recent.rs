//! Recently logged foods
//!
//! Dedup food ids from a most-recent-first log sequence, keeping first
//! occurrences. Truncation to the limit happens after deduplication, so
//! repeats of one food never crowd out older distinct foods.

use std::collections::HashSet;

/// Default number of recent foods returned
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Reduce a most-recent-first id sequence to distinct ids, order preserved,
/// then truncate to `limit`.
pub fn dedup_recent(food_ids: &[i64], limit: usize) -> Vec<i64> {
    let mut seen = HashSet::new();
    let mut recent: Vec<i64> = food_ids
        .iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .collect();
    recent.truncate(limit);
    recent
}
