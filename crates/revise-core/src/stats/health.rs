//! Review health and bucket counts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::srs::{is_due_today, is_overdue, Review};

/// Snapshot of where the tracked reviews stand today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub overdue: usize,
    pub due_today: usize,
    /// Everything neither overdue nor due today, however far out.
    pub upcoming: usize,
    pub total: usize,
    /// Share of tracked reviews that are not overdue, 0-100.
    pub review_health: u8,
}

impl Default for ReviewStats {
    fn default() -> Self {
        Self {
            overdue: 0,
            due_today: 0,
            upcoming: 0,
            total: 0,
            review_health: 100,
        }
    }
}

/// Count the live (non-retired) reviews per bucket.
pub fn review_stats<'a, I>(reviews: I, today: NaiveDate) -> ReviewStats
where
    I: IntoIterator<Item = &'a Review>,
{
    let mut stats = ReviewStats::default();
    for review in reviews.into_iter().filter(|r| !r.is_completed) {
        stats.total += 1;
        if is_overdue(review, today) {
            stats.overdue += 1;
        } else if is_due_today(review, today) {
            stats.due_today += 1;
        } else {
            stats.upcoming += 1;
        }
    }
    stats.review_health = health_percent(stats.total, stats.overdue);
    stats
}

/// `round((total - overdue) / total * 100)`, 100 for an empty set.
pub fn health_percent(total: usize, overdue: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let on_track = total.saturating_sub(overdue) as f64;
    ((on_track / total as f64) * 100.0).round() as u8
}
