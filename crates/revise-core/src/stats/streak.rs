//! Consecutive-day study streak and streak restores.
//!
//! A day counts as studied when some review was completed or created on it,
//! or when a streak restore was spent on it.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::srs::{add_days, Review};

/// Restores available over the lifetime of the profile.
pub const MAX_STREAK_RESTORES: u32 = 20;
/// How far back the streak walk looks.
pub const STREAK_LOOKBACK_DAYS: u32 = 400;

/// Persisted restore bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakState {
    #[serde(default)]
    pub restores_used: u32,
    /// Days patched in by restores.
    #[serde(default)]
    pub restore_days: BTreeSet<NaiveDate>,
}

impl StreakState {
    pub fn restores_remaining(&self) -> u32 {
        MAX_STREAK_RESTORES.saturating_sub(self.restores_used)
    }

    /// Spend one restore to mark yesterday as studied. Refused (returns
    /// `false`, nothing changes) once the cap is reached.
    pub fn use_restore(&mut self, today: NaiveDate) -> bool {
        if self.restores_used >= MAX_STREAK_RESTORES {
            return false;
        }
        self.restores_used += 1;
        self.restore_days.insert(add_days(today, -1));
        true
    }
}

/// Every day with study activity.
pub fn activity_days<'a, I>(reviews: I, streak: &StreakState) -> BTreeSet<NaiveDate>
where
    I: IntoIterator<Item = &'a Review>,
{
    let mut days = streak.restore_days.clone();
    for review in reviews {
        days.insert(review.created_at.date_naive());
        if let Some(at) = review.last_reviewed {
            days.insert(at.date_naive());
        }
    }
    days
}

/// Walk back from today counting studied days. Today may still be empty
/// without breaking the streak; the first empty day before today ends it.
pub fn current_streak(activity: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut streak = 0;
    for i in 0..STREAK_LOOKBACK_DAYS {
        let day = add_days(today, -i64::from(i));
        if activity.contains(&day) {
            streak += 1;
        } else if i > 0 {
            break;
        }
    }
    streak
}

/// Longest run of consecutive studied days anywhere in the history.
pub fn longest_streak(activity: &BTreeSet<NaiveDate>) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;
    for &day in activity {
        run = match previous {
            Some(prev) if prev.succ_opt() == Some(day) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(day);
    }
    longest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::srs::{create_review, Difficulty, NewReview, Subject};
    use chrono::{Duration, TimeZone, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn days_ago(offsets: &[i64]) -> BTreeSet<NaiveDate> {
        offsets.iter().map(|o| add_days(today(), -o)).collect()
    }

    #[test]
    fn counts_contiguous_days_including_today() {
        assert_eq!(current_streak(&days_ago(&[0, 1, 2, 4, 5]), today()), 3);
    }

    #[test]
    fn missing_today_does_not_break_streak() {
        assert_eq!(current_streak(&days_ago(&[1, 2]), today()), 2);
    }

    #[test]
    fn gap_yesterday_ends_streak() {
        assert_eq!(current_streak(&days_ago(&[0, 2, 3]), today()), 1);
        assert_eq!(current_streak(&days_ago(&[2, 3]), today()), 0);
        assert_eq!(current_streak(&BTreeSet::new(), today()), 0);
    }

    #[test]
    fn longest_run_can_lie_in_the_past() {
        assert_eq!(longest_streak(&days_ago(&[0, 1, 5, 6, 7, 8, 10])), 4);
        assert_eq!(longest_streak(&days_ago(&[3])), 1);
        assert_eq!(longest_streak(&BTreeSet::new()), 0);
        let all: Vec<i64> = (0..1000).collect();
        assert_eq!(longest_streak(&days_ago(&all)), 1000);
    }

    #[test]
    fn walk_is_capped() {
        let all: Vec<i64> = (0..1000).collect();
        assert_eq!(current_streak(&days_ago(&all), today()), STREAK_LOOKBACK_DAYS);
    }

    #[test]
    fn activity_merges_creation_completion_and_restores() {
        let created = Utc.with_ymd_and_hms(2026, 10, 17, 20, 0, 0).unwrap();
        let mut review = create_review(
            NewReview::new("bio-1", Subject::Biology, "Cells", "Mitosis", Difficulty::Easy),
            created,
        )
        .unwrap();
        review.last_reviewed = Some(created + Duration::days(1));
        let mut streak = StreakState::default();
        assert!(streak.use_restore(add_days(today(), -3)));

        let days = activity_days([&review], &streak);
        assert_eq!(days, days_ago(&[2, 1, 4]));
        assert_eq!(current_streak(&days, today()), 2);
    }

    #[test]
    fn restores_are_capped() {
        let mut streak = StreakState::default();
        for _ in 0..MAX_STREAK_RESTORES {
            assert!(streak.use_restore(today()));
        }
        assert_eq!(streak.restores_remaining(), 0);
        let before = streak.clone();
        assert!(!streak.use_restore(today()));
        assert_eq!(streak, before);
    }

    #[test]
    fn restore_patches_yesterday() {
        let mut streak = StreakState::default();
        assert!(streak.use_restore(today()));
        assert_eq!(streak.restores_remaining(), MAX_STREAK_RESTORES - 1);
        assert!(streak.restore_days.contains(&add_days(today(), -1)));
        let days = activity_days(std::iter::empty::<&Review>(), &streak);
        assert_eq!(current_streak(&days, today()), 1);
    }
}
