//! Ladder advancement and bounded date adjustments.
//!
//! `mark_complete` is the only operation that moves a review along the
//! ladder. `snooze` and `reschedule` nudge the due date inside a small window
//! and leave the ladder position and history alone. Both validate before
//! building the new record, so a rejected call never yields a partial update.

use chrono::{DateTime, Utc};

use super::dates::{add_days, days_between, DueDate};
use super::intervals::{interval_days, next_position};
use super::review::{Difficulty, Review};
use crate::error::{Result, ValidationError};

/// Largest snooze, in days.
pub const MAX_SNOOZE_DAYS: i64 = 3;
/// Largest distance, in days, a due date may be dragged.
pub const MAX_RESCHEDULE_DAYS: i64 = 3;

/// Easy topics reviewed this many times skip ahead.
pub const AUTO_SNOOZE_MIN_REVIEWS: u32 = 3;
/// Days from today an auto-snoozed review lands on.
pub const AUTO_SNOOZE_DAYS: i64 = 3;

/// Record one completed review and schedule the next one.
///
/// The next interval counts from the previous completion when there is one,
/// otherwise from `now`. The record stays live (`is_completed` is false).
pub fn mark_complete(review: &Review, now: DateTime<Utc>) -> Review {
    let position = next_position(review.interval);
    let base = review.last_reviewed.unwrap_or(now);
    let due_date = DueDate::new(add_days(base, i64::from(interval_days(position))));

    Review {
        interval: position,
        due_date,
        last_reviewed: Some(now),
        times_reviewed: review.times_reviewed + 1,
        is_completed: false,
        ..review.clone()
    }
}

/// Mastery shortcut applied after [`mark_complete`]: an Easy review that has
/// been done at least three times comes back in three days instead of at its
/// ladder date. Returns whether the review was changed.
pub fn apply_auto_snooze(review: &mut Review, now: DateTime<Utc>) -> bool {
    if review.difficulty != Difficulty::Easy || review.times_reviewed < AUTO_SNOOZE_MIN_REVIEWS {
        return false;
    }
    review.due_date = DueDate::new(add_days(now, AUTO_SNOOZE_DAYS));
    true
}

pub fn can_snooze(days: i64) -> bool {
    (1..=MAX_SNOOZE_DAYS).contains(&days)
}

/// Push the due date back by 1-3 days.
pub fn snooze(review: &Review, days: i64) -> Result<Review> {
    if !can_snooze(days) {
        return Err(ValidationError::InvalidArgument("snooze must be 1–3 days".into()).into());
    }
    Ok(Review {
        due_date: review.due_date.shifted(days),
        ..review.clone()
    })
}

/// Move the due date to `new_date`, at most three days either way.
pub fn reschedule(review: &Review, new_date: impl Into<DueDate>) -> Result<Review> {
    let new_date = new_date.into();
    if days_between(review.due_date, new_date).abs() > MAX_RESCHEDULE_DAYS {
        return Err(
            ValidationError::InvalidArgument("cannot reschedule beyond ±3 days".into()).into(),
        );
    }
    Ok(Review {
        due_date: new_date,
        ..review.clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::srs::review::{create_review, NewReview, Subject};
    use chrono::{NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn review(difficulty: Difficulty) -> Review {
        create_review(
            NewReview::new("chem-org-3", Subject::Chemistry, "Organic", "Aldehydes", difficulty),
            now(),
        )
        .unwrap()
    }

    #[test]
    fn first_completion_counts_from_now() {
        let done = mark_complete(&review(Difficulty::Medium), now());
        assert_eq!(done.interval, 1);
        assert_eq!(done.times_reviewed, 1);
        assert_eq!(done.last_reviewed, Some(now()));
        assert_eq!(done.due_date.day(), day(2026, 10, 26));
        assert!(!done.is_completed);
    }

    #[test]
    fn later_completion_counts_from_last_reviewed() {
        let last = Utc.with_ymd_and_hms(2026, 10, 1, 18, 0, 0).unwrap();
        let climbing = Review {
            interval: 1,
            last_reviewed: Some(last),
            times_reviewed: 2,
            ..review(Difficulty::Hard)
        };
        let done = mark_complete(&climbing, now());
        assert_eq!(done.interval, 2);
        assert_eq!(done.due_date.day(), day(2026, 10, 15));
        assert_eq!(done.times_reviewed, 3);
        assert_eq!(done.last_reviewed, Some(now()));
    }

    #[test]
    fn terminal_rung_repeats() {
        let last = Utc.with_ymd_and_hms(2026, 9, 1, 7, 0, 0).unwrap();
        let mastered = Review {
            interval: 4,
            last_reviewed: Some(last),
            ..review(Difficulty::Medium)
        };
        let done = mark_complete(&mastered, now());
        assert_eq!(done.interval, 4);
        assert_eq!(done.due_date.day(), day(2026, 10, 11));
    }

    #[test]
    fn auto_snooze_only_for_seasoned_easy_topics() {
        let mut easy = Review {
            times_reviewed: 3,
            ..review(Difficulty::Easy)
        };
        assert!(apply_auto_snooze(&mut easy, now()));
        assert_eq!(easy.due_date.day(), day(2026, 10, 22));

        let mut fresh_easy = Review {
            times_reviewed: 2,
            ..review(Difficulty::Easy)
        };
        let before = fresh_easy.clone();
        assert!(!apply_auto_snooze(&mut fresh_easy, now()));
        assert_eq!(fresh_easy, before);

        let mut hard = Review {
            times_reviewed: 9,
            ..review(Difficulty::Hard)
        };
        assert!(!apply_auto_snooze(&mut hard, now()));
    }

    #[test]
    fn snooze_rejects_outside_window() {
        let original = review(Difficulty::Medium);
        for days in [0, 4, -1] {
            let err = snooze(&original, days).unwrap_err();
            assert!(err.is_invalid_argument());
            assert_eq!(err.to_string(), "snooze must be 1–3 days");
        }
    }

    #[test]
    fn snooze_shifts_due_date_only() {
        let original = Review {
            interval: 2,
            times_reviewed: 2,
            ..review(Difficulty::Medium)
        };
        for days in 1..=3 {
            let snoozed = snooze(&original, days).unwrap();
            assert_eq!(days_between(original.due_date, snoozed.due_date), days);
            assert_eq!(snoozed.interval, 2);
            assert_eq!(snoozed.times_reviewed, 2);
            assert_eq!(snoozed.id, original.id);
        }
    }

    #[test]
    fn reschedule_within_window_preserves_progress() {
        let original = Review {
            interval: 2,
            times_reviewed: 2,
            ..review(Difficulty::Medium)
        };
        let target = add_days(original.due_date, -3);
        let moved = reschedule(&original, target).unwrap();
        assert_eq!(moved.due_date.day(), target);
        assert_eq!(moved.interval, original.interval);
        assert_eq!(moved.times_reviewed, original.times_reviewed);
        assert_eq!(moved.last_reviewed, original.last_reviewed);
    }

    #[test]
    fn reschedule_beyond_window_leaves_review_untouched() {
        let original = review(Difficulty::Easy);
        let snapshot = original.clone();
        let err = reschedule(&original, add_days(original.due_date, 5)).unwrap_err();
        assert_eq!(err.to_string(), "cannot reschedule beyond ±3 days");
        assert!(reschedule(&original, add_days(original.due_date, -4)).is_err());
        assert_eq!(original, snapshot);
    }

    mod ladder_props {
        use super::{now, review};
        use crate::srs::{
            days_between, mark_complete, Difficulty, INTERVAL_TABLE, TERMINAL_POSITION,
        };
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn completions_stay_on_the_ladder(gaps in proptest::collection::vec(0i64..60, 1..30)) {
                let mut current = review(Difficulty::Hard);
                let mut at = now();
                for gap in gaps {
                    at += chrono::Duration::hours(gap * 7);
                    let base = current.last_reviewed.unwrap_or(at);
                    current = mark_complete(&current, at);
                    prop_assert!(current.interval <= TERMINAL_POSITION);
                    prop_assert_eq!(
                        days_between(base, current.due_date),
                        i64::from(INTERVAL_TABLE[current.interval])
                    );
                    prop_assert!(current.due_date.to_iso().ends_with("T00:00:00.000Z"));
                }
            }
        }
    }
}
