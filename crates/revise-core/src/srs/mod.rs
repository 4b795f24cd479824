//! Spaced-repetition scheduling core.
//!
//! Everything in here is a pure function of its inputs and an explicit
//! "now"/"today"; nothing touches storage.

mod dates;
mod intervals;
mod queue;
mod review;
mod transition;

pub use dates::{
    add_days, checked_add_days, days_between, is_representable, normalize_to_midnight, parse_day,
    CalendarDay, Clock, DueDate, FixedClock, SystemClock, FIRST_DAY, LAST_DAY,
};
pub use intervals::{interval_days, is_terminal, next_position, INTERVAL_TABLE, TERMINAL_POSITION};
pub use queue::{
    build_queue, compare_for_queue, is_due_today, is_overdue, sort_review_queue, QueueBucket,
};
pub use review::{create_review, Difficulty, NewReview, Review, Subject};
pub use transition::{
    apply_auto_snooze, can_snooze, mark_complete, reschedule, snooze, AUTO_SNOOZE_DAYS,
    AUTO_SNOOZE_MIN_REVIEWS, MAX_RESCHEDULE_DAYS, MAX_SNOOZE_DAYS,
};
