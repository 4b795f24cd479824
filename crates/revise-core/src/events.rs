use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::srs::DueDate;
use crate::syllabus::CoverageState;

/// Every state change in the study context produces an Event.
/// Front ends poll for events (e.g. to celebrate an all-clear queue or to
/// reschedule reminders after the calendar changed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    ReviewAdded {
        review_id: String,
        topic_id: String,
        due_date: DueDate,
        at: DateTime<Utc>,
    },
    /// `add_review` for a topic that already has a live review.
    DuplicateTopicIgnored {
        topic_id: String,
        at: DateTime<Utc>,
    },
    ReviewCompleted {
        review_id: String,
        interval: usize,
        due_date: DueDate,
        auto_snoozed: bool,
        at: DateTime<Utc>,
    },
    /// Nothing overdue or due today is left.
    QueueCleared {
        at: DateTime<Utc>,
    },
    ReviewSnoozed {
        review_id: String,
        days: i64,
        due_date: DueDate,
        at: DateTime<Utc>,
    },
    ReviewRescheduled {
        review_id: String,
        from: DueDate,
        to: DueDate,
        at: DateTime<Utc>,
    },
    ReviewDeleted {
        review_id: String,
        at: DateTime<Utc>,
    },
    StreakRestored {
        day: NaiveDate,
        remaining: u32,
        at: DateTime<Utc>,
    },
    ManualEventAdded {
        event_id: String,
        date: NaiveDate,
        at: DateTime<Utc>,
    },
    ManualEventDeleted {
        event_id: String,
        at: DateTime<Utc>,
    },
    TestLogged {
        test_id: String,
        score: u32,
        at: DateTime<Utc>,
    },
    TestDeleted {
        test_id: String,
        at: DateTime<Utc>,
    },
    CoverageChanged {
        topic_id: String,
        from: CoverageState,
        to: CoverageState,
        at: DateTime<Utc>,
    },
    /// A store write failed and was swallowed (best-effort durability).
    PersistFailed {
        message: String,
        at: DateTime<Utc>,
    },
}
