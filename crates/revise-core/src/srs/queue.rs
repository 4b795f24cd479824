//! Building and ordering the actionable review queue.
//!
//! The queue holds what the learner can act on now: overdue reviews,
//! reviews due today and reviews due tomorrow. Anything later stays out of
//! the queue but is still visible to the forecast views, which read the full
//! review set.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::dates::add_days;
use super::review::Review;

/// Due strictly before today.
pub fn is_overdue(review: &Review, today: NaiveDate) -> bool {
    review.due_date.day() < today
}

pub fn is_due_today(review: &Review, today: NaiveDate) -> bool {
    review.due_date.day() == today
}

/// Primary sort key of the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueBucket {
    Overdue,
    DueToday,
    Upcoming,
}

impl QueueBucket {
    pub fn of(review: &Review, today: NaiveDate) -> Self {
        if is_overdue(review, today) {
            QueueBucket::Overdue
        } else if is_due_today(review, today) {
            QueueBucket::DueToday
        } else {
            QueueBucket::Upcoming
        }
    }
}

/// Three-tier ordering: overdue (oldest first), then due today (hardest
/// first), then the rest by due date. A later bucket never sorts ahead of an
/// earlier one.
pub fn compare_for_queue(a: &Review, b: &Review, today: NaiveDate) -> Ordering {
    let bucket_a = QueueBucket::of(a, today);
    let bucket_b = QueueBucket::of(b, today);

    bucket_a.cmp(&bucket_b).then_with(|| match bucket_a {
        QueueBucket::Overdue | QueueBucket::Upcoming => a.due_date.cmp(&b.due_date),
        QueueBucket::DueToday => a.difficulty.queue_rank().cmp(&b.difficulty.queue_rank()),
    })
}

/// Sort in place. Stable: equal keys keep their input order.
pub fn sort_review_queue(reviews: &mut [Review], today: NaiveDate) {
    reviews.sort_by(|a, b| compare_for_queue(a, b, today));
}

/// Select the actionable reviews and return them in queue order.
pub fn build_queue<'a, I>(reviews: I, today: NaiveDate) -> Vec<Review>
where
    I: IntoIterator<Item = &'a Review>,
{
    let tomorrow = add_days(today, 1);
    let mut queue: Vec<Review> = reviews
        .into_iter()
        .filter(|r| !r.is_completed)
        .filter(|r| {
            is_overdue(r, today) || is_due_today(r, today) || r.due_date.day() == tomorrow
        })
        .cloned()
        .collect();

    sort_review_queue(&mut queue, today);
    tracing::debug!(len = queue.len(), %today, "built review queue");
    queue
}
