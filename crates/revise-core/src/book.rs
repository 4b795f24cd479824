//! The in-memory review collection and its mutations.
//!
//! `ReviewBook` is the "apply" half of a mutation: every method is a
//! synchronous, in-memory change that either fully succeeds or leaves the
//! book untouched. Writing the result to durable storage is the caller's
//! business (see [`crate::context::StudyContext`]).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::{ManualEvent, NewEvent};
use crate::error::{CoreError, Result};
use crate::practice::{NewTestSession, TestSession};
use crate::srs::{
    apply_auto_snooze, create_review, is_due_today, is_overdue, mark_complete, reschedule,
    snooze, DueDate, NewReview, Review,
};
use crate::stats::StreakState;
use crate::syllabus::{set_coverage, CoverageState, CoverageUpdate, TopicCoverage};

/// Scheduling policy switches layered on top of the ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrsPolicy {
    /// Apply the easy-topic mastery shortcut after completions.
    pub auto_snooze_easy: bool,
}

impl Default for SrsPolicy {
    fn default() -> Self {
        Self {
            auto_snooze_easy: true,
        }
    }
}

/// Result of completing one review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionOutcome {
    pub review: Review,
    pub auto_snoozed: bool,
    /// No review is overdue or due today any more.
    pub all_clear: bool,
}

/// Everything a study profile holds, as loaded from or written to a store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub reviews: Vec<Review>,
    pub events: Vec<ManualEvent>,
    pub streak: StreakState,
    pub tests: Vec<TestSession>,
    pub coverage: Vec<TopicCoverage>,
}

#[derive(Debug, Clone, Default)]
pub struct ReviewBook {
    reviews: Vec<Review>,
    events: Vec<ManualEvent>,
    streak: StreakState,
    tests: Vec<TestSession>,
    coverage: Vec<TopicCoverage>,
}

impl ReviewBook {
    pub fn new(profile: Profile) -> Self {
        Self {
            reviews: profile.reviews,
            events: profile.events,
            streak: profile.streak,
            tests: profile.tests,
            coverage: profile.coverage,
        }
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn events(&self) -> &[ManualEvent] {
        &self.events
    }

    pub fn streak(&self) -> &StreakState {
        &self.streak
    }

    pub fn tests(&self) -> &[TestSession] {
        &self.tests
    }

    pub fn coverage(&self) -> &[TopicCoverage] {
        &self.coverage
    }

    pub fn get(&self, id: &str) -> Option<&Review> {
        self.reviews.iter().find(|r| r.id == id)
    }

    /// The live review tracking `topic_id`, if any.
    pub fn review_for_topic(&self, topic_id: &str) -> Option<&Review> {
        self.reviews
            .iter()
            .find(|r| r.topic_id == topic_id && !r.is_completed)
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.reviews
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| CoreError::review_not_found(id))
    }

    /// Start tracking a topic. Returns `None` and changes nothing when the
    /// topic already has a live review.
    pub fn add_review(&mut self, new: NewReview, now: DateTime<Utc>) -> Result<Option<Review>> {
        if self.review_for_topic(&new.topic_id).is_some() {
            return Ok(None);
        }
        let review = create_review(new, now)?;
        self.reviews.push(review.clone());
        Ok(Some(review))
    }

    /// Advance a review along the ladder, then apply the auto-snooze policy.
    pub fn complete_review(
        &mut self,
        id: &str,
        now: DateTime<Utc>,
        policy: SrsPolicy,
    ) -> Result<CompletionOutcome> {
        let idx = self.position(id)?;
        let mut next = mark_complete(&self.reviews[idx], now);
        let auto_snoozed = policy.auto_snooze_easy && apply_auto_snooze(&mut next, now);
        self.reviews[idx] = next.clone();

        Ok(CompletionOutcome {
            review: next,
            auto_snoozed,
            all_clear: self.is_all_clear(now.date_naive()),
        })
    }

    pub fn snooze_review(&mut self, id: &str, days: i64) -> Result<Review> {
        let idx = self.position(id)?;
        let snoozed = snooze(&self.reviews[idx], days)?;
        self.reviews[idx] = snoozed.clone();
        Ok(snoozed)
    }

    /// Returns the previous due date alongside the moved review.
    pub fn reschedule_review(&mut self, id: &str, date: NaiveDate) -> Result<(DueDate, Review)> {
        let idx = self.position(id)?;
        let from = self.reviews[idx].due_date;
        let moved = reschedule(&self.reviews[idx], date)?;
        self.reviews[idx] = moved.clone();
        Ok((from, moved))
    }

    /// Hard delete, whatever the ladder position.
    pub fn delete_review(&mut self, id: &str) -> Result<Review> {
        let idx = self.position(id)?;
        Ok(self.reviews.remove(idx))
    }

    pub fn restore_streak(&mut self, today: NaiveDate) -> bool {
        self.streak.use_restore(today)
    }

    pub fn add_event(&mut self, new: NewEvent, now: DateTime<Utc>) -> ManualEvent {
        let event = ManualEvent::create(new, now);
        self.events.push(event.clone());
        event
    }

    pub fn delete_event(&mut self, id: &str) -> Result<ManualEvent> {
        let idx = self
            .events
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| CoreError::event_not_found(id))?;
        Ok(self.events.remove(idx))
    }

    pub fn add_test(&mut self, new: NewTestSession, now: DateTime<Utc>) -> Result<TestSession> {
        let test = TestSession::create(new, now)?;
        self.tests.push(test.clone());
        Ok(test)
    }

    pub fn delete_test(&mut self, id: &str) -> Result<TestSession> {
        let idx = self
            .tests
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| CoreError::NotFound {
                kind: "test",
                id: id.to_string(),
            })?;
        Ok(self.tests.remove(idx))
    }

    /// Returns the topic's previous coverage state and its new mark.
    pub fn set_coverage(
        &mut self,
        update: CoverageUpdate,
        now: DateTime<Utc>,
    ) -> (CoverageState, TopicCoverage) {
        set_coverage(&mut self.coverage, update, now)
    }

    /// Swap in a whole new state (snapshot import).
    pub fn replace(&mut self, profile: Profile) {
        *self = Self::new(profile);
    }

    pub fn is_all_clear(&self, today: NaiveDate) -> bool {
        !self
            .reviews
            .iter()
            .filter(|r| !r.is_completed)
            .any(|r| is_overdue(r, today) || is_due_today(r, today))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::srs::{add_days, Difficulty, Subject};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap()
    }

    fn new_review(topic: &str, difficulty: Difficulty) -> NewReview {
        NewReview::new(topic, Subject::Physics, "Waves", topic, difficulty)
    }

    #[test]
    fn duplicate_topic_is_ignored() {
        let mut book = ReviewBook::default();
        assert!(book.add_review(new_review("sound", Difficulty::Hard), now()).unwrap().is_some());
        assert!(book.add_review(new_review("sound", Difficulty::Easy), now()).unwrap().is_none());
        assert_eq!(book.reviews().len(), 1);
        assert_eq!(book.reviews()[0].difficulty, Difficulty::Hard);
    }

    #[test]
    fn completion_mutates_in_place() {
        let mut book = ReviewBook::default();
        let first = book.add_review(new_review("a", Difficulty::Hard), now()).unwrap().unwrap();
        book.add_review(new_review("b", Difficulty::Hard), now()).unwrap();

        let done = book.complete_review(&first.id, now(), SrsPolicy::default()).unwrap();
        assert_eq!(book.reviews().len(), 2);
        assert_eq!(book.reviews()[0].id, first.id);
        assert_eq!(book.reviews()[0].interval, 1);
        assert_eq!(done.review.times_reviewed, 1);
        assert!(!done.auto_snoozed);
    }

    #[test]
    fn auto_snooze_respects_policy() {
        let mut book = ReviewBook::default();
        let review = book.add_review(new_review("easy", Difficulty::Easy), now()).unwrap().unwrap();
        let off = SrsPolicy {
            auto_snooze_easy: false,
        };
        for _ in 0..2 {
            book.complete_review(&review.id, now(), off).unwrap();
        }
        let third = book.complete_review(&review.id, now(), off).unwrap();
        assert!(!third.auto_snoozed);

        let fourth = book
            .complete_review(&review.id, now(), SrsPolicy::default())
            .unwrap();
        assert!(fourth.auto_snoozed);
        assert_eq!(fourth.review.due_date.day(), add_days(now(), 3));
    }

    #[test]
    fn rejected_snooze_leaves_book_untouched() {
        let mut book = ReviewBook::default();
        let review = book.add_review(new_review("x", Difficulty::Medium), now()).unwrap().unwrap();
        let before = book.reviews().to_vec();
        assert!(book.snooze_review(&review.id, 5).unwrap_err().is_invalid_argument());
        let far = add_days(review.due_date, 4);
        assert!(book.reschedule_review(&review.id, far).is_err());
        assert_eq!(book.reviews(), before.as_slice());
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let mut book = ReviewBook::default();
        let err = book
            .complete_review("review-missing", now(), SrsPolicy::default())
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound { kind: "review", .. }));
        assert!(book.delete_review("review-missing").is_err());
        assert!(book.delete_event("event-missing").is_err());
        assert!(book.delete_test("test-missing").is_err());
    }

    #[test]
    fn out_of_range_first_date_adds_nothing() {
        let mut book = ReviewBook::default();
        let err = book
            .add_review(new_review("far", Difficulty::Easy).with_interval_days(u32::MAX), now())
            .unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(book.reviews().is_empty());
    }

    #[test]
    fn rejected_test_session_is_not_logged() {
        let mut book = ReviewBook::default();
        let new = NewTestSession {
            date: now().date_naive(),
            duration_minutes: 20,
            total_questions: 5,
            correct_answers: 6,
            subject: Some(Subject::Physics),
            chapter: None,
            topics: Vec::new(),
        };
        assert!(book.add_test(new.clone(), now()).unwrap_err().is_invalid_argument());
        assert!(book.tests().is_empty());

        let logged = book
            .add_test(NewTestSession { correct_answers: 4, ..new }, now())
            .unwrap();
        assert_eq!(logged.score, 80);
        assert_eq!(book.delete_test(&logged.id).unwrap(), logged);
        assert!(book.tests().is_empty());
    }

    #[test]
    fn all_clear_after_last_due_review_is_done() {
        let mut book = ReviewBook::default();
        let review = book
            .add_review(new_review("due", Difficulty::Medium).with_interval_days(0), now())
            .unwrap()
            .unwrap();
        assert!(!book.is_all_clear(now().date_naive()));
        let done = book.complete_review(&review.id, now(), SrsPolicy::default()).unwrap();
        assert!(done.all_clear);
    }
}
