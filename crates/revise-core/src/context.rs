//! The application context: one authoritative review collection plus the
//! store it is written back to.
//!
//! Every mutator follows update-then-persist. The [`ReviewBook`] is changed
//! first; only then is the new state handed to the [`ReviewStore`]. What a
//! failed write means is decided by [`Durability`]: best-effort logs it and
//! carries on, strict returns it. In-memory state is never rolled back.

use chrono::{DateTime, NaiveDate, Utc};

use crate::book::{CompletionOutcome, ReviewBook};
use crate::calendar::{self, ManualEvent, NewEvent};
use crate::error::{Result, ValidationError};
use crate::events::Event;
use crate::practice::{self, NewTestSession, TestSession, TestSummary};
use crate::reminders::{plan_reminders, Reminder};
use crate::snapshot::Snapshot;
use crate::srs::{add_days, build_queue, Clock, NewReview, Review, Subject, SystemClock};
use crate::stats::{
    activity_days, current_streak, forecast, longest_streak, review_stats, seven_day_overview,
    subject_breakdown, DayForecast, ReviewStats, StreakState, SubjectBreakdown,
};
use crate::storage::{Config, Durability, ReviewStore};
use crate::syllabus::{CoverageUpdate, TopicCoverage};

pub struct StudyContext<S: ReviewStore, C: Clock = SystemClock> {
    book: ReviewBook,
    store: S,
    clock: C,
    config: Config,
    events: Vec<Event>,
}

impl<S: ReviewStore> StudyContext<S, SystemClock> {
    /// Load state from `store` using the wall clock.
    pub fn open(store: S, config: Config) -> Result<Self> {
        Self::load(store, SystemClock, config)
    }
}

impl<S: ReviewStore, C: Clock> StudyContext<S, C> {
    /// Read the whole profile from `store`.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn load(store: S, clock: C, config: Config) -> Result<Self> {
        let profile = store.load_profile()?;
        tracing::debug!(
            reviews = profile.reviews.len(),
            events = profile.events.len(),
            tests = profile.tests.len(),
            "study context loaded"
        );
        Ok(Self {
            book: ReviewBook::new(profile),
            store,
            clock,
            config,
            events: Vec::new(),
        })
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn reviews(&self) -> &[Review] {
        self.book.reviews()
    }

    pub fn review(&self, id: &str) -> Option<&Review> {
        self.book.get(id)
    }

    pub fn events(&self) -> &[ManualEvent] {
        self.book.events()
    }

    pub fn streak_state(&self) -> &StreakState {
        self.book.streak()
    }

    pub fn tests(&self) -> &[TestSession] {
        self.book.tests()
    }

    pub fn coverage(&self) -> &[TopicCoverage] {
        self.book.coverage()
    }

    /// Take the events produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    fn persist(&mut self, what: &'static str, result: Result<()>) -> Result<()> {
        let Err(e) = result else {
            return Ok(());
        };
        match self.config.srs.durability {
            Durability::BestEffort => {
                tracing::warn!("failed to persist {what}, keeping in-memory state: {e}");
                self.events.push(Event::PersistFailed {
                    message: format!("{what}: {e}"),
                    at: self.clock.now(),
                });
                Ok(())
            }
            Durability::Strict => {
                tracing::error!("failed to persist {what}: {e}");
                Err(e)
            }
        }
    }

    fn persist_reviews(&mut self) -> Result<()> {
        let result = self.store.save_reviews(self.book.reviews());
        self.persist("reviews", result)
    }

    fn persist_events(&mut self) -> Result<()> {
        let result = self.store.save_events(self.book.events());
        self.persist("events", result)
    }

    fn persist_streak(&mut self) -> Result<()> {
        let result = self.store.save_streak(self.book.streak());
        self.persist("streak", result)
    }

    fn persist_tests(&mut self) -> Result<()> {
        let result = self.store.save_tests(self.book.tests());
        self.persist("tests", result)
    }

    fn persist_coverage(&mut self) -> Result<()> {
        let result = self.store.save_coverage(self.book.coverage());
        self.persist("coverage", result)
    }

    // --- review mutators ---

    /// Start tracking a topic. `Ok(None)` when the topic already has a live
    /// review; nothing changes in that case.
    ///
    /// # Errors
    /// Rejects a first due date outside the calendar range.
    pub fn add_review(&mut self, new: NewReview) -> Result<Option<Review>> {
        let now = self.clock.now();
        let topic_id = new.topic_id.clone();
        let Some(review) = self.book.add_review(new, now)? else {
            tracing::warn!(topic_id = %topic_id, "review already exists for topic, ignoring");
            self.events.push(Event::DuplicateTopicIgnored { topic_id, at: now });
            return Ok(None);
        };

        tracing::info!(review_id = %review.id, due = %review.due_date, "review added");
        self.events.push(Event::ReviewAdded {
            review_id: review.id.clone(),
            topic_id: review.topic_id.clone(),
            due_date: review.due_date,
            at: now,
        });
        self.persist_reviews()?;
        Ok(Some(review))
    }

    pub fn complete_review(&mut self, id: &str) -> Result<CompletionOutcome> {
        let now = self.clock.now();
        let outcome = self.book.complete_review(id, now, self.config.policy())?;

        tracing::info!(
            review_id = id,
            interval = outcome.review.interval,
            due = %outcome.review.due_date,
            auto_snoozed = outcome.auto_snoozed,
            "review completed"
        );
        self.events.push(Event::ReviewCompleted {
            review_id: id.to_string(),
            interval: outcome.review.interval,
            due_date: outcome.review.due_date,
            auto_snoozed: outcome.auto_snoozed,
            at: now,
        });
        if outcome.all_clear {
            self.events.push(Event::QueueCleared { at: now });
        }
        self.persist_reviews()?;
        Ok(outcome)
    }

    pub fn snooze_review_by_id(&mut self, id: &str, days: i64) -> Result<Review> {
        let snoozed = self.book.snooze_review(id, days)?;
        tracing::info!(review_id = id, days, due = %snoozed.due_date, "review snoozed");
        self.events.push(Event::ReviewSnoozed {
            review_id: id.to_string(),
            days,
            due_date: snoozed.due_date,
            at: self.clock.now(),
        });
        self.persist_reviews()?;
        Ok(snoozed)
    }

    pub fn reschedule_review_by_id(&mut self, id: &str, date: NaiveDate) -> Result<Review> {
        let (from, moved) = self.book.reschedule_review(id, date)?;
        tracing::info!(review_id = id, %from, to = %moved.due_date, "review rescheduled");
        self.events.push(Event::ReviewRescheduled {
            review_id: id.to_string(),
            from,
            to: moved.due_date,
            at: self.clock.now(),
        });
        self.persist_reviews()?;
        Ok(moved)
    }

    /// Remove a review whatever its ladder position.
    pub fn delete_review(&mut self, id: &str) -> Result<Review> {
        let removed = self.book.delete_review(id)?;
        tracing::info!(review_id = id, "review deleted");
        self.events.push(Event::ReviewDeleted {
            review_id: id.to_string(),
            at: self.clock.now(),
        });
        let result = self.store.delete_review(id);
        self.persist("review deletion", result)?;
        Ok(removed)
    }

    // --- streak ---

    /// Spend a restore on yesterday. `Ok(false)` once none are left.
    pub fn use_streak_restore(&mut self) -> Result<bool> {
        let today = self.clock.today();
        if !self.book.restore_streak(today) {
            tracing::warn!("no streak restores left");
            return Ok(false);
        }
        let remaining = self.book.streak().restores_remaining();
        tracing::info!(remaining, "streak restore used");
        self.events.push(Event::StreakRestored {
            day: add_days(today, -1),
            remaining,
            at: self.clock.now(),
        });
        self.persist_streak()?;
        Ok(true)
    }

    pub fn streak_restores_remaining(&self) -> u32 {
        self.book.streak().restores_remaining()
    }

    pub fn current_streak(&self) -> u32 {
        let activity = activity_days(self.book.reviews(), self.book.streak());
        current_streak(&activity, self.clock.today())
    }

    pub fn longest_streak(&self) -> u32 {
        longest_streak(&activity_days(self.book.reviews(), self.book.streak()))
    }

    // --- practice tests ---

    pub fn add_test(&mut self, new: NewTestSession) -> Result<TestSession> {
        let now = self.clock.now();
        let test = self.book.add_test(new, now)?;
        tracing::info!(test_id = %test.id, score = test.score, "test session logged");
        self.events.push(Event::TestLogged {
            test_id: test.id.clone(),
            score: test.score,
            at: now,
        });
        self.persist_tests()?;
        Ok(test)
    }

    pub fn delete_test(&mut self, id: &str) -> Result<TestSession> {
        let removed = self.book.delete_test(id)?;
        tracing::info!(test_id = id, "test session deleted");
        self.events.push(Event::TestDeleted {
            test_id: id.to_string(),
            at: self.clock.now(),
        });
        self.persist_tests()?;
        Ok(removed)
    }

    pub fn tests_for_subject(&self, subject: Subject) -> Vec<&TestSession> {
        practice::tests_for_subject(self.book.tests(), subject)
    }

    pub fn test_summary(&self) -> TestSummary {
        practice::summarize(self.book.tests())
    }

    // --- syllabus coverage ---

    pub fn set_topic_coverage(&mut self, update: CoverageUpdate) -> Result<TopicCoverage> {
        let now = self.clock.now();
        let (from, mark) = self.book.set_coverage(update, now);
        tracing::info!(topic_id = %mark.topic_id, %from, to = %mark.state, "coverage updated");
        self.events.push(Event::CoverageChanged {
            topic_id: mark.topic_id.clone(),
            from,
            to: mark.state,
            at: now,
        });
        self.persist_coverage()?;
        Ok(mark)
    }

    // --- manual events ---

    /// Events without a time get `notifications.event_reminder`.
    pub fn add_event(&mut self, mut new: NewEvent) -> Result<ManualEvent> {
        if new.title.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "title".into(),
                message: "must not be empty".into(),
            }
            .into());
        }
        new.time.get_or_insert(self.config.notifications.event_reminder);

        let now = self.clock.now();
        let event = self.book.add_event(new, now);
        tracing::info!(event_id = %event.id, date = %event.date, "manual event added");
        self.events.push(Event::ManualEventAdded {
            event_id: event.id.clone(),
            date: event.date,
            at: now,
        });
        self.persist_events()?;
        Ok(event)
    }

    pub fn delete_event(&mut self, id: &str) -> Result<ManualEvent> {
        let removed = self.book.delete_event(id)?;
        tracing::info!(event_id = id, "manual event deleted");
        self.events.push(Event::ManualEventDeleted {
            event_id: id.to_string(),
            at: self.clock.now(),
        });
        self.persist_events()?;
        Ok(removed)
    }

    pub fn events_on(&self, date: NaiveDate) -> Vec<&ManualEvent> {
        calendar::events_on(self.book.events(), date)
    }

    // --- queries ---

    pub fn queued_reviews(&self) -> Vec<Review> {
        build_queue(self.book.reviews(), self.clock.today())
    }

    pub fn review_stats(&self) -> ReviewStats {
        review_stats(self.book.reviews(), self.clock.today())
    }

    pub fn seven_day_overview(&self) -> Vec<DayForecast> {
        seven_day_overview(self.book.reviews(), self.clock.today())
    }

    pub fn forecast(&self, days: u32) -> Vec<DayForecast> {
        forecast(self.book.reviews(), self.clock.today(), days)
    }

    pub fn subject_breakdown(&self) -> Vec<SubjectBreakdown> {
        subject_breakdown(self.book.reviews(), self.book.coverage())
    }

    pub fn days_until_exam(&self) -> Option<i64> {
        self.config.study.days_until_exam(self.clock.today())
    }

    pub fn plan_reminders(&self) -> Vec<Reminder> {
        plan_reminders(
            self.book.reviews(),
            self.book.events(),
            &self.config.notifications,
            self.clock.now(),
        )
    }

    // --- export/import ---

    pub fn export_snapshot(&self) -> Snapshot {
        Snapshot {
            reviews: self.book.reviews().to_vec(),
            events: self.book.events().to_vec(),
            tests: self.book.tests().to_vec(),
            coverage: self.book.coverage().to_vec(),
            settings: Some(self.config.clone()),
            streak: Some(self.book.streak().clone()),
            export_date: self.clock.now(),
        }
    }

    /// Replace the whole profile with the snapshot's. Settings in the blob
    /// are returned untouched for the caller to apply; the context keeps
    /// running with its current config.
    ///
    /// # Errors
    /// A snapshot that fails [`Snapshot::validate`] is rejected before
    /// anything changes. Under strict durability every collection is still
    /// written before the first write failure is returned.
    pub fn import_snapshot(&mut self, snapshot: Snapshot) -> Result<Option<Config>> {
        if let Err(e) = snapshot.validate() {
            tracing::warn!("rejecting snapshot from {}: {e}", snapshot.export_date);
            return Err(e.into());
        }
        tracing::info!(
            reviews = snapshot.reviews.len(),
            events = snapshot.events.len(),
            tests = snapshot.tests.len(),
            exported = %snapshot.export_date,
            "importing snapshot"
        );
        let (profile, settings) = snapshot.into_profile();
        self.book.replace(profile);
        let writes = [
            self.persist_reviews(),
            self.persist_events(),
            self.persist_streak(),
            self.persist_tests(),
            self.persist_coverage(),
        ];
        writes.into_iter().collect::<Result<()>>()?;
        Ok(settings)
    }
}
