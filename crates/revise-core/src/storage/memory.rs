//! In-process store, used by tests and throwaway sessions.

use std::cell::{Cell, RefCell};

use super::ReviewStore;
use crate::calendar::ManualEvent;
use crate::error::{DatabaseError, Result};
use crate::practice::TestSession;
use crate::srs::Review;
use crate::stats::StreakState;
use crate::syllabus::TopicCoverage;

/// Keeps everything in memory. Writes can be made to fail on demand to
/// exercise the durability modes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    reviews: RefCell<Vec<Review>>,
    events: RefCell<Vec<ManualEvent>>,
    streak: RefCell<StreakState>,
    tests: RefCell<Vec<TestSession>>,
    coverage: RefCell<Vec<TopicCoverage>>,
    fail_writes: Cell<bool>,
    fail_next: Cell<usize>,
    writes: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every write returns [`DatabaseError::Locked`].
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Fail only the next `count` writes.
    pub fn fail_next_writes(&self, count: usize) {
        self.fail_next.set(count);
    }

    /// Successful writes so far.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    pub fn stored_reviews(&self) -> Vec<Review> {
        self.reviews.borrow().clone()
    }

    pub fn stored_events(&self) -> Vec<ManualEvent> {
        self.events.borrow().clone()
    }

    pub fn stored_streak(&self) -> StreakState {
        self.streak.borrow().clone()
    }

    pub fn stored_tests(&self) -> Vec<TestSession> {
        self.tests.borrow().clone()
    }

    pub fn stored_coverage(&self) -> Vec<TopicCoverage> {
        self.coverage.borrow().clone()
    }

    fn write(&self) -> Result<()> {
        if self.fail_next.get() > 0 {
            self.fail_next.set(self.fail_next.get() - 1);
            return Err(DatabaseError::Locked.into());
        }
        if self.fail_writes.get() {
            return Err(DatabaseError::Locked.into());
        }
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

impl ReviewStore for MemoryStore {
    fn load_reviews(&self) -> Result<Vec<Review>> {
        Ok(self.stored_reviews())
    }

    fn save_reviews(&self, reviews: &[Review]) -> Result<()> {
        self.write()?;
        *self.reviews.borrow_mut() = reviews.to_vec();
        Ok(())
    }

    fn delete_review(&self, id: &str) -> Result<()> {
        self.write()?;
        self.reviews.borrow_mut().retain(|r| r.id != id);
        Ok(())
    }

    fn load_events(&self) -> Result<Vec<ManualEvent>> {
        Ok(self.stored_events())
    }

    fn save_events(&self, events: &[ManualEvent]) -> Result<()> {
        self.write()?;
        *self.events.borrow_mut() = events.to_vec();
        Ok(())
    }

    fn load_streak(&self) -> Result<StreakState> {
        Ok(self.stored_streak())
    }

    fn save_streak(&self, streak: &StreakState) -> Result<()> {
        self.write()?;
        *self.streak.borrow_mut() = streak.clone();
        Ok(())
    }

    fn load_tests(&self) -> Result<Vec<TestSession>> {
        Ok(self.stored_tests())
    }

    fn save_tests(&self, tests: &[TestSession]) -> Result<()> {
        self.write()?;
        *self.tests.borrow_mut() = tests.to_vec();
        Ok(())
    }

    fn load_coverage(&self) -> Result<Vec<TopicCoverage>> {
        Ok(self.stored_coverage())
    }

    fn save_coverage(&self, coverage: &[TopicCoverage]) -> Result<()> {
        self.write()?;
        *self.coverage.borrow_mut() = coverage.to_vec();
        Ok(())
    }
}
