//! # Revise Core Library
//!
//! This library provides the core logic for Revise, a spaced-repetition
//! scheduler for exam revision. It follows a CLI-first philosophy: every
//! operation is available through the standalone `revise-cli` binary, and
//! any graphical front end is a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **SRS**: the interval ladder, pure review transitions and the review
//!   queue, all driven by an explicit clock
//! - **Book/Context**: the single in-memory review collection and the
//!   update-then-persist flow around it
//! - **Storage**: SQLite persistence and TOML configuration
//! - **Stats**: review health, forecasts, the study streak, per-subject
//!   breakdowns
//! - **Practice/Syllabus**: the mock test log and topic coverage marks
//! - **Reminders**: what the notification layer should show next
//!
//! ## Key Components
//!
//! - [`StudyContext`]: owns the reviews, the store and the clock
//! - [`Database`]: review and event persistence
//! - [`Config`]: application configuration management

pub mod book;
pub mod calendar;
pub mod context;
pub mod error;
pub mod events;
pub mod practice;
pub mod reminders;
pub mod snapshot;
pub mod srs;
pub mod stats;
pub mod storage;
pub mod syllabus;

pub use book::{CompletionOutcome, Profile, ReviewBook, SrsPolicy};
pub use calendar::{EventType, ManualEvent, NewEvent};
pub use context::StudyContext;
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use practice::{NewTestSession, TestSession, TestSummary};
pub use reminders::{Reminder, ReminderKind};
pub use snapshot::Snapshot;
pub use srs::{Clock, Difficulty, DueDate, FixedClock, NewReview, Review, Subject, SystemClock};
pub use stats::{DayForecast, ReviewStats, StreakState, SubjectBreakdown};
pub use storage::{Config, Database, Durability, MemoryStore, ReviewStore};
pub use syllabus::{CoverageState, CoverageUpdate, TopicCoverage};
