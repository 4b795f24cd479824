//! The review record and its factory.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::dates::{checked_add_days, is_representable, DueDate};
use super::intervals::{is_terminal, INTERVAL_TABLE, TERMINAL_POSITION};
use crate::error::ValidationError;

/// Exam subject a topic belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Subject {
    Physics,
    Chemistry,
    Biology,
}

impl Subject {
    pub const ALL: [Subject; 3] = [Subject::Physics, Subject::Chemistry, Subject::Biology];

    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::Physics => "Physics",
            Subject::Chemistry => "Chemistry",
            Subject::Biology => "Biology",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subject {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Subject::ALL
            .into_iter()
            .find(|subject| subject.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "subject".into(),
                message: format!("expected Physics, Chemistry or Biology, got '{s}'"),
            })
    }
}

/// How hard a topic is for the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Position among same-day reviews: hardest first.
    pub fn queue_rank(&self) -> u8 {
        match self {
            Difficulty::Hard => 0,
            Difficulty::Medium => 1,
            Difficulty::Easy => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "difficulty".into(),
                message: format!("expected Easy, Medium or Hard, got '{s}'"),
            })
    }
}

/// One topic under spaced repetition.
///
/// Subject, chapter and topic labels are snapshotted at creation so old
/// reviews stay readable after the syllabus text changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub topic_id: String,
    pub subject: Subject,
    pub chapter: String,
    pub topic: String,
    pub difficulty: Difficulty,
    /// Ladder position, an index into [`INTERVAL_TABLE`].
    pub interval: usize,
    pub due_date: DueDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub times_reviewed: u32,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Reached the last rung of the ladder.
    pub fn is_mastered(&self) -> bool {
        is_terminal(self.interval)
    }

    /// Check a record that did not come from [`create_review`], such as an
    /// imported one.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.interval > TERMINAL_POSITION {
            return Err(ValidationError::InvalidValue {
                field: "interval".into(),
                message: format!(
                    "{}: position {} is past the last rung ({TERMINAL_POSITION})",
                    self.id, self.interval
                ),
            });
        }
        Ok(())
    }
}

/// Input for [`create_review`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub topic_id: String,
    pub subject: Subject,
    pub chapter: String,
    pub topic: String,
    pub difficulty: Difficulty,
    /// Explicit first due date; wins over `interval_days`.
    pub custom_date: Option<NaiveDate>,
    /// Days from today until the first review.
    pub interval_days: Option<u32>,
}

impl NewReview {
    pub fn new(
        topic_id: impl Into<String>,
        subject: Subject,
        chapter: impl Into<String>,
        topic: impl Into<String>,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            topic_id: topic_id.into(),
            subject,
            chapter: chapter.into(),
            topic: topic.into(),
            difficulty,
            custom_date: None,
            interval_days: None,
        }
    }

    pub fn with_custom_date(mut self, date: NaiveDate) -> Self {
        self.custom_date = Some(date);
        self
    }

    pub fn with_interval_days(mut self, days: u32) -> Self {
        self.interval_days = Some(days);
        self
    }
}

/// Build a fresh review at ladder position 0.
///
/// The first due date is `custom_date` when given, otherwise today plus
/// `interval_days`, otherwise today plus the first rung. Does not check for
/// an existing review of the same topic.
///
/// # Errors
/// Returns [`ValidationError::InvalidArgument`] when the first due date falls
/// outside years 1 to 9999.
pub fn create_review(new: NewReview, now: DateTime<Utc>) -> Result<Review, ValidationError> {
    let first_due = match (new.custom_date, new.interval_days) {
        (Some(date), _) => Some(date).filter(|date| is_representable(*date)),
        (None, Some(days)) => checked_add_days(now, i64::from(days)),
        (None, None) => checked_add_days(now, i64::from(INTERVAL_TABLE[0])),
    };
    let due_date = first_due.map(DueDate::new).ok_or_else(|| {
        ValidationError::InvalidArgument("first review date is out of range".into())
    })?;

    Ok(Review {
        id: format!("review-{}-{}", new.topic_id, Uuid::new_v4().simple()),
        topic_id: new.topic_id,
        subject: new.subject,
        chapter: new.chapter,
        topic: new.topic,
        difficulty: new.difficulty,
        interval: 0,
        due_date,
        last_reviewed: None,
        times_reviewed: 0,
        is_completed: false,
        notes: None,
        created_at: now,
    })
}
