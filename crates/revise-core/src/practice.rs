//! Practice test sessions: mock papers and chapter quizzes the learner sat.
//!
//! Sessions are a plain log beside the review ladder. The score is always
//! derived from the answer counts so it cannot drift from them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::srs::Subject;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSession {
    pub id: String,
    pub date: NaiveDate,
    /// Minutes spent on the paper.
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    pub total_questions: u32,
    pub correct_answers: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Subject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<String>,
    /// Percentage of correct answers, rounded.
    pub score: u32,
    pub created_at: DateTime<Utc>,
}

/// Input for [`TestSession::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTestSession {
    pub date: NaiveDate,
    pub duration_minutes: u32,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub subject: Option<Subject>,
    pub chapter: Option<String>,
    pub topics: Vec<String>,
}

/// `part / whole` as a rounded percentage. `whole` must be non-zero.
fn percent(part: u64, whole: u64) -> u32 {
    u32::try_from((part * 200 + whole) / (whole * 2)).unwrap_or(u32::MAX)
}

fn check_counts(total: u32, correct: u32) -> Result<(), ValidationError> {
    if total == 0 {
        return Err(ValidationError::InvalidArgument(
            "a test needs at least one question".into(),
        ));
    }
    if correct > total {
        return Err(ValidationError::InvalidArgument(format!(
            "{correct} correct answers out of {total} questions"
        )));
    }
    Ok(())
}

impl TestSession {
    /// # Errors
    /// Rejects sessions with no questions or more correct answers than
    /// questions.
    pub fn create(new: NewTestSession, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        check_counts(new.total_questions, new.correct_answers)?;
        Ok(Self {
            id: format!("test-{}", Uuid::new_v4().simple()),
            date: new.date,
            duration_minutes: new.duration_minutes,
            total_questions: new.total_questions,
            correct_answers: new.correct_answers,
            subject: new.subject,
            chapter: new.chapter,
            topics: new.topics,
            score: percent(u64::from(new.correct_answers), u64::from(new.total_questions)),
            created_at: now,
        })
    }

    /// Check a session that did not come from [`TestSession::create`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_counts(self.total_questions, self.correct_answers).map_err(|e| {
            ValidationError::InvalidValue {
                field: "test".into(),
                message: format!("{}: {e}", self.id),
            }
        })?;
        if self.score > 100 {
            return Err(ValidationError::InvalidValue {
                field: "score".into(),
                message: format!("{}: {} is not a percentage", self.id, self.score),
            });
        }
        Ok(())
    }
}

/// Mean score over `tests`, rounded; 0 with no tests.
pub fn average_score<'a, I>(tests: I) -> u32
where
    I: IntoIterator<Item = &'a TestSession>,
{
    let (sum, count) = tests
        .into_iter()
        .fold((0u64, 0u64), |(sum, count), t| (sum + u64::from(t.score), count + 1));
    if count == 0 {
        0
    } else {
        percent(sum, count * 100)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectAverage {
    pub subject: Subject,
    pub tests: usize,
    pub average: u32,
}

/// Average score per subject, in [`Subject::ALL`] order. Subjects without a
/// tagged test are left out.
pub fn subject_averages(tests: &[TestSession]) -> Vec<SubjectAverage> {
    Subject::ALL
        .into_iter()
        .filter_map(|subject| {
            let tagged: Vec<&TestSession> =
                tests.iter().filter(|t| t.subject == Some(subject)).collect();
            (!tagged.is_empty()).then(|| SubjectAverage {
                subject,
                tests: tagged.len(),
                average: average_score(tagged.iter().copied()),
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorePoint {
    pub date: NaiveDate,
    pub score: u32,
}

/// Scores in date order; sessions on the same day keep their logged order.
pub fn score_trend(tests: &[TestSession]) -> Vec<ScorePoint> {
    let mut points: Vec<ScorePoint> = tests
        .iter()
        .map(|t| ScorePoint {
            date: t.date,
            score: t.score,
        })
        .collect();
    points.sort_by_key(|p| p.date);
    points
}

/// Dashboard view over the test log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSummary {
    pub tests: usize,
    pub average_score: u32,
    pub subjects: Vec<SubjectAverage>,
    pub trend: Vec<ScorePoint>,
}

pub fn summarize(tests: &[TestSession]) -> TestSummary {
    TestSummary {
        tests: tests.len(),
        average_score: average_score(tests),
        subjects: subject_averages(tests),
        trend: score_trend(tests),
    }
}

pub fn tests_for_subject(tests: &[TestSession], subject: Subject) -> Vec<&TestSession> {
    tests.iter().filter(|t| t.subject == Some(subject)).collect()
}
