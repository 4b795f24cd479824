//! Per-subject breakdown of tracked reviews and syllabus coverage.

use serde::{Deserialize, Serialize};

use crate::srs::{Difficulty, Review, Subject};
use crate::syllabus::{CoverageState, TopicCoverage};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectBreakdown {
    pub subject: Subject,
    pub total: usize,
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
    /// Reviews sitting on the terminal rung.
    pub mastered: usize,
    /// Topics with a coverage mark, whatever the mark.
    pub topics_marked: usize,
    pub topics_completed: usize,
    pub topics_in_progress: usize,
}

impl SubjectBreakdown {
    fn empty(subject: Subject) -> Self {
        Self {
            subject,
            total: 0,
            easy: 0,
            medium: 0,
            hard: 0,
            mastered: 0,
            topics_marked: 0,
            topics_completed: 0,
            topics_in_progress: 0,
        }
    }
}

/// One row per subject, in [`Subject::ALL`] order, including subjects with
/// nothing tracked.
pub fn subject_breakdown<'a, I>(reviews: I, coverage: &[TopicCoverage]) -> Vec<SubjectBreakdown>
where
    I: IntoIterator<Item = &'a Review>,
{
    let mut rows: Vec<SubjectBreakdown> =
        Subject::ALL.into_iter().map(SubjectBreakdown::empty).collect();

    for review in reviews.into_iter().filter(|r| !r.is_completed) {
        let Some(row) = rows.iter_mut().find(|row| row.subject == review.subject) else {
            continue;
        };
        row.total += 1;
        match review.difficulty {
            Difficulty::Easy => row.easy += 1,
            Difficulty::Medium => row.medium += 1,
            Difficulty::Hard => row.hard += 1,
        }
        if review.is_mastered() {
            row.mastered += 1;
        }
    }

    for mark in coverage {
        let Some(row) = rows.iter_mut().find(|row| row.subject == mark.subject) else {
            continue;
        };
        row.topics_marked += 1;
        match mark.state {
            CoverageState::Done => row.topics_completed += 1,
            CoverageState::InProgress => row.topics_in_progress += 1,
            CoverageState::NotStarted => {}
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::srs::{create_review, NewReview};
    use chrono::{TimeZone, Utc};

    fn review(subject: Subject, difficulty: Difficulty, interval: usize) -> Review {
        let mut review = create_review(
            NewReview::new("x", subject, "c", "t", difficulty),
            Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap(),
        )
        .unwrap();
        review.interval = interval;
        review
    }

    fn mark(subject: Subject, topic_id: &str, state: CoverageState) -> TopicCoverage {
        TopicCoverage {
            topic_id: topic_id.into(),
            subject,
            chapter: "c".into(),
            topic: topic_id.into(),
            state,
            updated_at: Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn groups_by_subject_and_difficulty() {
        let reviews = vec![
            review(Subject::Physics, Difficulty::Hard, 0),
            review(Subject::Physics, Difficulty::Easy, 4),
            review(Subject::Biology, Difficulty::Medium, 2),
        ];
        let rows = subject_breakdown(&reviews, &[]);
        assert_eq!(rows.len(), 3);

        let physics = &rows[0];
        assert_eq!(physics.subject, Subject::Physics);
        assert_eq!((physics.total, physics.easy, physics.hard), (2, 1, 1));
        assert_eq!(physics.mastered, 1);

        assert_eq!(rows[1].total, 0);
        assert_eq!(rows[2].medium, 1);
        assert_eq!(rows[2].mastered, 0);
    }

    #[test]
    fn coverage_is_counted_per_subject() {
        let coverage = vec![
            mark(Subject::Chemistry, "a", CoverageState::Done),
            mark(Subject::Chemistry, "b", CoverageState::InProgress),
            mark(Subject::Chemistry, "c", CoverageState::NotStarted),
            mark(Subject::Biology, "d", CoverageState::Done),
        ];
        let rows = subject_breakdown(std::iter::empty::<&Review>(), &coverage);
        let chemistry = &rows[1];
        assert_eq!(
            (
                chemistry.topics_marked,
                chemistry.topics_completed,
                chemistry.topics_in_progress
            ),
            (3, 1, 1)
        );
        assert_eq!(rows[2].topics_completed, 1);
        assert_eq!(rows[0].topics_marked, 0);
        assert_eq!(chemistry.total, 0);
    }
}
