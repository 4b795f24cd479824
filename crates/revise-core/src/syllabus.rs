//! Syllabus coverage: how far the learner got through each topic the first
//! time round, independent of the review ladder.
//!
//! Only topics the learner has marked are recorded; an unmarked topic is
//! "Not started".

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::srs::Subject;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoverageState {
    #[default]
    #[serde(rename = "Not started")]
    NotStarted,
    #[serde(rename = "In progress")]
    InProgress,
    Done,
}

impl CoverageState {
    pub const ALL: [CoverageState; 3] = [
        CoverageState::NotStarted,
        CoverageState::InProgress,
        CoverageState::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CoverageState::NotStarted => "Not started",
            CoverageState::InProgress => "In progress",
            CoverageState::Done => "Done",
        }
    }
}

impl fmt::Display for CoverageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoverageState {
    type Err = ValidationError;

    /// Accepts the display form as well as `not-started`, `in-progress`
    /// and `done`, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace(['-', '_'], " ");
        CoverageState::ALL
            .into_iter()
            .find(|state| state.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "coverage".into(),
                message: format!("expected not-started, in-progress or done, got '{s}'"),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicCoverage {
    pub topic_id: String,
    pub subject: Subject,
    pub chapter: String,
    pub topic: String,
    #[serde(rename = "coverageState")]
    pub state: CoverageState,
    pub updated_at: DateTime<Utc>,
}

/// Input for [`set_coverage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageUpdate {
    pub topic_id: String,
    pub subject: Subject,
    pub chapter: String,
    pub topic: String,
    pub state: CoverageState,
}

/// Record `update` for its topic, replacing any earlier mark. Returns the
/// state the topic had before along with the new mark.
pub fn set_coverage(
    records: &mut Vec<TopicCoverage>,
    update: CoverageUpdate,
    now: DateTime<Utc>,
) -> (CoverageState, TopicCoverage) {
    let record = TopicCoverage {
        topic_id: update.topic_id,
        subject: update.subject,
        chapter: update.chapter,
        topic: update.topic,
        state: update.state,
        updated_at: now,
    };
    let previous = match records.iter_mut().find(|r| r.topic_id == record.topic_id) {
        Some(existing) => std::mem::replace(existing, record.clone()).state,
        None => {
            records.push(record.clone());
            CoverageState::NotStarted
        }
    };
    (previous, record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn update(topic_id: &str, state: CoverageState) -> CoverageUpdate {
        CoverageUpdate {
            topic_id: topic_id.into(),
            subject: Subject::Chemistry,
            chapter: "Solutions".into(),
            topic: topic_id.into(),
            state,
        }
    }

    #[test]
    fn marking_a_topic_replaces_the_earlier_mark() {
        let mut records = Vec::new();
        let (before, _) =
            set_coverage(&mut records, update("raoult", CoverageState::InProgress), now());
        assert_eq!(before, CoverageState::NotStarted);
        let (before, mark) =
            set_coverage(&mut records, update("raoult", CoverageState::Done), now());
        assert_eq!(before, CoverageState::InProgress);
        assert_eq!(mark.state, CoverageState::Done);

        assert_eq!(records, vec![mark]);
    }

    #[test]
    fn states_parse_loosely_and_serialize_with_spaces() {
        assert_eq!("in-progress".parse::<CoverageState>().unwrap(), CoverageState::InProgress);
        assert_eq!("Not started".parse::<CoverageState>().unwrap(), CoverageState::NotStarted);
        assert_eq!("DONE".parse::<CoverageState>().unwrap(), CoverageState::Done);
        assert!("skipped".parse::<CoverageState>().is_err());
        assert_eq!(
            serde_json::to_value(CoverageState::InProgress).unwrap(),
            "In progress"
        );
    }
}
