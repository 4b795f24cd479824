//! Whole-profile export/import blob.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::book::Profile;
use crate::calendar::ManualEvent;
use crate::error::{Result, ValidationError};
use crate::practice::TestSession;
use crate::srs::Review;
use crate::stats::StreakState;
use crate::storage::Config;
use crate::syllabus::TopicCoverage;

/// Everything needed to move a study profile between machines. Versioned
/// only by `exportDate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub events: Vec<ManualEvent>,
    #[serde(default)]
    pub tests: Vec<TestSession>,
    #[serde(default)]
    pub coverage: Vec<TopicCoverage>,
    #[serde(default)]
    pub settings: Option<Config>,
    #[serde(default)]
    pub streak: Option<StreakState>,
    pub export_date: DateTime<Utc>,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check what a loaded profile must satisfy: ladder positions on the
    /// ladder, at most one live review per topic, and plausible test
    /// sessions.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut live_topics = HashSet::new();
        for review in &self.reviews {
            review.validate()?;
            if !review.is_completed && !live_topics.insert(review.topic_id.as_str()) {
                return Err(ValidationError::InvalidValue {
                    field: "topicId".into(),
                    message: format!("'{}' has more than one live review", review.topic_id),
                });
            }
        }
        for test in &self.tests {
            test.validate()?;
        }
        Ok(())
    }

    /// Split into the stored profile and the settings carried alongside.
    pub fn into_profile(self) -> (Profile, Option<Config>) {
        let profile = Profile {
            reviews: self.reviews,
            events: self.events,
            streak: self.streak.unwrap_or_default(),
            tests: self.tests,
            coverage: self.coverage,
        };
        (profile, self.settings)
    }
}
