mod config;
pub mod database;
mod memory;
pub mod migrations;

pub use config::{Config, Durability, NotificationsConfig, SrsConfig, StudyConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::book::Profile;
use crate::calendar::ManualEvent;
use crate::error::{ConfigError, Result};
use crate::practice::TestSession;
use crate::srs::Review;
use crate::stats::StreakState;
use crate::syllabus::TopicCoverage;

/// Durable home of the review collection.
///
/// Writes are whole-collection replacements; the context decides whether a
/// failed write is reported or only logged.
pub trait ReviewStore {
    fn load_reviews(&self) -> Result<Vec<Review>>;
    fn save_reviews(&self, reviews: &[Review]) -> Result<()>;
    fn delete_review(&self, id: &str) -> Result<()>;

    fn load_events(&self) -> Result<Vec<ManualEvent>>;
    fn save_events(&self, events: &[ManualEvent]) -> Result<()>;

    fn load_streak(&self) -> Result<StreakState>;
    fn save_streak(&self, streak: &StreakState) -> Result<()>;

    fn load_tests(&self) -> Result<Vec<TestSession>>;
    fn save_tests(&self, tests: &[TestSession]) -> Result<()>;

    fn load_coverage(&self) -> Result<Vec<TopicCoverage>>;
    fn save_coverage(&self, coverage: &[TopicCoverage]) -> Result<()>;

    fn load_profile(&self) -> Result<Profile> {
        Ok(Profile {
            reviews: self.load_reviews()?,
            events: self.load_events()?,
            streak: self.load_streak()?,
            tests: self.load_tests()?,
            coverage: self.load_coverage()?,
        })
    }
}

/// Returns `~/.config/revise[-dev]/` based on REVISE_ENV.
///
/// Set REVISE_ENV=dev to use the development data directory, or
/// REVISE_DATA_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("REVISE_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("REVISE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("revise-dev")
            } else {
                base_dir.join("revise")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
