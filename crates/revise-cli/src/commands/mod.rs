pub mod config;
pub mod data;
pub mod event;
pub mod remind;
pub mod review;
pub mod stats;
pub mod streak;
pub mod syllabus;
pub mod test;

use chrono::NaiveTime;
use revise_core::storage::Database;
use revise_core::{Config, Event, StudyContext};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Open the profile in the data directory with the saved config.
pub fn open_context() -> Result<StudyContext<Database>, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;
    tracing::debug!(durability = ?config.srs.durability, "study profile opened");
    Ok(StudyContext::open(db, config)?)
}

/// Tell the user about events a command left behind. Failed writes go to
/// stderr; everything else is only logged.
pub fn report_events(ctx: &mut StudyContext<Database>) {
    for event in ctx.drain_events() {
        match event {
            Event::PersistFailed { message, .. } => {
                eprintln!("warning: not saved, changes are kept for this run only: {message}")
            }
            Event::QueueCleared { .. } => println!("All caught up for today!"),
            other => tracing::debug!(event = ?other, "command event"),
        }
    }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// clap value parser for `HH:MM`.
pub fn parse_time(s: &str) -> Result<NaiveTime, String> {
    revise_core::calendar::parse_hhmm(s).map_err(|e| e.to_string())
}
