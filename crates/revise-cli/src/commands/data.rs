//! Profile export/import.

use std::path::PathBuf;

use clap::Subcommand;
use revise_core::Snapshot;

use super::{open_context, report_events, CliResult};

#[derive(Subcommand)]
pub enum DataAction {
    /// Write the whole profile and its settings to a JSON file
    Export {
        /// Output file
        path: PathBuf,
    },
    /// Replace the current profile with a previously exported file
    Import {
        /// Input file
        path: PathBuf,
        /// Also apply the settings stored in the file
        #[arg(long)]
        with_settings: bool,
    },
}

pub fn run(action: DataAction) -> CliResult {
    let mut ctx = open_context()?;

    match action {
        DataAction::Export { path } => {
            let snapshot = ctx.export_snapshot();
            std::fs::write(&path, snapshot.to_json()?)?;
            println!(
                "Exported {} review(s), {} event(s) and {} test(s) to {}",
                snapshot.reviews.len(),
                snapshot.events.len(),
                snapshot.tests.len(),
                path.display()
            );
        }
        DataAction::Import {
            path,
            with_settings,
        } => {
            let snapshot = Snapshot::from_json(&std::fs::read_to_string(&path)?)?;
            let (reviews, tests) = (snapshot.reviews.len(), snapshot.tests.len());
            let settings = ctx.import_snapshot(snapshot)?;
            if let (true, Some(settings)) = (with_settings, settings) {
                settings.save()?;
            }
            println!(
                "Imported {reviews} review(s) and {tests} test(s) from {}",
                path.display()
            );
        }
    }
    report_events(&mut ctx);
    Ok(())
}
