//! Syllabus coverage commands.

use clap::Subcommand;
use revise_core::{CoverageState, CoverageUpdate, Subject};

use super::{open_context, print_json, report_events, CliResult};

#[derive(Subcommand)]
pub enum SyllabusAction {
    /// Mark how far you got through a topic
    Set {
        /// Syllabus topic ID
        topic_id: String,
        /// Subject: physics, chemistry or biology
        #[arg(long)]
        subject: Subject,
        /// Chapter label
        #[arg(long)]
        chapter: String,
        /// Topic label (defaults to the topic ID)
        #[arg(long)]
        topic: Option<String>,
        /// not-started, in-progress or done
        #[arg(long)]
        state: CoverageState,
    },
    /// List every marked topic
    List,
}

pub fn run(action: SyllabusAction) -> CliResult {
    let mut ctx = open_context()?;

    match action {
        SyllabusAction::Set {
            topic_id,
            subject,
            chapter,
            topic,
            state,
        } => {
            let topic = topic.unwrap_or_else(|| topic_id.clone());
            let mark = ctx.set_topic_coverage(CoverageUpdate {
                topic_id,
                subject,
                chapter,
                topic,
                state,
            })?;
            print_json(&mark)?;
        }
        SyllabusAction::List => print_json(&ctx.coverage())?,
    }
    report_events(&mut ctx);
    Ok(())
}
