//! Practice test log commands.

use chrono::NaiveDate;
use clap::Subcommand;
use revise_core::{NewTestSession, Subject};

use super::{open_context, print_json, report_events, CliResult};

#[derive(Subcommand)]
pub enum TestAction {
    /// Log a test you sat
    Add {
        /// Number of questions on the paper
        #[arg(long)]
        total: u32,
        /// Questions answered correctly
        #[arg(long)]
        correct: u32,
        /// Minutes spent
        #[arg(long, default_value = "0")]
        duration: u32,
        /// Day the test was taken (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Subject the test covered, if only one
        #[arg(long)]
        subject: Option<Subject>,
        /// Chapter the test covered
        #[arg(long)]
        chapter: Option<String>,
        /// Topic covered (repeatable)
        #[arg(long = "topic")]
        topics: Vec<String>,
    },
    /// List logged tests
    List {
        /// Only tests tagged with this subject
        #[arg(long)]
        subject: Option<Subject>,
    },
    /// Remove a logged test
    Delete {
        /// Test ID
        id: String,
    },
    /// Average score, per-subject averages and score trend
    Summary,
}

pub fn run(action: TestAction) -> CliResult {
    let mut ctx = open_context()?;

    match action {
        TestAction::Add {
            total,
            correct,
            duration,
            date,
            subject,
            chapter,
            topics,
        } => {
            let date = date.unwrap_or_else(|| ctx.today());
            let test = ctx.add_test(NewTestSession {
                date,
                duration_minutes: duration,
                total_questions: total,
                correct_answers: correct,
                subject,
                chapter,
                topics,
            })?;
            println!("Test logged: {} ({}%)", test.id, test.score);
            print_json(&test)?;
        }
        TestAction::List { subject: None } => print_json(&ctx.tests())?,
        TestAction::List {
            subject: Some(subject),
        } => print_json(&ctx.tests_for_subject(subject))?,
        TestAction::Delete { id } => {
            let removed = ctx.delete_test(&id)?;
            println!("Test deleted: {}", removed.id);
        }
        TestAction::Summary => print_json(&ctx.test_summary())?,
    }
    report_events(&mut ctx);
    Ok(())
}
