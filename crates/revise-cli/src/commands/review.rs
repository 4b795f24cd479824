//! Review management commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use revise_core::{Difficulty, NewReview, Subject};

use super::{open_context, print_json, report_events, CliResult};

#[derive(Subcommand)]
pub enum ReviewAction {
    /// Start tracking a topic
    Add {
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
        /// Difficulty: easy, medium or hard
        #[arg(long, default_value = "medium")]
        difficulty: Difficulty,
        /// First due date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "in_days")]
        date: Option<NaiveDate>,
        /// Days until the first review
        #[arg(long)]
        in_days: Option<u32>,
    },
    /// List every tracked review
    List,
    /// Show the actionable queue (overdue, today, tomorrow)
    Queue,
    /// Mark a review as done
    Complete {
        /// Review ID
        id: String,
    },
    /// Push a review back by 1-3 days
    Snooze {
        /// Review ID
        id: String,
        /// Days to snooze
        #[arg(long, default_value = "1", allow_negative_numbers = true)]
        days: i64,
    },
    /// Move a review to a date within 3 days of its due date
    Reschedule {
        /// Review ID
        id: String,
        /// New due date (YYYY-MM-DD)
        date: NaiveDate,
    },
    /// Stop tracking a review
    Delete {
        /// Review ID
        id: String,
    },
}

pub fn run(action: ReviewAction) -> CliResult {
    let mut ctx = open_context()?;

    match action {
        ReviewAction::Add {
            topic_id,
            subject,
            chapter,
            topic,
            difficulty,
            date,
            in_days,
        } => {
            let label = topic.unwrap_or_else(|| topic_id.clone());
            let mut new = NewReview::new(topic_id.clone(), subject, chapter, label, difficulty);
            if let Some(date) = date {
                new = new.with_custom_date(date);
            }
            if let Some(days) = in_days {
                new = new.with_interval_days(days);
            }
            match ctx.add_review(new)? {
                Some(review) => {
                    println!("Review added: {}", review.id);
                    print_json(&review)?;
                }
                None => println!("Topic {topic_id} is already being reviewed"),
            }
        }
        ReviewAction::List => print_json(&ctx.reviews())?,
        ReviewAction::Queue => print_json(&ctx.queued_reviews())?,
        ReviewAction::Complete { id } => {
            print_json(&ctx.complete_review(&id)?)?;
        }
        ReviewAction::Snooze { id, days } => print_json(&ctx.snooze_review_by_id(&id, days)?)?,
        ReviewAction::Reschedule { id, date } => {
            print_json(&ctx.reschedule_review_by_id(&id, date)?)?
        }
        ReviewAction::Delete { id } => {
            let removed = ctx.delete_review(&id)?;
            println!("Review deleted: {}", removed.id);
        }
    }
    report_events(&mut ctx);
    Ok(())
}
