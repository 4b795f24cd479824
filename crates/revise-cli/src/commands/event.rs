//! Manual calendar event commands for CLI.

use chrono::{NaiveDate, NaiveTime};
use clap::Subcommand;
use revise_core::{EventType, NewEvent};

use super::{open_context, parse_time, print_json, report_events, CliResult};

#[derive(Subcommand)]
pub enum EventAction {
    /// Add an exam, mock test, holiday or other event
    Add {
        /// Event title
        title: String,
        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// Time (HH:MM), defaults to notifications.event_reminder
        #[arg(long, value_parser = parse_time)]
        time: Option<NaiveTime>,
        /// Event type: exam, mock, holiday or other
        #[arg(long = "type", default_value = "other")]
        event_type: EventType,
        #[arg(long)]
        description: Option<String>,
    },
    /// List events, optionally for one day
    List {
        /// Only events on this date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Delete an event
    Delete {
        /// Event ID
        id: String,
    },
}

pub fn run(action: EventAction) -> CliResult {
    let mut ctx = open_context()?;

    match action {
        EventAction::Add {
            title,
            date,
            time,
            event_type,
            description,
        } => {
            let event = ctx.add_event(NewEvent {
                title,
                date,
                time,
                event_type,
                description,
            })?;
            println!("Event added: {}", event.id);
            print_json(&event)?;
        }
        EventAction::List { date: Some(date) } => print_json(&ctx.events_on(date))?,
        EventAction::List { date: None } => print_json(&ctx.events())?,
        EventAction::Delete { id } => {
            let removed = ctx.delete_event(&id)?;
            println!("Event deleted: {}", removed.id);
        }
    }
    report_events(&mut ctx);
    Ok(())
}
