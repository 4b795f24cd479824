use clap::Subcommand;

use super::{open_context, print_json, CliResult};

#[derive(Subcommand)]
pub enum RemindAction {
    /// Show the reminders that would fire next
    Plan,
}

pub fn run(action: RemindAction) -> CliResult {
    let ctx = open_context()?;

    match action {
        RemindAction::Plan => print_json(&ctx.plan_reminders())?,
    }
    Ok(())
}
