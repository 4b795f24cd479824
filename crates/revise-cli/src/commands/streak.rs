use clap::Subcommand;

use super::{open_context, report_events, CliResult};

#[derive(Subcommand)]
pub enum StreakAction {
    /// Mark yesterday as studied using one restore
    Restore,
    /// Restores left
    Remaining,
}

pub fn run(action: StreakAction) -> CliResult {
    let mut ctx = open_context()?;

    match action {
        StreakAction::Restore => {
            if !ctx.use_streak_restore()? {
                return Err("no streak restores left".into());
            }
            println!(
                "Streak restored: {} day(s), {} restore(s) left",
                ctx.current_streak(),
                ctx.streak_restores_remaining()
            );
        }
        StreakAction::Remaining => println!("{}", ctx.streak_restores_remaining()),
    }
    report_events(&mut ctx);
    Ok(())
}
