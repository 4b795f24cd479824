use clap::Subcommand;
use revise_core::stats::{FORECAST_DAYS, MAX_FORECAST_DAYS};
use serde_json::json;

use super::{open_context, print_json, CliResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Review health and bucket counts
    Summary,
    /// Reviews due on each of the next 7 days
    Overview,
    /// Reviews due per day over a longer window
    Forecast {
        /// Days to cover, at most a year
        #[arg(
            long,
            default_value_t = FORECAST_DAYS,
            value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_FORECAST_DAYS))
        )]
        days: u32,
    },
    /// Current and longest study streak
    Streak,
    /// Tracked reviews and syllabus coverage per subject
    Subjects,
}

pub fn run(action: StatsAction) -> CliResult {
    let ctx = open_context()?;

    match action {
        StatsAction::Summary => {
            let stats = ctx.review_stats();
            print_json(&json!({
                "stats": stats,
                "daysUntilExam": ctx.days_until_exam(),
                "dailyGoal": ctx.config().study.daily_goal,
            }))?;
        }
        StatsAction::Overview => print_json(&ctx.seven_day_overview())?,
        StatsAction::Forecast { days } => print_json(&ctx.forecast(days))?,
        StatsAction::Streak => print_json(&json!({
            "currentStreak": ctx.current_streak(),
            "longestStreak": ctx.longest_streak(),
            "restoresRemaining": ctx.streak_restores_remaining(),
        }))?,
        StatsAction::Subjects => print_json(&ctx.subject_breakdown())?,
    }
    Ok(())
}
