use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "revise-cli", version, about = "Revise spaced-repetition CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Review tracking and the daily queue
    Review {
        #[command(subcommand)]
        action: commands::review::ReviewAction,
    },
    /// Review statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Study streak restores
    Streak {
        #[command(subcommand)]
        action: commands::streak::StreakAction,
    },
    /// Practice test log
    Test {
        #[command(subcommand)]
        action: commands::test::TestAction,
    },
    /// Syllabus coverage marks
    Syllabus {
        #[command(subcommand)]
        action: commands::syllabus::SyllabusAction,
    },
    /// Manual calendar events
    Event {
        #[command(subcommand)]
        action: commands::event::EventAction,
    },
    /// Reminder planning
    Remind {
        #[command(subcommand)]
        action: commands::remind::RemindAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Export and import of the whole profile
    Data {
        #[command(subcommand)]
        action: commands::data::DataAction,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("REVISE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Review { action } => commands::review::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Streak { action } => commands::streak::run(action),
        Commands::Test { action } => commands::test::run(action),
        Commands::Syllabus { action } => commands::syllabus::run(action),
        Commands::Event { action } => commands::event::run(action),
        Commands::Remind { action } => commands::remind::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Data { action } => commands::data::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
