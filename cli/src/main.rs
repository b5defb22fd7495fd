mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{
    cmd_add, cmd_clear, cmd_dashboard, cmd_delete, cmd_export, cmd_goal, cmd_import, cmd_list,
    cmd_report, cmd_week,
};
use crate::config::Config;
use nutriwise_core::{Database, Tracker};

#[derive(Parser)]
#[command(
    name = "nutriwise",
    version,
    about = "A local-first meal and calorie tracker",
    long_about = "Log meals, track today's calories against a daily goal, and see the last seven days at a glance."
)]
struct Cli {
    /// Directory holding the NutriWise database (overrides NUTRIWISE_DATA_DIR)
    #[arg(long, global = true, value_name = "PATH")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a meal
    Add {
        /// Meal name
        name: String,
        /// Calories in the meal
        #[arg(allow_negative_numbers = true)]
        calories: i64,
        /// Category: breakfast, lunch, dinner, snack
        #[arg(short, long, default_value = "snack")]
        category: String,
        /// Date eaten (YYYY-MM-DD, today or yesterday; default: now)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a meal by ID
    Delete {
        /// Meal ID (see `nutriwise list`)
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete every logged meal
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set the daily calorie goal (invalid values reset it to 2000)
    Goal {
        /// Daily calorie goal
        #[arg(allow_hyphen_values = true)]
        value: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List meals, most recent first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show today's progress and weekly totals (default)
    Dashboard {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a chart of the last seven days
    Week {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export all data as a JSON document
    Export {
        /// File to write (default: nutriwise_export.json; `-` for stdout)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Print a formatted report of the dashboard, week and meals
    Report,
    /// Replace all data with an exported JSON document
    Import {
        /// Path to the JSON document
        file: PathBuf,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.data_dir)?;
    let mut tracker = Tracker::load(Database::open(&config.db_path)?)?;

    match cli.command {
        Some(Commands::Add {
            name,
            calories,
            category,
            date,
            json,
        }) => cmd_add(&mut tracker, &name, calories, &category, date, json),
        Some(Commands::Delete { id, json }) => cmd_delete(&mut tracker, &id, json),
        Some(Commands::Clear { yes, json }) => cmd_clear(&mut tracker, yes, json),
        Some(Commands::Goal { value, json }) => cmd_goal(&mut tracker, &value, json),
        Some(Commands::List { json }) => cmd_list(&tracker, json),
        Some(Commands::Dashboard { json }) => cmd_dashboard(&tracker, json),
        None => cmd_dashboard(&tracker, false),
        Some(Commands::Week { json }) => cmd_week(&tracker, json),
        Some(Commands::Export { output }) => cmd_export(&tracker, output.as_deref()),
        Some(Commands::Report) => cmd_report(&tracker),
        Some(Commands::Import { file, yes, json }) => cmd_import(&mut tracker, &file, yes, json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "nutriwise", "add", "Oats", "350", "--category", "breakfast",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Add {
                name,
                calories,
                category,
                date,
                json,
            }) => {
                assert_eq!(name, "Oats");
                assert_eq!(calories, 350);
                assert_eq!(category, "breakfast");
                assert!(date.is_none());
                assert!(!json);
            }
            _ => panic!("expected add command"),
        }
    }

    #[test]
    fn test_parse_goal_accepts_negative_input() {
        let cli = Cli::try_parse_from(["nutriwise", "goal", "-5"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Goal { ref value, .. }) if value == "-5"));
    }

    #[test]
    fn test_no_command_defaults_to_dashboard() {
        let cli = Cli::try_parse_from(["nutriwise"]).unwrap();
        assert!(cli.command.is_none());
    }
}
