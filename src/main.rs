//! Event Prof CLI
//!
//! Replays recorded test sessions through the event profiler and
//! prints the groups and examples that fired the most events.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use event_prof::commands::{
    display_events, display_version, execute_replay, validate_args, validate_report_file,
    ReplayArgs,
};
use event_prof::profiler::{EventRegistry, MergePolicy, RankBy};
use std::io;
use std::path::PathBuf;

/// Event Prof - rank tests by instrumented events
#[derive(Parser, Debug)]
#[command(name = "event-prof")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a recorded session and report the top offenders
    Replay {
        /// Recorded session (JSON Lines)
        #[arg(short, long)]
        trace: PathBuf,

        /// Event(s) to track, comma-separated
        #[arg(short, long, env = "EVENT_PROF")]
        event: Option<String>,

        /// Ranking criterion: count or time
        #[arg(long, value_parser = parse_rank_by)]
        rank_by: Option<RankBy>,

        /// Number of entries per ranking
        #[arg(long)]
        top: Option<usize>,

        /// Track examples individually
        #[arg(long)]
        per_example: bool,

        /// How repeated runs combine: sum or max
        #[arg(long, value_parser = parse_merge_policy)]
        merge: Option<MergePolicy>,

        /// Output path for JSON report (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Do not print the text summary
        #[arg(short, long)]
        quiet: bool,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// List supported event identifiers
    Events,

    /// Display version information
    Version,
}

fn parse_rank_by(value: &str) -> Result<RankBy, String> {
    value.parse().map_err(|e| format!("{}", e))
}

fn parse_merge_policy(value: &str) -> Result<MergePolicy, String> {
    value.parse().map_err(|e| format!("{}", e))
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Replay {
            trace,
            event,
            rank_by,
            top,
            per_example,
            merge,
            output,
            quiet,
        } => {
            let args = ReplayArgs {
                trace_path: trace,
                events: event,
                rank_by,
                top_count: top,
                per_example,
                merge_policy: merge,
                output_json: output,
                print_summary: !quiet,
            };

            // Validate args first
            validate_args(&args)?;

            execute_replay(&args, &mut stdout)?;
        }

        Commands::Validate { file } => {
            validate_report_file(&file, &mut stdout)?;
        }

        Commands::Events => {
            display_events(&EventRegistry::new(), &mut stdout)?;
        }

        Commands::Version => {
            display_version(&mut stdout)?;
        }
    }

    Ok(())
}
