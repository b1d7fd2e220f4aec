//! `nextdate` CLI -- compute next due dates for recurring tasks from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Next occurrence after a reference day (defaults to today, UTC)
//! nextdate next --date 20240301 --repeat "d 5" --now 20240310
//!
//! # Validate a rule and print its canonical form (or JSON)
//! nextdate check --repeat "w 5,1,3"
//! nextdate check --repeat "m -1 2,8" --json
//!
//! # Date a new or edited task would be stored with
//! nextdate schedule --date 20240101 --repeat "m 15"
//!
//! # Mark a task done: prints the new date, or "remove" for one-off tasks
//! nextdate complete --date 20240610 --repeat "y"
//!
//! # Override search caps from a JSON file
//! nextdate --limits limits.json next --date 20240101 --repeat "w 7"
//! ```
//!
//! Exit status is 0 on success, 2 for a bad date or rule, and 1 for anything else
//! (search cap hit, unreadable limits file).

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use recurrence_engine::{
    complete_task, next_occurrence, parse_rule, resolve_task_date, CalendarDate, Completion,
    RecurrenceError, SearchLimits,
};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "nextdate",
    version,
    about = "Next due date calculator for recurring tasks"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file overriding the search iteration caps
    #[arg(long, global = true, env = "NEXTDATE_LIMITS")]
    limits: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the first occurrence strictly after the reference day
    Next {
        /// Task start date (YYYYMMDD)
        #[arg(long)]
        date: String,
        /// Repeat rule, e.g. "d 7", "w 1,3,5", "m -1", "y"
        #[arg(long)]
        repeat: String,
        #[command(flatten)]
        now: NowArg,
    },
    /// Validate a repeat rule and print its canonical form
    Check {
        /// Repeat rule to validate
        #[arg(long)]
        repeat: String,
        /// Print the parsed rule as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the date a created or edited task would be stored with
    Schedule {
        /// Requested date (YYYYMMDD); empty or omitted means today
        #[arg(long)]
        date: Option<String>,
        /// Repeat rule; empty or omitted means a one-off task
        #[arg(long)]
        repeat: Option<String>,
        #[command(flatten)]
        now: NowArg,
    },
    /// Print the rescheduled date of a completed task, or "remove"
    Complete {
        /// Stored task date (YYYYMMDD)
        #[arg(long)]
        date: String,
        /// Repeat rule; empty or omitted means a one-off task
        #[arg(long)]
        repeat: Option<String>,
        #[command(flatten)]
        now: NowArg,
    },
}

#[derive(Args)]
struct NowArg {
    /// Reference day (YYYYMMDD); defaults to today in UTC
    #[arg(long, env = "NEXTDATE_NOW")]
    now: Option<String>,
}

impl NowArg {
    fn resolve(&self) -> Result<CalendarDate> {
        match self.now.as_deref() {
            Some(raw) => CalendarDate::parse(raw).context("Invalid --now date"),
            None => Ok(CalendarDate::today()),
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {:#}", err);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<String> {
    let limits = load_limits(cli.limits.as_deref())?;

    match cli.command {
        Commands::Next { date, repeat, now } => {
            let start = CalendarDate::parse(&date).context("Invalid --date")?;
            let rule = parse_rule(&repeat).context("Invalid --repeat")?;
            let reference = now.resolve()?;
            let next = next_occurrence(start, &rule, reference, &limits)
                .context("Failed to compute next date")?;
            Ok(next.to_string())
        }
        Commands::Check { repeat, json } => {
            let rule = parse_rule(&repeat).context("Invalid --repeat")?;
            if json {
                Ok(serde_json::to_string(&rule)?)
            } else {
                Ok(rule.to_string())
            }
        }
        Commands::Schedule { date, repeat, now } => {
            let today = now.resolve()?;
            let stored = resolve_task_date(date.as_deref(), repeat.as_deref(), today, &limits)
                .context("Failed to resolve task date")?;
            Ok(stored.to_string())
        }
        Commands::Complete { date, repeat, now } => {
            let today = now.resolve()?;
            let outcome = complete_task(&date, repeat.as_deref(), today, &limits)
                .context("Failed to complete task")?;
            Ok(match outcome {
                Completion::Reschedule(next) => next.to_string(),
                Completion::Remove => "remove".to_string(),
            })
        }
    }
}

fn load_limits(path: Option<&str>) -> Result<SearchLimits> {
    let Some(path) = path else {
        return Ok(SearchLimits::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read limits file: {}", path))?;
    let limits = SearchLimits::from_json(&raw)
        .with_context(|| format!("Failed to load limits file: {}", path))?;
    info!(path, ?limits, "loaded search limits");
    Ok(limits)
}

/// Bad input exits with 2; search caps, config and I/O failures exit with 1.
fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    let client_error = err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<RecurrenceError>())
        .any(RecurrenceError::is_client_error);
    if client_error {
        ExitCode::from(2)
    } else {
        ExitCode::FAILURE
    }
}
