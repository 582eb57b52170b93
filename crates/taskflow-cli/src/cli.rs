use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use taskflow_core::filter::{StatusTab, TaskFilter};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "taskflow",
    version,
    about = "Taskflow: tasks, categories and a calendar in the terminal",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// TOML configuration file.
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// JSON storage file.
    #[arg(long = "data", global = true)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List tasks through the filter pipeline.
    List(ListArgs),
    /// Create a task.
    Add(AddArgs),
    /// Edit a task's fields.
    Edit(EditArgs),
    /// Toggle a task's completion flag.
    Done { id: String },
    /// Toggle a task's importance flag.
    Star { id: String },
    /// Remove a task.
    Delete { id: String },
    /// Show categories with task counts.
    Categories,
    /// Print a month grid (or one week) with due-task markers.
    Calendar(CalendarArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Case-insensitive text matched against title and description.
    #[arg(long)]
    pub query: Option<String>,

    /// completed, important, today or category:<id>.
    #[arg(
        long,
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<TaskFilter>())
    )]
    pub filter: Option<TaskFilter>,

    /// Only tasks due on this day (YYYY-MM-DD).
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// all, pending or completed.
    #[arg(
        long,
        default_value = "all",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<StatusTab>())
    )]
    pub tab: StatusTab,
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    pub title: String,

    #[arg(long = "desc")]
    pub description: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    /// YYYY-MM-DD, today or tomorrow.
    #[arg(long)]
    pub due: Option<String>,

    #[arg(long)]
    pub important: bool,
}

#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    /// Task id or a unique prefix of it.
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long = "desc")]
    pub description: Option<String>,

    #[arg(long, conflicts_with = "clear_category")]
    pub category: Option<String>,

    #[arg(long)]
    pub clear_category: bool,

    #[arg(long, conflicts_with = "clear_due")]
    pub due: Option<String>,

    #[arg(long)]
    pub clear_due: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct CalendarArgs {
    /// Month to show, as YYYY-MM. Defaults to the current month.
    #[arg(long)]
    pub month: Option<String>,

    /// Show only the week containing the focus day.
    #[arg(long)]
    pub week: bool,
}

pub fn parse_month(raw: &str) -> anyhow::Result<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d")
        .map_err(|_| anyhow!("invalid month {trimmed:?}; expected YYYY-MM"))
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "off"
    } else if quiet == 1 {
        "error"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}
