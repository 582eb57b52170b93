pub mod cli;
pub mod commands;
pub mod file_store;
pub mod render;

use std::ffi::OsString;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use chrono::Utc;
use clap::Parser;
use taskflow_core::config::TaskflowConfig;
use taskflow_core::dashboard::Dashboard;
use tracing::{debug, info};

use crate::cli::{Cli, Command, ListArgs};
use crate::file_store::FileStore;
use crate::render::Renderer;

#[tracing::instrument(skip_all)]
pub fn run(raw_args: Vec<OsString>) -> anyhow::Result<()> {
    let cli = Cli::parse_from(raw_args);
    cli::init_tracing(cli.verbose, cli.quiet)?;

    let config = load_config(cli.config.as_deref())?;
    let data_path = resolve_data_path(cli.data.as_deref())?;
    let backend = FileStore::open(&data_path)?;
    let now = Utc::now();
    let mut dash = Dashboard::from_config(backend, &config, now);
    info!(
        data = %dash.store().backend().path().display(),
        tasks = dash.tasks().len(),
        "starting taskflow"
    );

    let color = io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
    let renderer = Renderer::new(color);
    let command = cli.command.unwrap_or_else(|| Command::List(ListArgs::default()));
    debug!(command = ?command, "dispatching command");

    let mut out = io::stdout().lock();
    commands::dispatch(&mut dash, &renderer, command, now, &mut out)?;
    out.flush()?;
    Ok(())
}

/// `--config` must exist; the default location is optional.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<TaskflowConfig> {
    if let Some(path) = explicit {
        return TaskflowConfig::load_file(path);
    }

    match dirs::config_dir().map(|dir| dir.join("taskflow").join("taskflow.toml")) {
        Some(path) if path.exists() => TaskflowConfig::load_file(&path),
        _ => {
            debug!("no taskflow config found; using defaults");
            Ok(TaskflowConfig::default())
        }
    }
}

pub fn resolve_data_path(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    dirs::data_dir()
        .map(|dir| dir.join("taskflow").join("storage.json"))
        .ok_or_else(|| anyhow!("could not determine a data directory"))
        .context("pass --data <FILE> to choose where tasks are stored")
}
