//! Binary entry point: parse flags, route logs to a file so they never land
//! on the terminal, open the catalog and hand it to the chosen front end.
use std::fs::{self, OpenOptions};
use std::io;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use library_catalog::config::{Cli, Frontend, Settings};
use library_catalog::{run_app, run_console, App, Catalog};

fn main() -> Result<()> {
    let settings = Settings::from_cli(Cli::parse());
    initialize_tracing(&settings)?;

    let mut catalog = Catalog::open(&settings.storage_path).with_context(|| {
        format!(
            "failed to open catalog at {}",
            settings.storage_path.display()
        )
    })?;
    info!(
        path = %settings.storage_path.display(),
        books = catalog.len(),
        frontend = ?settings.frontend,
        "starting"
    );

    match settings.frontend {
        Frontend::Plain => {
            let stdin = io::stdin();
            run_console(&mut catalog, stdin.lock(), io::stdout().lock())
        }
        Frontend::Terminal => {
            let mut app = App::new(catalog);
            run_app(&mut app)
        }
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `--log-level` when set.
fn initialize_tracing(settings: &Settings) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level.to_filter_directive()));

    let Some(log_path) = &settings.log_path else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::sink)
            .init();
        return Ok(());
    };

    if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("failed to create log directory")?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
