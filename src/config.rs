//! Command-line flags and the runtime settings resolved from them.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use directories::BaseDirs;

/// Storage file used when `--file` is not given, relative to the working
/// directory.
pub const DEFAULT_STORAGE_FILE: &str = "library.txt";
/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".library-catalog";
/// Log file name stored inside the application data directory.
const LOG_FILE_NAME: &str = "library-catalog.log";

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_filter_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "library-catalog",
    about = "Track books, loans and returns in a flat-file library catalog",
    version
)]
pub struct Cli {
    /// Storage file holding one book per line
    #[clap(short, long, value_name = "PATH", default_value = DEFAULT_STORAGE_FILE)]
    pub file: PathBuf,

    /// Use the line-oriented menu on stdin/stdout instead of the full-screen UI
    #[clap(long)]
    pub plain: bool,

    /// Minimum level written to the log file (RUST_LOG overrides it)
    #[clap(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Where to write logs (defaults to ~/.library-catalog/library-catalog.log)
    #[clap(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Front end selected for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frontend {
    Terminal,
    Plain,
}

/// Fully resolved settings for one process run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub storage_path: PathBuf,
    pub frontend: Frontend,
    pub log_level: LogLevel,
    /// `None` when no log location could be determined; logging is then
    /// discarded so it never interferes with the terminal.
    pub log_path: Option<PathBuf>,
}

impl Settings {
    pub fn from_cli(cli: Cli) -> Self {
        let frontend = if cli.plain {
            Frontend::Plain
        } else {
            Frontend::Terminal
        };
        Self {
            storage_path: cli.file,
            frontend,
            log_level: cli.log_level,
            log_path: cli.log_file.or_else(default_log_path),
        }
    }
}

/// Resolve the default log file inside the user's home.
fn default_log_path() -> Option<PathBuf> {
    let base_dirs = BaseDirs::new()?;
    Some(base_dirs.home_dir().join(DATA_DIR_NAME).join(LOG_FILE_NAME))
}
