//! # Logging Utilities
//!
//! Logging infrastructure for hvdbg using `tracing`.
//!
//! The interpreter prints hex dumps and MSR tables to stdout, so log output
//! must never land there. Two modes are provided:
//!
//! - **Console** ([`init_logging`]): logs go to stderr, optionally mirrored to
//!   a daily rolling file. Useful for scripted `--execute` runs.
//! - **REPL** ([`init_logging_for_repl`]): logs go only to a dated file so the
//!   interactive prompt stays clean.
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Set log level filter (e.g., `RUST_LOG=debug`, `RUST_LOG=hvdbg_core=trace`)
//! - `HVDBG_LOG_FORMAT`: Set output format (`json` or `pretty`, default: `pretty`)
//! - `HVDBG_LOG_FILE`: Optional path to a log file mirrored in console mode
//!
//! ## Example
//!
//! ```rust,no_run
//! use hvdbg_utils::{LogFormat, LogLevel, init_logging_with_level};
//!
//! init_logging_with_level(LogLevel::Debug, LogFormat::Pretty).expect("Failed to initialize logging");
//! tracing::debug!("dispatching command");
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{env, io};

use chrono::Local;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::{self};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat
{
    /// Pretty-printed, human-readable format (default)
    Pretty,
    /// JSON format, one object per line
    Json,
}

impl FromStr for LogFormat
{
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "pretty" | "dev" | "text" => Ok(LogFormat::Pretty),
            "json" | "prod" => Ok(LogFormat::Json),
            _ => Err(LoggingError::InvalidFormat(s.to_string())),
        }
    }
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel
{
    /// Error level
    Error,
    /// Warning level (default for console mode)
    Warn,
    /// Info level
    Info,
    /// Debug level
    Debug,
    /// Trace level, includes every transport exchange
    Trace,
}

impl From<LogLevel> for Level
{
    fn from(level: LogLevel) -> Self
    {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

impl FromStr for LogLevel
{
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "error" | "err" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(LoggingError::InvalidLevel(s.to_string())),
        }
    }
}

/// Keeps the background log writer alive
///
/// Dropping the guard flushes and stops the non-blocking file writer, so the
/// binary holds on to it for the lifetime of the session.
#[derive(Debug, Default)]
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard
{
    _file: Option<WorkerGuard>,
}

/// Initialize console logging from the environment
///
/// Reads `RUST_LOG`, `HVDBG_LOG_FORMAT` and `HVDBG_LOG_FILE`. Console output
/// always goes to stderr.
///
/// ## Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging() -> Result<LoggingGuard, LoggingError>
{
    let format = env::var("HVDBG_LOG_FORMAT")
        .ok()
        .and_then(|s| LogFormat::from_str(&s).ok())
        .unwrap_or(LogFormat::Pretty);

    let default_level = env::var("RUST_LOG")
        .ok()
        .and_then(|s| s.parse::<LogLevel>().ok())
        .map_or(Level::WARN, Into::into);

    init_console(format, default_level)
}

/// Initialize console logging with an explicit level and format
///
/// ## Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging_with_level(level: LogLevel, format: LogFormat) -> Result<LoggingGuard, LoggingError>
{
    init_console(format, level.into())
}

/// Initialize file-only logging for the interactive prompt
///
/// The log file lives at `~/.hvdbg/YYYY-MM-DD-hvdbg.log`, or under `/tmp`
/// when no home directory is available. Returns the path together with the
/// writer guard.
///
/// ## Errors
///
/// Returns an error if the log directory cannot be created or a global
/// subscriber is already installed.
pub fn init_logging_for_repl(level: Option<LogLevel>) -> Result<(PathBuf, LoggingGuard), LoggingError>
{
    let today = Local::now().format("%Y-%m-%d");
    let log_file = if let Ok(home) = env::var("HOME") {
        let dir = PathBuf::from(home).join(".hvdbg");
        std::fs::create_dir_all(&dir)?;
        dir.join(format!("{today}-hvdbg.log"))
    } else {
        PathBuf::from("/tmp").join(format!("{today}-hvdbg.log"))
    };

    // An explicit --log-level wins over RUST_LOG
    let env_filter = match level {
        Some(level) => EnvFilter::new(Level::from(level).to_string()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string())),
    };

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(
        parent_dir(&log_file),
        log_file.file_name().unwrap_or_default(),
    ));

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_timer(ChronoUtc::rfc_3339())
        .with_ansi(false)
        .with_filter(env_filter);

    Registry::default()
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggingError::InitializationFailed(e.to_string()))?;

    Ok((log_file, LoggingGuard { _file: Some(guard) }))
}

fn parent_dir(path: &Path) -> &Path
{
    path.parent().unwrap_or_else(|| Path::new("."))
}

fn init_console(format: LogFormat, default_level: Level) -> Result<LoggingGuard, LoggingError>
{
    // RUST_LOG can override the default level with more specific filters
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));
    let log_file = env::var("HVDBG_LOG_FILE").ok().map(PathBuf::from);

    let console_layer = match format {
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(true)
            .with_writer(io::stderr)
            .with_filter(env_filter.clone())
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_current_span(true)
            .with_writer(io::stderr)
            .with_filter(env_filter.clone())
            .boxed(),
    };

    let mut guard = LoggingGuard::default();
    let file_layer = log_file.map(|path| {
        let appender =
            tracing_appender::rolling::daily(parent_dir(&path), path.file_name().unwrap_or_default());
        let (writer, file_guard) = tracing_appender::non_blocking(appender);
        guard._file = Some(file_guard);
        fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(false) // No ANSI in files
            .with_filter(env_filter)
    });

    Registry::default()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggingError::InitializationFailed(e.to_string()))?;

    Ok(guard)
}

/// Logging initialization error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError
{
    /// Invalid log format
    #[error("Unknown log format: {0}. Use 'pretty' or 'json'")]
    InvalidFormat(String),

    /// Invalid log level
    #[error("Unknown log level: {0}. Use 'error', 'warn', 'info', 'debug', or 'trace'")]
    InvalidLevel(String),

    /// Failed to install the global subscriber
    #[error("Failed to initialize logging: {0}")]
    InitializationFailed(String),

    /// File logging error
    #[error("File logging error: {0}")]
    FileError(#[from] io::Error),
}
