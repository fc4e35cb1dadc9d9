//! logging
//!
//! Per-run `tracing` subscriber writing plain lines to the error stream.
//!
//! The subscriber is installed with [`tracing::subscriber::with_default`]
//! for the duration of one run, so runs in the same process (tests) never
//! share a log destination.

use std::fmt;
use std::io::Write;
use std::str::FromStr;
use std::sync::Mutex;

use tracing::level_filters::LevelFilter;
use tracing::Subscriber;

/// Threshold selected by `--stderr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Off,
    #[default]
    Err,
    Info,
    Debug,
}

/// Accepted `--stderr` values.
pub const LOG_LEVELS: &[&str] = &["off", "err", "info", "debug"];

impl LogLevel {
    pub fn filter(self) -> LevelFilter {
        match self {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Err => LevelFilter::ERROR,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Ok(LogLevel::Off),
            "err" => Ok(LogLevel::Err),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Off => "off",
            LogLevel::Err => "err",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

/// A subscriber printing bare messages at or above `level` to `writer`.
pub fn subscriber(
    level: LogLevel,
    writer: Box<dyn Write + Send>,
) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(writer))
        .with_max_level(level.filter())
        .with_ansi(false)
        .without_time()
        .with_level(false)
        .with_target(false)
        .finish()
}
