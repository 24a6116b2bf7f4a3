//! Log output for the command line tool
//!
//! The library only talks to the `log` facade. This module provides the
//! stderr logger the binary installs.

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Verbosity levels, from silent to everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Nothing = 0,
    Error = 1,
    Warning = 2,
    Info = 3,
    Debug = 4,
    All = 5,
}

impl LogLevel {
    /// Level for a verbosity count (`-v` given `count` times) on top of
    /// the default of warnings.
    pub fn from_verbosity(count: u8) -> Self {
        match count {
            0 => LogLevel::Warning,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::All,
        }
    }

    pub fn to_filter(self) -> LevelFilter {
        match self {
            LogLevel::Nothing => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warning => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::All => LevelFilter::Trace,
        }
    }
}

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

/// Install the stderr logger. Fails if a logger is already installed, in
/// which case only the level is updated.
pub fn init(level: LogLevel) -> Result<(), SetLoggerError> {
    log::set_max_level(level.to_filter());
    log::set_logger(&LOGGER)
}
