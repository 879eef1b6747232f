#![deny(missing_docs)]
//! Shared logging utilities for the tenure workspace.
//!
//! This crate provides the `tenure_*` logging macros used across the codebase,
//! a destination-aware initializer for binaries and a minimal test initializer
//! for the global logger.

use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! tenure_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! tenure_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! tenure_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! tenure_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! tenure_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Where [`initialize`] sends log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDestination {
    /// Only the log file.
    File,
    /// Only stderr and stdout.
    Terminal,
    /// The terminal plus the log file.
    Both,
}

/// Installs the process-wide logger for a run of the `tenure` binary.
///
/// The log file at `log_path` is truncated on start. When it cannot be opened
/// the run goes on without it and a warning is printed to stderr. A second
/// call leaves the first logger in place.
pub fn initialize(destination: LogDestination, level: LevelFilter, log_path: &Path) {
    let config = run_config();
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if matches!(destination, LogDestination::Terminal | LogDestination::Both) {
        loggers.push(terminal_logger(level, config.clone()));
    }
    if matches!(destination, LogDestination::File | LogDestination::Both) {
        match open_log_file(log_path) {
            Some(file) => loggers.push(WriteLogger::new(level, config, file)),
            None if loggers.is_empty() => return,
            None => {}
        }
    }
    let _ = CombinedLogger::init(loggers);
}

fn run_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn terminal_logger(level: LevelFilter, config: Config) -> Box<TermLogger> {
    TermLogger::new(level, config, TerminalMode::Mixed, ColorChoice::Auto)
}

fn open_log_file(log_path: &Path) -> Option<File> {
    File::create(log_path)
        .map_err(|err| eprintln!("tenure: log file {} unavailable: {}", log_path.display(), err))
        .ok()
}

/// Terminal logging for test binaries: debug in debug builds, info otherwise.
/// Safe to call from every test.
pub fn initialize_for_tests() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = CombinedLogger::init(vec![terminal_logger(level, Config::default())]);
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn log_file_is_truncated_on_open() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tenure.log");
        std::fs::write(&path, "previous run").unwrap();

        assert!(open_log_file(&path).is_some());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn missing_log_dir_is_not_fatal() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent").join("tenure.log");

        assert!(open_log_file(&path).is_none());
        initialize(LogDestination::File, LevelFilter::Info, &path);
        tenure_info!("still running");
    }
}
