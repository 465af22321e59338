//! Diagnostic logging setup
//!
//! Logs go to stderr so that version numbers and changelogs on stdout stay
//! machine-readable. The level comes from the command line unless the `GIT_CCS_LOG`
//! environment variable holds a filter directive.

use crate::error::{CcsError, Result};
pub use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the command line log level
pub const LOG_ENV: &str = "GIT_CCS_LOG";

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogLevel {
    /// Show all logs (trace level)
    Trace,
    /// Show debug and above
    Debug,
    /// Show info and above
    Info,
    /// Show warnings and above (default)
    #[default]
    Warn,
    /// Show errors only
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

/// Filter from `GIT_CCS_LOG` if set, else `level` for this crate only
pub fn filter(level: LogLevel) -> Result<EnvFilter> {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| {
            let level = Level::from(level).to_string().to_lowercase();
            EnvFilter::try_new(format!("git_ccs={level}"))
        })
        .map_err(|e| CcsError::config(format!("Failed to create log filter: {e}")))
}

/// Install the global subscriber; later calls are ignored
pub fn init(level: LogLevel) -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(level)?)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_conversion() {
        assert_eq!(Level::from(LogLevel::Trace), Level::TRACE);
        assert_eq!(Level::from(LogLevel::default()), Level::WARN);
    }

    #[test]
    fn test_filter_from_level() {
        if std::env::var(LOG_ENV).is_err() {
            let filter = filter(LogLevel::Debug).unwrap();
            assert_eq!(filter.to_string(), "git_ccs=debug");
        }
    }

    #[test]
    fn test_init_twice_is_harmless() {
        assert!(init(LogLevel::Error).is_ok());
        assert!(init(LogLevel::Error).is_ok());
    }
}
