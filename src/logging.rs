//! Structured logging setup
//!
//! Installs a `tracing` subscriber with an `EnvFilter` and a JSON or pretty
//! fmt layer writing to stderr, so command output on stdout stays clean.
//! Optionally the writer is made non-blocking through `tracing-appender`.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `BRRTR_LOG_LEVEL` | `info` | trace/debug/info/warn/error |
//! | `BRRTR_LOG_FORMAT` | `json` | `json` or `pretty` |
//! | `BRRTR_LOG_ASYNC` | `false` | buffered non-blocking writer |
//! | `BRRTR_LOG_TARGET_FILTER` | unset | extra comma-separated directives |
//! | `BRRTR_LOG_INCLUDE_LOCATION` | `false` | add file and line to events |
//!
//! `RUST_LOG`, when set, takes precedence over `BRRTR_LOG_LEVEL`.

use anyhow::{Context, Result};
use std::env;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::runtime_config::parse_bool;

/// Log format: JSON for production, pretty-print for development
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Log level: trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    /// Buffered non-blocking output
    pub async_logging: bool,
    /// Extra filter directives (comma-separated)
    pub target_filter: Option<String>,
    /// Include file:line location
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Json,
            async_logging: false,
            target_filter: None,
            include_location: false,
        }
    }
}

impl LogConfig {
    /// Parse configuration from environment variables with defaults
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            log_level: lookup("BRRTR_LOG_LEVEL").unwrap_or(defaults.log_level),
            format: lookup("BRRTR_LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or(defaults.format),
            async_logging: lookup("BRRTR_LOG_ASYNC")
                .map(|v| parse_bool(&v))
                .unwrap_or(defaults.async_logging),
            target_filter: lookup("BRRTR_LOG_TARGET_FILTER").filter(|v| !v.trim().is_empty()),
            include_location: lookup("BRRTR_LOG_INCLUDE_LOCATION")
                .map(|v| parse_bool(&v))
                .unwrap_or(defaults.include_location),
        }
    }

    /// Verbose pretty output for local runs
    #[must_use]
    pub fn default_dev() -> Self {
        Self {
            log_level: "debug".to_string(),
            format: LogFormat::Pretty,
            include_location: true,
            ..Self::default()
        }
    }

    fn level(&self) -> Level {
        match self.log_level.trim().to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    fn env_filter(&self) -> EnvFilter {
        let mut env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level().as_str()));

        if let Some(target_filter) = &self.target_filter {
            for filter in target_filter.split(',').map(str::trim).filter(|f| !f.is_empty()) {
                match filter.parse() {
                    Ok(directive) => env_filter = env_filter.add_directive(directive),
                    Err(_) => eprintln!("Warning: Invalid log filter directive: {filter}"),
                }
            }
        }
        env_filter
    }
}

/// Keeps the non-blocking writer flushing; drop it at shutdown.
#[derive(Debug)]
#[must_use = "dropping the guard stops buffered log output"]
pub struct LoggingGuard {
    _worker: Option<WorkerGuard>,
}

/// Initialize logging from the environment.
///
/// # Errors
///
/// Fails when a global subscriber is already installed.
pub fn init_logging() -> Result<LoggingGuard> {
    init_logging_with_config(&LogConfig::from_env())
}

/// Initialize logging with an explicit configuration.
///
/// ```no_run
/// use brrtdispatch::logging::{init_logging_with_config, LogConfig};
///
/// let _guard = init_logging_with_config(&LogConfig::default_dev())
///     .expect("Failed to initialize logging");
/// ```
///
/// # Errors
///
/// Fails when a global subscriber is already installed.
pub fn init_logging_with_config(config: &LogConfig) -> Result<LoggingGuard> {
    let (writer, worker) = if config.async_logging {
        let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
        (BoxMakeWriter::new(writer), Some(guard))
    } else {
        (BoxMakeWriter::new(std::io::stderr), None)
    };

    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_thread_ids(true)
            .with_span_list(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(writer)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(LoggingGuard { _worker: worker })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> LogConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        LogConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("PRETTY"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("unknown"), LogFormat::Json);
    }

    #[test]
    fn test_log_config_from_env_with_defaults() {
        assert_eq!(config(&[]), LogConfig::default());
    }

    #[test]
    fn test_log_config_overrides() {
        let cfg = config(&[
            ("BRRTR_LOG_LEVEL", "debug"),
            ("BRRTR_LOG_FORMAT", "pretty"),
            ("BRRTR_LOG_ASYNC", "true"),
            ("BRRTR_LOG_TARGET_FILTER", "brrtdispatch::router=trace"),
            ("BRRTR_LOG_INCLUDE_LOCATION", "1"),
        ]);
        assert_eq!(cfg.level(), Level::DEBUG);
        assert_eq!(cfg.format, LogFormat::Pretty);
        assert!(cfg.async_logging);
        assert_eq!(cfg.target_filter.as_deref(), Some("brrtdispatch::router=trace"));
        assert!(cfg.include_location);
    }

    #[test]
    fn test_unknown_level_defaults_to_info() {
        let cfg = config(&[("BRRTR_LOG_LEVEL", "chatty")]);
        assert_eq!(cfg.level(), Level::INFO);
    }

    #[test]
    fn test_default_dev() {
        let cfg = LogConfig::default_dev();
        assert_eq!(cfg.format, LogFormat::Pretty);
        assert!(cfg.include_location);
        assert!(!cfg.async_logging);
    }
}
