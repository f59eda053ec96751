//! # Runtime Configuration Module
//!
//! Environment variable based configuration for the dispatcher.
//!
//! ## Environment Variables
//!
//! ### `BRRTR_FAULT_BACKTRACE`
//!
//! When `true` (or `1`), a backtrace is captured and logged alongside every
//! fault dump. Capturing is not free, so it is off by default.
//!
//! Default: `false`
//!
//! ### `BRRTR_SLOW_REQUEST_MS`
//!
//! Dispatch latency threshold in milliseconds. Requests slower than this are
//! logged at `warn` instead of `info`.
//!
//! Default: `250`
//!
//! ## Usage
//!
//! ```rust
//! use brrtdispatch::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("Slow request threshold: {} ms", config.slow_request_ms);
//! ```

use std::env;

/// Default value of `BRRTR_SLOW_REQUEST_MS`
pub const DEFAULT_SLOW_REQUEST_MS: u64 = 250;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Capture a backtrace when dumping a fault
    pub fault_backtrace: bool,
    /// Latency above which a dispatch is logged as slow
    pub slow_request_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            fault_backtrace: false,
            slow_request_ms: DEFAULT_SLOW_REQUEST_MS,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let fault_backtrace = lookup("BRRTR_FAULT_BACKTRACE")
            .map(|v| parse_bool(&v))
            .unwrap_or(defaults.fault_backtrace);
        let slow_request_ms = lookup("BRRTR_SLOW_REQUEST_MS")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(defaults.slow_request_ms);
        RuntimeConfig {
            fault_backtrace,
            slow_request_ms,
        }
    }
}

pub(crate) fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
