// src/logging.rs

//! Structured logging on stderr.
//!
//! `--log-level` wins. Otherwise `ASSERTGEN_LOG` is read as an `EnvFilter`
//! directive list, so a single module can be turned up
//! (`ASSERTGEN_LOG=info,assertgen::incremental=debug`). An unset or
//! unparsable variable falls back to `info`. Stdout stays reserved for the
//! dry-run plan.

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

/// Environment variable consulted when no `--log-level` is given.
pub const LOG_ENV_VAR: &str = "ASSERTGEN_LOG";

const DEFAULT_DIRECTIVE: &str = "info";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV_VAR).ok();
    let filter = log_filter(cli_level, env.as_deref());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("installing log subscriber: {e}"))
}

fn log_filter(cli_level: Option<LogLevel>, env: Option<&str>) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::new(level_directive(level));
    }
    env.filter(|s| !s.trim().is_empty())
        .and_then(|s| EnvFilter::try_new(s.trim()).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

fn level_directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Level names render upper-case.
    fn rendered(filter: EnvFilter) -> String {
        filter.to_string().to_lowercase()
    }

    #[test]
    fn cli_level_overrides_environment() {
        assert_eq!(rendered(log_filter(Some(LogLevel::Warn), Some("trace"))), "warn");
    }

    #[test]
    fn environment_accepts_module_directives() {
        let filter = rendered(log_filter(None, Some("info,assertgen::incremental=debug")));
        assert!(filter.contains("assertgen::incremental=debug"), "{filter}");
    }

    #[test]
    fn missing_or_blank_environment_is_info() {
        assert_eq!(rendered(log_filter(None, None)), "info");
        assert_eq!(rendered(log_filter(None, Some("  "))), "info");
    }
}
