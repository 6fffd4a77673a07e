// src/logging.rs

//! `tracing` subscriber setup for the `powertask` binary.
//!
//! The level comes from `--log-level`, then `POWERTASK_LOG`, then `info`.
//! `POWERTASK_LOG=off` silences the simulator entirely. Output goes to
//! stderr; stdout belongs to task commands.

use std::str::FromStr;

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

/// Environment variable consulted when no `--log-level` is given.
pub const LOG_ENV_VAR: &str = "POWERTASK_LOG";

/// Install the global fmt subscriber. Call once, before the first sweep.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_value = std::env::var(LOG_ENV_VAR).ok();
    let filter = resolve_level(cli_level, env_value.as_deref());

    fmt()
        .with_max_level(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Effective filter for a CLI flag and a raw `POWERTASK_LOG` value.
///
/// Unparseable env values fall back to `info` rather than failing startup.
pub fn resolve_level(cli_level: Option<LogLevel>, env_value: Option<&str>) -> LevelFilter {
    if let Some(level) = cli_level {
        return level.into();
    }
    env_value
        .and_then(|raw| LevelFilter::from_str(raw.trim()).ok())
        .unwrap_or(LevelFilter::INFO)
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}
