// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `powertask`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "powertask",
    version,
    about = "Simulate an energy-harvesting device running an energy-gated task schedule.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the device description (TOML).
    #[arg(long, value_name = "PATH", default_value = "Powertask.toml")]
    pub config: String,

    /// Run a single sweep and exit, like one wake-up on a real device.
    #[arg(long)]
    pub once: bool,

    /// Stop after this many sweeps.
    #[arg(long, value_name = "N", conflicts_with = "once")]
    pub ticks: Option<u64>,

    /// Milliseconds between sweeps.
    #[arg(long, value_name = "MS", default_value_t = 1000)]
    pub tick_ms: u64,

    /// Override `[scheduler].state_file` from the config.
    #[arg(long, value_name = "PATH")]
    pub state_file: Option<String>,

    /// Delete the stored completion state before the first sweep.
    #[arg(long)]
    pub reset_state: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `POWERTASK_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the task registry, but don't run any sweeps.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
