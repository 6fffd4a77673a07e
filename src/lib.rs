// src/lib.rs

//! Energy-budgeted cooperative task scheduler for intermittently-powered
//! devices.
//!
//! A [`Scheduler`](scheduler::Scheduler) holds a fixed-capacity, ordered list
//! of [`Task`](task::Task)s. Each call to `run` performs one sweep: completion
//! flags are restored from a [`StateStore`](storage::StateStore), every
//! incomplete task whose cost is strictly below the currently available
//! energy and whose condition holds is executed, and the flags are written
//! back so that a sweep cut short by power loss resumes where it stopped.
//!
//! The `powertask` binary wraps the library in a host simulator driven by a
//! TOML device description.

pub mod cli;
pub mod config;
pub mod energy;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod scheduler;
pub mod storage;
pub mod task;
pub mod types;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::ConfigFile;
use crate::engine::{Device, Runtime, RuntimeOptions};
use crate::storage::FileStore;

/// Run the host simulator for parsed CLI arguments.
///
/// Loads and validates the device description, opens the state file (so a
/// restarted process resumes like a rebooted device), then ticks the device
/// until the sweep limit or Ctrl-C.
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let state_file = args
        .state_file
        .clone()
        .unwrap_or_else(|| cfg.scheduler.state_file.clone());
    let mut store = FileStore::new(&state_file);

    if args.reset_state {
        store.clear()?;
        info!(path = ?store.path(), "starting from a clean completion state");
    }

    let device = Device::from_config(&cfg, Box::new(store))?;

    let options = RuntimeOptions {
        tick_interval: Duration::from_millis(args.tick_ms),
        max_ticks: if args.once { Some(1) } else { args.ticks },
    };

    let summary = Runtime::new(device, options).run().await?;
    debug!(?summary, "run complete");
    Ok(())
}

/// Simple dry-run output: print the registry in execution order.
fn print_dry_run(cfg: &ConfigFile) {
    println!("powertask dry-run");
    println!("  scheduler.capacity = {}", cfg.capacity());
    println!(
        "  scheduler.max_persisted_tasks = {}",
        cfg.scheduler.max_persisted_tasks
    );
    println!("  scheduler.state_file = {}", cfg.scheduler.state_file);
    println!("  energy.capacitance_uf = {}", cfg.energy.capacitance_uf);
    println!("  energy.voltage_trace_mv = {:?}", cfg.energy.voltage_trace_mv);
    println!();

    println!("tasks ({}):", cfg.task.len());
    for (index, task) in cfg.task.iter().enumerate() {
        println!("  {index}. {}", task.name);
        println!("      required_energy: {}", task.required_energy);
        match task.cmd {
            Some(ref cmd) => println!("      cmd: {cmd}"),
            None => println!("      cmd: (none, completes when eligible)"),
        }
        if let Some(ref after) = task.after {
            println!("      after: {after}");
        }
    }

    debug!("dry-run complete (no sweeps)");
}
