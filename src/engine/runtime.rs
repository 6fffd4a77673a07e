// src/engine/runtime.rs

use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::task::block_in_place;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::scheduler::SweepReport;

use super::device::Device;
use super::RuntimeOptions;

/// Totals over every sweep a [`Runtime`] performed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub sweeps: u64,
    pub tasks_executed: u64,
    pub cycles_completed: u64,
}

impl RunSummary {
    fn record(&mut self, report: &SweepReport) {
        self.sweeps += 1;
        self.tasks_executed += report.executed.len() as u64;
        if report.cycle_reset {
            self.cycles_completed += 1;
        }
    }
}

/// Run one sweep without stalling the other workers of a multi-thread runtime.
fn tick_blocking(device: &mut Device) -> SweepReport {
    match Handle::current().runtime_flavor() {
        RuntimeFlavor::MultiThread => block_in_place(|| device.tick()),
        _ => device.tick(),
    }
}

/// Ticks a [`Device`] on a fixed interval.
///
/// This is the IO shell around `Device::tick`: it owns the timer and the
/// Ctrl-C handling, nothing else.
#[derive(Debug)]
pub struct Runtime {
    device: Device,
    options: RuntimeOptions,
}

impl Runtime {
    pub fn new(device: Device, options: RuntimeOptions) -> Self {
        Self { device, options }
    }

    /// Main loop.
    ///
    /// - Runs one sweep per interval tick (the first immediately).
    /// - Stops after `max_ticks` sweeps, or on Ctrl-C.
    ///
    /// Task commands run synchronously inside the sweep. On a multi-thread
    /// runtime the sweep is moved off the worker with `block_in_place`; on a
    /// current-thread runtime it blocks the executor, and Ctrl-C is only
    /// observed once the sweep returns.
    pub async fn run(mut self) -> Result<RunSummary> {
        info!(
            tick_ms = self.options.tick_interval.as_millis() as u64,
            max_ticks = ?self.options.max_ticks,
            "powertask runtime started"
        );

        let mut summary = RunSummary::default();
        if self.options.max_ticks == Some(0) {
            info!("max_ticks is 0; nothing to do");
            return Ok(summary);
        }

        let mut ticker = interval(self.options.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);
        let mut ctrl_c_armed = true;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let report = tick_blocking(&mut self.device);
                    debug!(?report, "sweep report");
                    summary.record(&report);

                    if let Some(max) = self.options.max_ticks {
                        if summary.sweeps >= max {
                            info!(sweeps = summary.sweeps, "reached sweep limit; stopping runtime");
                            break;
                        }
                    }
                }
                res = &mut ctrl_c, if ctrl_c_armed => {
                    match res {
                        Ok(()) => {
                            info!("shutdown requested; stopping runtime");
                            break;
                        }
                        Err(e) => {
                            warn!(error = %e, "failed to listen for Ctrl+C");
                            ctrl_c_armed = false;
                        }
                    }
                }
            }
        }

        info!(
            sweeps = summary.sweeps,
            tasks_executed = summary.tasks_executed,
            cycles_completed = summary.cycles_completed,
            "runtime exiting"
        );
        Ok(summary)
    }
}
