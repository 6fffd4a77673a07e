// src/engine/device.rs

use std::fmt;

use tracing::debug;

use crate::config::ConfigFile;
use crate::energy::{CapacitorSource, VoltageTrace};
use crate::errors::{PowertaskError, Result};
use crate::exec::CommandAction;
use crate::scheduler::{Registration, Scheduler, SchedulerConfig, SweepReport};
use crate::storage::StateStore;
use crate::task::Task;
use crate::types::TaskId;

/// A simulated device: one scheduler with its energy source and store.
pub struct Device {
    scheduler: Scheduler,
    energy: CapacitorSource<VoltageTrace>,
    store: Box<dyn StateStore>,
    sweeps: u64,
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("scheduler", &self.scheduler)
            .field("energy", &self.energy)
            .field("sweeps", &self.sweeps)
            .finish_non_exhaustive()
    }
}

impl Device {
    pub fn new(
        scheduler: Scheduler,
        energy: CapacitorSource<VoltageTrace>,
        store: Box<dyn StateStore>,
    ) -> Self {
        Self {
            scheduler,
            energy,
            store,
            sweeps: 0,
        }
    }

    /// Build a device from a validated config, registering tasks in file
    /// order. Tasks with a `cmd` get a [`CommandAction`]; `after` becomes a
    /// wait on the named task's completion flag.
    pub fn from_config(cfg: &ConfigFile, store: Box<dyn StateStore>) -> Result<Self> {
        let scheduler_cfg = SchedulerConfig::new(cfg.capacity())
            .max_persisted_tasks(cfg.scheduler.max_persisted_tasks);
        let mut scheduler = Scheduler::with_config(scheduler_cfg);

        for tc in cfg.task.iter() {
            let mut task = Task::new(tc.required_energy).named(tc.name.clone());

            if let Some(cmd) = tc.cmd.as_deref() {
                task = task.action(CommandAction::new(tc.name.clone(), cmd));
            }

            if let Some(dep) = tc.after.as_deref() {
                let index = cfg
                    .task_index(dep)
                    .ok_or_else(|| PowertaskError::TaskNotFound(dep.to_string()))?;
                task = task.wait_for(TaskId::new(index));
            }

            match scheduler.register(task) {
                Registration::Registered(_) => {}
                Registration::Rejected { capacity } => {
                    return Err(PowertaskError::ConfigError(format!(
                        "task '{}' does not fit in a scheduler of capacity {}",
                        tc.name, capacity
                    )));
                }
                Registration::InvalidEnergy => {
                    return Err(PowertaskError::ConfigError(format!(
                        "task '{}' has an invalid required_energy {}",
                        tc.name, tc.required_energy
                    )));
                }
            }
        }

        let trace = VoltageTrace::new(cfg.energy.voltage_trace_mv.clone());
        let energy = CapacitorSource::new(cfg.energy.capacitance_uf, Some(trace));

        debug!(
            tasks = scheduler.len(),
            capacity = scheduler.capacity(),
            "device built from config"
        );
        Ok(Self::new(scheduler, energy, store))
    }

    /// Run one sweep, as a device would on each wake-up.
    pub fn tick(&mut self) -> SweepReport {
        self.sweeps += 1;
        debug!(sweep = self.sweeps, "device tick");
        self.scheduler.run(&mut self.energy, self.store.as_mut())
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn sweeps(&self) -> u64 {
        self.sweeps
    }

    /// Give back the store, e.g. to hand it to a freshly booted device.
    pub fn into_store(self) -> Box<dyn StateStore> {
        self.store
    }
}
