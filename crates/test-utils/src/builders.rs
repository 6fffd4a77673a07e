#![allow(dead_code)]

use powertask::config::{
    ConfigFile, EnergySection, RawConfigFile, SchedulerSection, TaskConfig,
};
use powertask::types::Joules;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                scheduler: SchedulerSection::default(),
                energy: EnergySection::default(),
                task: Vec::new(),
            },
        }
    }

    pub fn with_task(mut self, task: TaskConfig) -> Self {
        self.config.task.push(task);
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.config.scheduler.capacity = Some(capacity);
        self
    }

    pub fn with_max_persisted_tasks(mut self, max: usize) -> Self {
        self.config.scheduler.max_persisted_tasks = max;
        self
    }

    pub fn with_capacitance_uf(mut self, capacitance_uf: u32) -> Self {
        self.config.energy.capacitance_uf = capacitance_uf;
        self
    }

    pub fn with_voltage_trace(mut self, readings_mv: &[u32]) -> Self {
        self.config.energy.voltage_trace_mv = readings_mv.to_vec();
        self
    }

    /// The unvalidated config, for tests that expect validation to fail.
    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TaskConfig`.
pub struct TaskConfigBuilder {
    task: TaskConfig,
}

impl TaskConfigBuilder {
    pub fn new(name: &str, required_energy: f64) -> Self {
        Self {
            task: TaskConfig {
                name: name.to_string(),
                required_energy: Joules(required_energy),
                cmd: None,
                after: None,
            },
        }
    }

    pub fn cmd(mut self, cmd: &str) -> Self {
        self.task.cmd = Some(cmd.to_string());
        self
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.task.after = Some(dep.to_string());
        self
    }

    pub fn build(self) -> TaskConfig {
        self.task
    }
}
