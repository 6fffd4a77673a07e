// src/config/model.rs

use serde::Deserialize;

use crate::storage::file::STATE_FILE_PATH;
use crate::storage::record::DEFAULT_MAX_PERSISTED_TASKS;
use crate::types::Joules;

/// Device description as read from a TOML file, before validation.
///
/// ```toml
/// [scheduler]
/// capacity = 4
/// state_file = ".powertask/state"
///
/// [energy]
/// capacitance_uf = 470000
/// voltage_trace_mv = [3300, 2900, 2100]
///
/// [[task]]
/// name = "sample"
/// required_energy = 0.5
/// cmd = "echo sampling"
///
/// [[task]]
/// name = "transmit"
/// required_energy = 1.2
/// after = "sample"
/// ```
///
/// Tasks are registered in file order, which is also execution order.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub scheduler: SchedulerSection,

    #[serde(default)]
    pub energy: EnergySection,

    /// All `[[task]]` entries, in file order.
    #[serde(default)]
    pub task: Vec<TaskConfig>,
}

/// A validated device description.
///
/// Only obtainable through `ConfigFile::try_from(RawConfigFile)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub scheduler: SchedulerSection,
    pub energy: EnergySection,
    pub task: Vec<TaskConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        scheduler: SchedulerSection,
        energy: EnergySection,
        task: Vec<TaskConfig>,
    ) -> Self {
        Self {
            scheduler,
            energy,
            task,
        }
    }

    /// Registry capacity: the configured value, or exactly the task count.
    pub fn capacity(&self) -> usize {
        self.scheduler.effective_capacity(self.task.len())
    }

    /// Position of the named task in file (= registration) order.
    pub fn task_index(&self, name: &str) -> Option<usize> {
        self.task.iter().position(|t| t.name == name)
    }
}

/// `[scheduler]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerSection {
    /// Maximum number of registered tasks. Defaults to the number of
    /// `[[task]]` entries.
    #[serde(default)]
    pub capacity: Option<usize>,

    /// Largest registry whose completion state is persisted.
    #[serde(default = "default_max_persisted_tasks")]
    pub max_persisted_tasks: usize,

    /// Where the completion record is stored between runs.
    #[serde(default = "default_state_file")]
    pub state_file: String,
}

fn default_max_persisted_tasks() -> usize {
    DEFAULT_MAX_PERSISTED_TASKS
}

fn default_state_file() -> String {
    STATE_FILE_PATH.to_string()
}

impl SchedulerSection {
    pub fn effective_capacity(&self, task_count: usize) -> usize {
        self.capacity.unwrap_or(task_count)
    }
}

impl Default for SchedulerSection {
    fn default() -> Self {
        Self {
            capacity: None,
            max_persisted_tasks: default_max_persisted_tasks(),
            state_file: default_state_file(),
        }
    }
}

/// `[energy]` section: the simulated storage capacitor.
#[derive(Debug, Clone, Deserialize)]
pub struct EnergySection {
    /// Storage capacitance in microfarads.
    #[serde(default = "default_capacitance_uf")]
    pub capacitance_uf: u32,

    /// Capacitor voltage readings in millivolts, replayed in a loop; one
    /// reading is consumed per energy query.
    #[serde(default = "default_voltage_trace_mv")]
    pub voltage_trace_mv: Vec<u32>,
}

fn default_capacitance_uf() -> u32 {
    470_000
}

fn default_voltage_trace_mv() -> Vec<u32> {
    vec![3300]
}

impl Default for EnergySection {
    fn default() -> Self {
        Self {
            capacitance_uf: default_capacitance_uf(),
            voltage_trace_mv: default_voltage_trace_mv(),
        }
    }
}

/// One `[[task]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    /// Unique task name.
    pub name: String,

    /// Energy (joules) that must be strictly exceeded before the task runs.
    pub required_energy: Joules,

    /// Shell command to run as the task's action. Without one the task
    /// completes as soon as it is eligible.
    #[serde(default)]
    pub cmd: Option<String>,

    /// Name of a task whose completion this task waits for.
    #[serde(default)]
    pub after: Option<String>,
}
