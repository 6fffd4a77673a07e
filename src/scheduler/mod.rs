// src/scheduler/mod.rs

//! Task registry and sweep engine.
//!
//! - [`Scheduler`] owns an ordered, fixed-capacity list of [`Task`]s.
//! - [`sweep`] holds the per-invocation algorithm: restore, evaluate in
//!   order, execute eligible tasks, reset on full completion, persist.
//! - [`state_manager`] restores and persists completion flags.
//! - [`report`] defines the result types a sweep returns.

pub mod report;
pub mod state_manager;
pub mod sweep;

use tracing::{debug, warn};

use crate::energy::EnergySource;
use crate::storage::record::DEFAULT_MAX_PERSISTED_TASKS;
use crate::storage::StateStore;
use crate::task::Task;
use crate::types::TaskId;

pub use report::{
    AbortReason, PersistStatus, Registration, RestoreStatus, SkipReason, SweepReport,
    SweepStatus,
};
pub use state_manager::StateManager;

/// Construction-time limits for a [`Scheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Maximum number of tasks the registry accepts.
    pub capacity: usize,
    /// Largest registry whose state is written to the store.
    pub max_persisted_tasks: usize,
}

impl SchedulerConfig {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            max_persisted_tasks: DEFAULT_MAX_PERSISTED_TASKS,
        }
    }

    pub fn max_persisted_tasks(mut self, max: usize) -> Self {
        self.max_persisted_tasks = max;
        self
    }
}

/// Ordered, fixed-capacity registry of tasks.
///
/// Registration order is execution order and persisted-record order.
#[derive(Debug)]
pub struct Scheduler {
    tasks: Vec<Task>,
    capacity: usize,
    max_persisted_tasks: usize,
}

impl Scheduler {
    /// A scheduler holding at most `capacity` tasks, using the default
    /// record limit.
    pub fn new(capacity: usize) -> Self {
        Self::with_config(SchedulerConfig::new(capacity))
    }

    pub fn with_config(cfg: SchedulerConfig) -> Self {
        Self {
            tasks: Vec::with_capacity(cfg.capacity),
            capacity: cfg.capacity,
            max_persisted_tasks: cfg.max_persisted_tasks,
        }
    }

    /// Append `task` if there is room.
    ///
    /// A full registry leaves everything unchanged and reports
    /// [`Registration::Rejected`]; the call never panics or errors.
    /// A cost that is negative or not finite is refused with
    /// [`Registration::InvalidEnergy`], so no reading can ever pay for it.
    ///
    /// The scheduler takes ownership of `task`. Registering "the same task"
    /// twice therefore means registering two equal `Task` values: they get
    /// two ids and two independent completion flags, never a shared one.
    pub fn register(&mut self, task: Task) -> Registration {
        if !task.required_energy().is_valid_cost() {
            warn!(
                task = %task.name(),
                required_energy = task.required_energy().value(),
                "task cost must be finite and non-negative; task not registered"
            );
            return Registration::InvalidEnergy;
        }

        if self.is_full() {
            warn!(
                task = %task.name(),
                capacity = self.capacity,
                "scheduler full; task not registered"
            );
            return Registration::Rejected {
                capacity: self.capacity,
            };
        }

        let id = TaskId::new(self.tasks.len());
        debug!(
            task = %task.name(),
            id = %id,
            required_energy = task.required_energy().value(),
            "registered task"
        );
        self.tasks.push(task);
        Registration::Registered(id)
    }

    /// Run one sweep. See [`sweep`] for the algorithm.
    pub fn run(
        &mut self,
        energy: &mut dyn EnergySource,
        store: &mut dyn StateStore,
    ) -> SweepReport {
        self.sweep(energy, store)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.tasks.len() >= self.capacity
    }

    pub fn max_persisted_tasks(&self) -> usize {
        self.max_persisted_tasks
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(id.index())
    }

    pub fn tasks(&self) -> impl Iterator<Item = (TaskId, &Task)> {
        self.tasks
            .iter()
            .enumerate()
            .map(|(index, task)| (TaskId::new(index), task))
    }

    /// Look up a task by name (first match in registration order).
    pub fn find(&self, name: &str) -> Option<TaskId> {
        self.tasks
            .iter()
            .position(|task| task.name() == name)
            .map(TaskId::new)
    }

    /// Returns `None` if `id` is not registered.
    pub fn is_complete(&self, id: TaskId) -> Option<bool> {
        self.task(id).map(Task::is_complete)
    }

    /// Completion flags in registration order.
    pub fn completion_flags(&self) -> Vec<bool> {
        self.tasks.iter().map(Task::is_complete).collect()
    }

    /// Clear every completion flag without running a sweep.
    ///
    /// The next sweep restores from the store first, so callers that want a
    /// fresh cycle on the device must also clear the store.
    pub fn reset_cycle(&mut self) {
        self.state_manager().reset_all();
    }

    fn state_manager(&mut self) -> StateManager<'_> {
        StateManager::new(&mut self.tasks, self.capacity, self.max_persisted_tasks)
    }
}

/// Nullable sweep entry point.
///
/// A missing scheduler or energy source makes this a no-op that never
/// touches `store`: no load, no save.
pub fn run(
    scheduler: Option<&mut Scheduler>,
    energy: Option<&mut dyn EnergySource>,
    store: &mut dyn StateStore,
) -> SweepReport {
    match (scheduler, energy) {
        (Some(scheduler), Some(energy)) => scheduler.run(energy, store),
        (scheduler, energy) => {
            warn!(
                has_scheduler = scheduler.is_some(),
                has_energy_source = energy.is_some(),
                "sweep called with missing arguments; skipping"
            );
            SweepReport::aborted(AbortReason::InvalidArguments)
        }
    }
}
