// src/scheduler/sweep.rs

//! One sweep over the registry.
//!
//! 1. Restore completion flags from the store (best effort).
//! 2. For each task in registration order:
//!    - already complete: count it and move on, no energy query;
//!    - query energy afresh; skip unless `available > required`;
//!    - evaluate the condition; skip if not ready;
//!    - run the action (if any) and mark the task complete.
//! 3. If every task is now complete, clear all flags (new cycle).
//! 4. Persist the flags, unless the registry exceeds the record limit.
//!
//! Nothing here aborts: every fault degrades to "skip this step".

use tracing::{debug, info, warn};

use super::report::{SkipReason, SweepReport};
use super::Scheduler;
use crate::energy::EnergySource;
use crate::storage::StateStore;
use crate::task::Condition;
use crate::types::TaskId;

impl Scheduler {
    pub(super) fn sweep(
        &mut self,
        energy: &mut dyn EnergySource,
        store: &mut dyn StateStore,
    ) -> SweepReport {
        let mut report = SweepReport::new();

        report.restore = self.state_manager().restore(store);

        for index in 0..self.tasks.len() {
            let id = TaskId::new(index);

            if self.tasks[index].complete {
                report.already_complete += 1;
                continue;
            }

            let required = self.tasks[index].required_energy();
            match energy.available_energy() {
                Ok(available) if available.covers(required) => {}
                Ok(available) => {
                    debug!(
                        task = %self.tasks[index].name(),
                        id = %id,
                        available = available.value(),
                        required = required.value(),
                        "insufficient energy; skipping"
                    );
                    report
                        .skipped
                        .push((id, SkipReason::InsufficientEnergy { available, required }));
                    continue;
                }
                Err(err) => {
                    debug!(
                        task = %self.tasks[index].name(),
                        id = %id,
                        error = %err,
                        "energy unavailable; skipping"
                    );
                    report.skipped.push((id, SkipReason::EnergyUnavailable(err)));
                    continue;
                }
            }

            if !self.is_ready(index) {
                debug!(task = %self.tasks[index].name(), id = %id, "condition not met; skipping");
                report.skipped.push((id, SkipReason::NotReady));
                continue;
            }

            let task = &mut self.tasks[index];
            info!(
                task = %task.name(),
                id = %id,
                required = required.value(),
                has_action = task.has_action(),
                "executing task"
            );
            task.execute();
            task.complete = true;
            report.executed.push(id);
        }

        let mut manager = self.state_manager();
        if manager.all_complete() {
            manager.reset_all();
            report.cycle_reset = true;
        }

        report.persist = manager.persist(store);

        debug!(
            executed = report.executed.len(),
            skipped = report.skipped.len(),
            already_complete = report.already_complete,
            cycle_reset = report.cycle_reset,
            "sweep finished"
        );
        report
    }

    /// Evaluate the condition of the task at `index`.
    ///
    /// `WaitFor` reads the sibling's flag as it stands right now, so an
    /// earlier task completed in this sweep already counts.
    fn is_ready(&mut self, index: usize) -> bool {
        if let Condition::WaitFor(dep) = self.tasks[index].condition_ref() {
            return match self.tasks.get(dep.index()) {
                Some(dep_task) => dep_task.complete,
                None => {
                    warn!(
                        task = %self.tasks[index].name(),
                        dep = %dep,
                        "waits on a task that is not registered; never ready"
                    );
                    false
                }
            };
        }
        self.tasks[index].check_own_condition()
    }
}
