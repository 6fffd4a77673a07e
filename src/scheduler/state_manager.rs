// src/scheduler/state_manager.rs

//! Completion-flag bookkeeping: restoring from and persisting to a
//! [`StateStore`], and the full-cycle reset.

use tracing::{debug, info, warn};

use crate::scheduler::report::{PersistStatus, RestoreStatus};
use crate::storage::record::{self, RecordError};
use crate::storage::{StateStore, StorageError};
use crate::task::Task;

/// Borrowed view over a scheduler's tasks for state transitions.
pub struct StateManager<'a> {
    tasks: &'a mut [Task],
    capacity: usize,
    max_persisted_tasks: usize,
}

impl<'a> StateManager<'a> {
    pub fn new(tasks: &'a mut [Task], capacity: usize, max_persisted_tasks: usize) -> Self {
        Self {
            tasks,
            capacity,
            max_persisted_tasks,
        }
    }

    /// Overwrite every task's `complete` flag from the stored record.
    ///
    /// Best effort: on any failure the in-memory flags are left untouched.
    pub fn restore(&mut self, store: &mut dyn StateStore) -> RestoreStatus {
        let mut buf = vec![0u8; record::max_record_len(self.max_persisted_tasks)];

        let len = match store.load(&mut buf) {
            Ok(len) => len,
            Err(StorageError::Empty) => {
                debug!("no stored scheduler state; starting fresh");
                return RestoreStatus::LoadFailed(StorageError::Empty.to_string());
            }
            Err(err) => {
                warn!(error = %err, "failed to load scheduler state; keeping in-memory flags");
                return RestoreStatus::LoadFailed(err.to_string());
            }
        };

        let flags = match record::decode(&buf[..len], self.capacity) {
            Ok(flags) => flags,
            Err(err) => {
                warn!(error = %err, "stored scheduler state rejected; keeping in-memory flags");
                return RestoreStatus::Rejected(err);
            }
        };

        if flags.len() != self.tasks.len() {
            let err = RecordError::CountMismatch {
                stored: flags.len(),
                registered: self.tasks.len(),
            };
            warn!(error = %err, "stored scheduler state rejected; keeping in-memory flags");
            return RestoreStatus::Rejected(err);
        }

        for (task, done) in self.tasks.iter_mut().zip(flags.iter()) {
            task.complete = *done;
        }

        debug!(
            count = flags.len(),
            complete = flags.iter().filter(|done| **done).count(),
            "restored scheduler state"
        );
        RestoreStatus::Restored { count: flags.len() }
    }

    /// Write the completion vector, in registration order, as one record.
    ///
    /// Skipped entirely when the registry is larger than the record allows.
    pub fn persist(&self, store: &mut dyn StateStore) -> PersistStatus {
        let count = self.tasks.len();
        let max = self.max_persisted_tasks.min(record::FORMAT_MAX_TASKS);
        if count > max {
            warn!(
                count,
                max, "registry too large for the persisted record; skipping save"
            );
            return PersistStatus::SkippedOversized { count, max };
        }

        let flags: Vec<bool> = self.tasks.iter().map(|task| task.complete).collect();
        let bytes = match record::encode(&flags, max) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(error = %err, "failed to encode scheduler state; skipping save");
                return PersistStatus::SkippedOversized { count, max };
            }
        };

        match store.save(&bytes) {
            Ok(()) => PersistStatus::Saved { bytes: bytes.len() },
            Err(err) => {
                warn!(error = %err, "failed to save scheduler state");
                PersistStatus::SaveFailed(err.to_string())
            }
        }
    }

    /// Check if every task is complete.
    ///
    /// An empty registry has nothing to complete and never counts as done.
    pub fn all_complete(&self) -> bool {
        !self.tasks.is_empty() && self.tasks.iter().all(|task| task.complete)
    }

    /// Clear every completion flag, starting a new cycle.
    pub fn reset_all(&mut self) {
        for task in self.tasks.iter_mut() {
            task.complete = false;
        }
        info!(tasks = self.tasks.len(), "all tasks complete; starting new cycle");
    }
}
