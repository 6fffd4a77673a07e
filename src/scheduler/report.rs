// src/scheduler/report.rs

//! Result types describing what a single sweep did.

use crate::energy::EnergyError;
use crate::storage::RecordError;
use crate::types::{Joules, TaskId};

/// Outcome of a [`Scheduler::register`](super::Scheduler::register) call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Registered(TaskId),
    /// The registry was already full; nothing changed.
    Rejected { capacity: usize },
    /// The task's cost was negative, NaN or infinite; nothing changed.
    InvalidEnergy,
}

impl Registration {
    pub fn id(self) -> Option<TaskId> {
        match self {
            Registration::Registered(id) => Some(id),
            Registration::Rejected { .. } | Registration::InvalidEnergy => None,
        }
    }

    pub fn is_registered(self) -> bool {
        matches!(self, Registration::Registered(_))
    }
}

/// Whether the sweep ran at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepStatus {
    Completed,
    Aborted(AbortReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// No scheduler or no energy source was supplied.
    InvalidArguments,
}

/// What happened when the persisted record was read back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreStatus {
    NotAttempted,
    /// Completion flags were overwritten from the store.
    Restored { count: usize },
    /// The store could not be read; in-memory flags were kept.
    LoadFailed(String),
    /// The record was read but is unusable; in-memory flags were kept.
    Rejected(RecordError),
}

/// What happened when the completion vector was written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistStatus {
    NotAttempted,
    Saved { bytes: usize },
    /// The registry is larger than the record format allows; nothing written.
    SkippedOversized { count: usize, max: usize },
    SaveFailed(String),
}

/// Why an incomplete task did not run this sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkipReason {
    InsufficientEnergy { available: Joules, required: Joules },
    EnergyUnavailable(EnergyError),
    NotReady,
}

/// Structured result of one sweep.
///
/// The sweep itself never fails; this is the diagnostic channel for
/// everything it skipped or could not do.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepReport {
    pub status: SweepStatus,
    pub restore: RestoreStatus,
    /// Tasks executed during this sweep, in execution order.
    pub executed: Vec<TaskId>,
    /// Incomplete tasks that were left for a later sweep.
    pub skipped: Vec<(TaskId, SkipReason)>,
    /// Tasks that were already complete when the sweep reached them.
    pub already_complete: usize,
    /// Every task was complete, so all flags were cleared before persisting.
    pub cycle_reset: bool,
    pub persist: PersistStatus,
}

impl SweepReport {
    pub(crate) fn new() -> Self {
        Self {
            status: SweepStatus::Completed,
            restore: RestoreStatus::NotAttempted,
            executed: Vec::new(),
            skipped: Vec::new(),
            already_complete: 0,
            cycle_reset: false,
            persist: PersistStatus::NotAttempted,
        }
    }

    pub(crate) fn aborted(reason: AbortReason) -> Self {
        Self {
            status: SweepStatus::Aborted(reason),
            ..Self::new()
        }
    }

    pub fn was_aborted(&self) -> bool {
        matches!(self.status, SweepStatus::Aborted(_))
    }

    pub fn executed_task(&self, id: TaskId) -> bool {
        self.executed.contains(&id)
    }

    pub fn skip_reason(&self, id: TaskId) -> Option<SkipReason> {
        self.skipped
            .iter()
            .find(|(skipped, _)| *skipped == id)
            .map(|(_, reason)| *reason)
    }
}
