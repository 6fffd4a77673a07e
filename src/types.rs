// src/types.rs

//! Small value types shared by the scheduler, the energy model and the
//! config layer.

use std::fmt;

use serde::Deserialize;

/// An amount of energy in joules.
///
/// Comparisons against a task's cost are strict: a task costing `400 J`
/// needs strictly more than `400 J` available.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct Joules(pub f64);

impl Joules {
    pub const ZERO: Joules = Joules(0.0);

    pub fn value(self) -> f64 {
        self.0
    }

    /// A usable task cost: finite and not negative.
    pub fn is_valid_cost(self) -> bool {
        self.0.is_finite() && self.0 >= 0.0
    }

    /// `true` if this quantity can pay for `cost` (strictly greater).
    pub fn covers(self, cost: Joules) -> bool {
        self.0 > cost.0
    }
}

impl From<f64> for Joules {
    fn from(value: f64) -> Self {
        Joules(value)
    }
}

impl From<u32> for Joules {
    fn from(value: u32) -> Self {
        Joules(f64::from(value))
    }
}

impl fmt::Display for Joules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} J", self.0)
    }
}

/// Position of a task inside its owning [`Scheduler`](crate::scheduler::Scheduler).
///
/// Ids are handed out in registration order and never change. They are also
/// the position of the task's flag in the persisted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(usize);

impl TaskId {
    pub fn new(index: usize) -> Self {
        TaskId(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
