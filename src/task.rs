// src/task.rs

//! Task definitions: the unit of work a [`Scheduler`](crate::scheduler::Scheduler)
//! gates on energy and readiness.

use std::fmt;

use crate::types::{Joules, TaskId};

/// Side-effecting work performed when a task is executed.
pub trait Action {
    fn execute(&mut self);
}

impl<F> Action for F
where
    F: FnMut(),
{
    fn execute(&mut self) {
        self()
    }
}

/// A readiness predicate evaluated after the energy check passes.
pub trait Readiness {
    fn is_ready(&mut self) -> bool;
}

impl<F> Readiness for F
where
    F: FnMut() -> bool,
{
    fn is_ready(&mut self) -> bool {
        self()
    }
}

/// When a task is allowed to run (energy permitting).
pub enum Condition {
    /// Always ready.
    Always,
    /// Ready once the referenced task in the same scheduler is complete.
    ///
    /// This is a lookup by index, never ownership. Waiting on a task that is
    /// registered *later* only resolves on the following sweep.
    WaitFor(TaskId),
    /// Arbitrary predicate supplied by the caller.
    Custom(Box<dyn Readiness>),
}

impl Condition {
    pub fn custom(predicate: impl Readiness + 'static) -> Self {
        Condition::Custom(Box::new(predicate))
    }

    /// The task this condition waits on, if any.
    pub fn dependency(&self) -> Option<TaskId> {
        match self {
            Condition::WaitFor(id) => Some(*id),
            _ => None,
        }
    }
}

impl Default for Condition {
    fn default() -> Self {
        Condition::Always
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Always => f.write_str("Always"),
            Condition::WaitFor(id) => f.debug_tuple("WaitFor").field(id).finish(),
            Condition::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// One schedulable unit of work plus its cost and completion flag.
///
/// Built with a small builder:
///
/// ```
/// use powertask::task::Task;
///
/// let task = Task::new(400u32)
///     .named("sample")
///     .action(|| println!("sampling"));
/// assert!(!task.is_complete());
/// ```
pub struct Task {
    name: String,
    action: Option<Box<dyn Action>>,
    condition: Condition,
    required_energy: Joules,
    pub(crate) complete: bool,
}

impl Task {
    /// A task with no action that is always ready. Such a task completes as
    /// soon as there is enough energy.
    pub fn new(required_energy: impl Into<Joules>) -> Self {
        Self {
            name: String::new(),
            action: None,
            condition: Condition::Always,
            required_energy: required_energy.into(),
            complete: false,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn action(mut self, action: impl Action + 'static) -> Self {
        self.action = Some(Box::new(action));
        self
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }

    /// Shorthand for `condition(Condition::WaitFor(id))`.
    pub fn wait_for(self, id: TaskId) -> Self {
        self.condition(Condition::WaitFor(id))
    }

    /// Shorthand for `condition(Condition::custom(predicate))`.
    pub fn ready_when(self, predicate: impl Readiness + 'static) -> Self {
        self.condition(Condition::custom(predicate))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn required_energy(&self) -> Joules {
        self.required_energy
    }

    pub fn condition_ref(&self) -> &Condition {
        &self.condition
    }

    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Evaluate conditions that need nothing but the task itself.
    ///
    /// `WaitFor` is resolved by the scheduler, which owns the sibling flags.
    pub(crate) fn check_own_condition(&mut self) -> bool {
        match &mut self.condition {
            Condition::Always => true,
            Condition::Custom(predicate) => predicate.is_ready(),
            Condition::WaitFor(_) => false,
        }
    }

    pub(crate) fn execute(&mut self) {
        if let Some(action) = self.action.as_mut() {
            action.execute();
        }
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("has_action", &self.action.is_some())
            .field("condition", &self.condition)
            .field("required_energy", &self.required_energy)
            .field("complete", &self.complete)
            .finish()
    }
}
