#![allow(dead_code)]

pub use powertask_test_utils::builders;
pub use powertask_test_utils::fakes;
pub use powertask_test_utils::init_tracing;

use powertask::scheduler::Scheduler;
use powertask::task::Task;
use powertask::types::TaskId;

/// Register `task`, panicking if the scheduler is unexpectedly full.
pub fn register(scheduler: &mut Scheduler, task: Task) -> TaskId {
    scheduler
        .register(task)
        .id()
        .expect("scheduler has room for the task")
}
