//! Periodic task harness
//!
//! Release-time bookkeeping and priority assignment for a fixed set of
//! periodic tasks. Preemption and timers belong to the scheduler the tasks
//! run on; this module only decides *when* each task is released and *how
//! urgent* it is.

pub mod priority;
pub mod release;

pub use priority::{
    assign_priorities, executor_level, Priority, PriorityClass, TaskSet, TaskSpec, MAX_TASKS,
};
pub use release::ReleaseSchedule;
