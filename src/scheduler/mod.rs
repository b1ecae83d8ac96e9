/*
 * OTHER_RR Scheduler
 *
 * This module implements the OTHER_RR scheduling class and the mechanism
 * layer that drives it.
 *
 * SCHEDULING CLASSES EXPLAINED:
 * =============================
 *
 * A scheduling class is a table of operations (enqueue, dequeue, pick,
 * tick, ...) that governs every task of one policy. Classes are chained
 * from highest to lowest. When the dispatcher needs a task it asks each
 * class in turn; the first one with something runnable wins.
 *
 * Registered chain:
 *
 *   OTHER_RR -> Idle
 *
 * OTHER_RR ALGORITHM:
 * ===================
 *
 * Round robin with a fixed quantum and no priorities:
 * 1. A woken task is appended to the tail of its CPU's queue
 * 2. The head of the queue runs; it stays linked while it runs
 * 3. Every tick decrements its time slice
 * 4. When the slice runs out it is refilled, the task moves to the tail
 *    and a reschedule is requested
 * 5. A quantum of zero disables rotation: the head runs until it sleeps
 *
 * A woken task never preempts another OTHER_RR task. It only preempts the
 * idle task.
 *
 * MODULE ORGANIZATION:
 * ===================
 *
 * - types: CpuId, TaskId, policies, flag sets
 * - error: SchedError, ConfigError
 * - config: SchedConfig (quantum) and its command-line parsing
 * - task: Task and the TaskTable arena
 * - run_list: FIFO of TaskId handles linked through the tasks
 * - run_queue: per-CPU Rq and the OTHER_RR sub-queue
 * - traits: SchedClass, KernelSchedCtx
 * - policies: the OTHER_RR and idle classes
 * - balance: the generic cross-CPU balancer
 * - sched_core: SchedulerCore, the mechanism layer
 */

pub mod balance;
pub mod config;
pub mod error;
pub mod policies;
pub mod run_list;
pub mod run_queue;
pub mod sched_core;
pub mod task;
pub mod traits;
pub mod types;

pub use config::SchedConfig;
pub use error::{ConfigError, SchedError};
pub use policies::{IDLE_SCHED_CLASS, IdleSchedClass, OTHER_RR_SCHED_CLASS, OtherRrSchedClass};
pub use run_queue::Rq;
pub use sched_core::{SchedulerCore, TaskStats};
pub use task::{Task, TaskTable};
pub use traits::{KernelSchedCtx, SchedClass};
pub use types::{
    CpuId, CpuIdleType, CpuMask, DequeueFlags, EnqueueFlags, SchedPolicy, SdFlag, TaskFlags,
    TaskId, TimeSliceTicks,
};
