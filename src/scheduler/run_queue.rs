/*
 * Per-CPU Run Queue
 *
 * Every CPU owns one Rq. It carries the CPU's clock, the currently running
 * task, the CPU's idle task and the OTHER_RR sub-queue. The whole Rq is
 * protected by one lock held by the caller of every scheduling-class
 * operation; nothing in here locks.
 */

use super::run_list::RunList;
use super::task::TaskTable;
use super::types::{CpuId, TaskId};

/// Load-balance traversal cursor
///
/// Exists only while a balancer pass is running over the queue. `curr` is
/// the next task the pass will yield; `None` means the pass reached the head.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LbCursor {
    pub curr: Option<TaskId>,
}

/// OTHER_RR part of a run queue
#[derive(Debug, Default)]
pub struct OtherRrRq {
    /// Ready tasks in FIFO order (the running one stays linked)
    pub queue: RunList,

    /// Number of tasks linked in `queue`
    pub nr_running: usize,

    /// Active load-balance pass, if any
    pub lb: Option<LbCursor>,
}

impl OtherRrRq {
    pub const fn new() -> Self {
        Self {
            queue: RunList::new(),
            nr_running: 0,
            lb: None,
        }
    }

    /// Snapshot of the queue, head first
    pub fn queued<'a>(&self, tasks: &'a TaskTable) -> impl Iterator<Item = TaskId> + 'a {
        self.queue.iter(tasks)
    }
}

/// Per-CPU run queue
#[derive(Debug)]
pub struct Rq {
    pub cpu: CpuId,

    /// Per-CPU clock in nanoseconds, fed by the clock source
    pub clock: u64,

    /// Task currently running on this CPU
    pub curr: Option<TaskId>,

    /// This CPU's idle task
    pub idle: Option<TaskId>,

    pub other_rr: OtherRrRq,

    /// Context switches performed on this CPU
    pub nr_switches: u64,

    /// Timer ticks seen by this CPU
    pub nr_ticks: u64,
}

impl Rq {
    pub const fn new(cpu: CpuId) -> Self {
        Self {
            cpu,
            clock: 0,
            curr: None,
            idle: None,
            other_rr: OtherRrRq::new(),
            nr_switches: 0,
            nr_ticks: 0,
        }
    }

    /// Advance the clock to `now`
    ///
    /// A sample older than the current clock is ignored. Accounting still
    /// guards against a regressed clock on its own.
    pub fn update_clock(&mut self, now: u64) {
        if now > self.clock {
            self.clock = now;
        }
    }

    /// Runnable tasks of every class, idle task excluded
    pub fn nr_running(&self) -> usize {
        self.other_rr.nr_running
    }
}
