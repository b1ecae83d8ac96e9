/*
 * OTHER_RR Scheduling Class
 *
 * Round robin with no priority mechanism. Every runnable task sits in one
 * FIFO per CPU; the head runs, and after `quantum` timer ticks it is rotated
 * to the tail and the next task gets its turn.
 *
 * Features:
 * - Strict FIFO: arrivals and expired tasks go to the tail, selection takes
 *   the head
 * - Fixed quantum for everyone, 0 disables rotation
 * - Exact runtime accounting on every queue change and tick
 * - Dequeue-safe load-balance iterator for cross-CPU pulls
 *
 * The running task stays linked in the queue while it runs; `rq.curr` marks
 * which one it is. Rotation therefore never unlinks anything, it only moves
 * the link to the tail.
 */

use super::super::{
    balance::{self, RqIterator},
    config::SchedConfig,
    run_list::RunList,
    run_queue::{LbCursor, Rq},
    task::TaskTable,
    traits::{KernelSchedCtx, SchedClass},
    types::{CpuId, CpuIdleType, DequeueFlags, EnqueueFlags, SchedPolicy, SdFlag, TaskId},
};
use super::idle::IDLE_SCHED_CLASS;

/// The registered OTHER_RR class, falling back to the idle class
pub static OTHER_RR_SCHED_CLASS: OtherRrSchedClass =
    OtherRrSchedClass::new(SchedConfig::DEFAULT, Some(&IDLE_SCHED_CLASS));

/// OTHER_RR scheduling class
///
/// Holds the immutable configuration (the quantum) and the next class in
/// the chain. Per-CPU state lives in `Rq::other_rr`.
pub struct OtherRrSchedClass {
    config: SchedConfig,
    next: Option<&'static dyn SchedClass>,
}

impl OtherRrSchedClass {
    pub const fn new(config: SchedConfig, next: Option<&'static dyn SchedClass>) -> Self {
        Self { config, next }
    }

    pub fn config(&self) -> SchedConfig {
        self.config
    }

    /// Update the current task's runtime statistics
    ///
    /// Skips current tasks that are not in this class. A clock sample older
    /// than the task's start of execution counts as zero runtime.
    pub fn update_curr(&self, rq: &Rq, tasks: &mut TaskTable, ctx: &mut dyn KernelSchedCtx) {
        let Some(curr) = rq.curr else {
            return;
        };
        let task = &mut tasks[curr];
        if task.policy != SchedPolicy::OtherRr {
            return;
        }

        let delta_exec = match rq.clock.checked_sub(task.se.exec_start) {
            Some(delta) => delta,
            None => {
                log::trace!(
                    "[OtherRR] clock behind exec_start on {}: {} < {}",
                    rq.cpu,
                    rq.clock,
                    task.se.exec_start
                );
                0
            }
        };

        task.se.exec_max = task.se.exec_max.max(delta_exec);
        task.se.sum_exec_runtime += delta_exec;
        task.se.exec_start = rq.clock;
        ctx.charge(curr, delta_exec);
    }

    /// Put a queued task at the tail without a dequeue/enqueue pair
    ///
    /// No accounting happens here: the task never left the queue.
    pub fn requeue_task(&self, rq: &mut Rq, tasks: &mut TaskTable, tid: TaskId) {
        rq.other_rr.queue.move_to_back(tasks, tid);
    }
}

impl SchedClass for OtherRrSchedClass {
    fn name(&self) -> &'static str {
        "OtherRR"
    }

    fn policy(&self) -> SchedPolicy {
        SchedPolicy::OtherRr
    }

    fn next(&self) -> Option<&'static dyn SchedClass> {
        self.next
    }

    fn enqueue_task(
        &self,
        rq: &mut Rq,
        tasks: &mut TaskTable,
        ctx: &mut dyn KernelSchedCtx,
        tid: TaskId,
        _flags: EnqueueFlags,
    ) {
        self.update_curr(rq, tasks, ctx);

        // A fresh task starts with a full quantum
        let task = &mut tasks[tid];
        if task.time_slice == 0 {
            task.time_slice = self.config.quantum().get();
        }

        rq.other_rr.queue.push_back(tasks, tid);
        rq.other_rr.nr_running += 1;

        log::trace!(
            "[OtherRR] enqueue {} on {} (nr_running={})",
            tid,
            rq.cpu,
            rq.other_rr.nr_running
        );
    }

    fn dequeue_task(
        &self,
        rq: &mut Rq,
        tasks: &mut TaskTable,
        ctx: &mut dyn KernelSchedCtx,
        tid: TaskId,
        _flags: DequeueFlags,
    ) {
        self.update_curr(rq, tasks, ctx);

        // Keep an active balancer cursor off the task being unlinked
        if let Some(lb) = rq.other_rr.lb.as_mut() {
            if lb.curr == Some(tid) {
                lb.curr = RunList::prev_of(tasks, tid);
            }
        }

        rq.other_rr.queue.remove(tasks, tid);
        rq.other_rr.nr_running -= 1;

        log::trace!(
            "[OtherRR] dequeue {} from {} (nr_running={})",
            tid,
            rq.cpu,
            rq.other_rr.nr_running
        );
    }

    fn yield_task(&self, rq: &mut Rq, tasks: &mut TaskTable) {
        let Some(curr) = rq.curr else {
            return;
        };
        if tasks[curr].policy == SchedPolicy::OtherRr && tasks[curr].run_link().is_linked() {
            self.requeue_task(rq, tasks, curr);
        }
    }

    fn check_preempt_curr(&self, _rq: &mut Rq, _tasks: &mut TaskTable, _tid: TaskId) {
        // No priorities: a woken task waits for its turn.
    }

    fn pick_next_task(&self, rq: &mut Rq, tasks: &mut TaskTable) -> Option<TaskId> {
        let next = rq.other_rr.queue.front()?;

        tasks[next].se.exec_start = rq.clock;
        Some(next)
    }

    fn put_prev_task(
        &self,
        rq: &mut Rq,
        tasks: &mut TaskTable,
        ctx: &mut dyn KernelSchedCtx,
        tid: TaskId,
    ) {
        self.update_curr(rq, tasks, ctx);
        tasks[tid].se.exec_start = 0;
    }

    fn set_curr_task(&self, rq: &mut Rq, tasks: &mut TaskTable) {
        if let Some(curr) = rq.curr {
            tasks[curr].se.exec_start = rq.clock;
        }
    }

    fn task_tick(
        &self,
        rq: &mut Rq,
        tasks: &mut TaskTable,
        ctx: &mut dyn KernelSchedCtx,
        tid: TaskId,
        _queued: bool,
    ) {
        self.update_curr(rq, tasks, ctx);

        let quantum = self.config.quantum();
        if quantum.is_disabled() {
            return;
        }

        let task = &mut tasks[tid];
        if task.time_slice != 0 {
            task.time_slice -= 1;
        }
        if task.time_slice != 0 {
            return;
        }

        task.time_slice = quantum.get();
        task.set_need_resched();
        if task.run_link().is_linked() {
            self.requeue_task(rq, tasks, tid);
        }

        log::trace!("[OtherRR] quantum expired for {} on {}", tid, rq.cpu);
    }

    fn switched_to(
        &self,
        rq: &mut Rq,
        tasks: &mut TaskTable,
        ctx: &mut dyn KernelSchedCtx,
        tid: TaskId,
        running: bool,
    ) {
        // Kick off the schedule if running, otherwise just see if we can
        // still preempt the current task.
        if running {
            if let Some(curr) = rq.curr {
                tasks[curr].set_need_resched();
            }
        } else {
            ctx.check_preempt_curr(rq, tasks, tid);
        }
    }

    fn select_task_rq(
        &self,
        tasks: &TaskTable,
        ctx: &mut dyn KernelSchedCtx,
        tid: TaskId,
        sd_flag: SdFlag,
        _wake_flags: EnqueueFlags,
    ) -> CpuId {
        if sd_flag != SdFlag::BalanceWake {
            return ctx.this_cpu();
        }
        tasks[tid].cpu
    }

    fn load_balance(
        &self,
        this_rq: &mut Rq,
        busiest: &mut Rq,
        tasks: &mut TaskTable,
        ctx: &mut dyn KernelSchedCtx,
        max_load_move: usize,
        idle: CpuIdleType,
    ) -> usize {
        balance::balance_tasks(
            self,
            &OtherRrRqIterator,
            this_rq,
            busiest,
            tasks,
            ctx,
            max_load_move,
            idle,
        )
    }

    fn move_one_task(
        &self,
        this_rq: &mut Rq,
        busiest: &mut Rq,
        tasks: &mut TaskTable,
        ctx: &mut dyn KernelSchedCtx,
        _idle: CpuIdleType,
    ) -> bool {
        balance::iter_move_one_task(self, &OtherRrRqIterator, this_rq, busiest, tasks, ctx)
    }
}

// ================================================================================================
// LOAD-BALANCE ITERATOR
// ================================================================================================

/// Begin a load-balance pass over `rq`
///
/// Walks from the tail towards the head. The cursor is stepped past the
/// returned task before returning it, so the balancer may dequeue that
/// task before calling [`load_balance_next_other_rr`].
pub fn load_balance_start_other_rr(rq: &mut Rq, tasks: &TaskTable) -> Option<TaskId> {
    let Some(tail) = rq.other_rr.queue.back() else {
        rq.other_rr.lb = Some(LbCursor { curr: None });
        return None;
    };

    rq.other_rr.lb = Some(LbCursor {
        curr: RunList::prev_of(tasks, tail),
    });
    Some(tail)
}

/// Next task of the pass started by [`load_balance_start_other_rr`]
///
/// Returns `None` once the head has been passed, or if no pass is active.
pub fn load_balance_next_other_rr(rq: &mut Rq, tasks: &TaskTable) -> Option<TaskId> {
    let cursor = rq.other_rr.lb.as_mut()?;
    let tid = cursor.curr?;

    cursor.curr = RunList::prev_of(tasks, tid);
    Some(tid)
}

/// RqIterator over the OTHER_RR queue, handed to the generic balancer
pub struct OtherRrRqIterator;

impl RqIterator for OtherRrRqIterator {
    fn start(&self, rq: &mut Rq, tasks: &TaskTable) -> Option<TaskId> {
        load_balance_start_other_rr(rq, tasks)
    }

    fn next(&self, rq: &mut Rq, tasks: &TaskTable) -> Option<TaskId> {
        load_balance_next_other_rr(rq, tasks)
    }

    fn finish(&self, rq: &mut Rq) {
        rq.other_rr.lb = None;
    }
}
