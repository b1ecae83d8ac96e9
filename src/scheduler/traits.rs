/*
 * Scheduler Trait Definitions
 *
 * This module defines the traits that separate scheduling policy from mechanism:
 *
 * - SchedClass: the operation table a scheduling class (OTHER_RR, idle, ...)
 *   implements, plus the link to the next class in the chain
 * - KernelSchedCtx: the collaborators a class calls back into (CPU identity,
 *   runtime charging, the generic cross-class preemption check)
 *
 * This separation allows:
 * 1. Adding scheduling classes without changing the dispatcher
 * 2. Testing a class in isolation with a stub context
 * 3. Clear ownership boundaries (classes never lock, never own tasks)
 */

use super::{
    run_queue::Rq,
    task::TaskTable,
    types::{CpuId, CpuIdleType, DequeueFlags, EnqueueFlags, SchedPolicy, SdFlag, TaskId},
};

/// Scheduling class operation table
///
/// Every method runs with the lock of the run queue(s) it is given already
/// held by the caller, and must not block. Classes are registered once as
/// `static` values and never change afterwards.
///
/// The dispatcher tries classes in chain order: when `pick_next_task`
/// returns `None` it moves on to `next()`.
pub trait SchedClass: Sync {
    /// Class name for debugging
    fn name(&self) -> &'static str;

    /// Policy whose tasks this class governs
    fn policy(&self) -> SchedPolicy;

    /// Class consulted when this one has nothing to run
    fn next(&self) -> Option<&'static dyn SchedClass>;

    /// Task became runnable on `rq`
    fn enqueue_task(
        &self,
        rq: &mut Rq,
        tasks: &mut TaskTable,
        ctx: &mut dyn KernelSchedCtx,
        tid: TaskId,
        flags: EnqueueFlags,
    );

    /// Task stops being runnable on `rq` (sleep, exit, migration)
    fn dequeue_task(
        &self,
        rq: &mut Rq,
        tasks: &mut TaskTable,
        ctx: &mut dyn KernelSchedCtx,
        tid: TaskId,
        flags: DequeueFlags,
    );

    /// Current task gives up its turn
    fn yield_task(&self, rq: &mut Rq, tasks: &mut TaskTable);

    /// Should the newly woken `tid` preempt the current task of this class?
    fn check_preempt_curr(&self, rq: &mut Rq, tasks: &mut TaskTable, tid: TaskId);

    /// Choose the next task, or `None` to fall through to `next()`
    fn pick_next_task(&self, rq: &mut Rq, tasks: &mut TaskTable) -> Option<TaskId>;

    /// Task is about to stop running
    fn put_prev_task(
        &self,
        rq: &mut Rq,
        tasks: &mut TaskTable,
        ctx: &mut dyn KernelSchedCtx,
        tid: TaskId,
    );

    /// Running task just switched into this class
    fn set_curr_task(&self, rq: &mut Rq, tasks: &mut TaskTable);

    /// Timer tick for the running task
    fn task_tick(
        &self,
        rq: &mut Rq,
        tasks: &mut TaskTable,
        ctx: &mut dyn KernelSchedCtx,
        tid: TaskId,
        queued: bool,
    );

    /// Task's policy changed to this class
    fn switched_to(
        &self,
        rq: &mut Rq,
        tasks: &mut TaskTable,
        ctx: &mut dyn KernelSchedCtx,
        tid: TaskId,
        running: bool,
    );

    /// Pick the CPU a waking task should be queued on
    fn select_task_rq(
        &self,
        tasks: &TaskTable,
        ctx: &mut dyn KernelSchedCtx,
        tid: TaskId,
        sd_flag: SdFlag,
        wake_flags: EnqueueFlags,
    ) -> CpuId;

    /// Pull up to `max_load_move` units of load from `busiest` to `this_rq`
    ///
    /// Returns the load actually moved. Both run queues are locked by the
    /// caller.
    fn load_balance(
        &self,
        this_rq: &mut Rq,
        busiest: &mut Rq,
        tasks: &mut TaskTable,
        ctx: &mut dyn KernelSchedCtx,
        max_load_move: usize,
        idle: CpuIdleType,
    ) -> usize;

    /// Pull exactly one task from `busiest`, if any can move
    fn move_one_task(
        &self,
        this_rq: &mut Rq,
        busiest: &mut Rq,
        tasks: &mut TaskTable,
        ctx: &mut dyn KernelSchedCtx,
        idle: CpuIdleType,
    ) -> bool;
}

/// Kernel context interface for scheduling classes
///
/// This trait is the ONLY way a class reaches outside its run queue:
/// - which CPU is executing the call
/// - charging runtime to the accounting subsystem
/// - the dispatcher's cross-class preemption check
///
/// The mechanism (SchedulerCore) provides the real implementation; tests
/// provide stubs.
pub trait KernelSchedCtx {
    /// CPU executing the current scheduler call
    fn this_cpu(&self) -> CpuId;

    /// Charge `delta_ns` of runtime to `tid`'s accounting group
    fn charge(&mut self, tid: TaskId, delta_ns: u64);

    /// Generic preemption check of `tid` against `rq`'s current task
    ///
    /// Resolves the classes of both tasks and either delegates to the shared
    /// class or requests a reschedule when `tid`'s class ranks higher.
    fn check_preempt_curr(&mut self, rq: &mut Rq, tasks: &mut TaskTable, tid: TaskId);
}
