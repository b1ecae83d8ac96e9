/*
 * Cross-CPU Load Balancing
 *
 * The generic balancer that scheduling classes hand their run-queue
 * iterator to. A class exposes its busiest queue through the RqIterator
 * start/next protocol; the balancer walks it, decides which tasks may move,
 * and migrates them with the class's ordinary dequeue/enqueue.
 *
 * Both run queues are locked by the caller for the whole pass. The task
 * returned by the iterator may be dequeued before the next call, so
 * iterators must already have stepped past it when they return it.
 *
 * Every task weighs one unit of load: OTHER_RR has no weighting.
 */

use super::{
    run_queue::Rq,
    task::TaskTable,
    traits::{KernelSchedCtx, SchedClass},
    types::{CpuId, CpuIdleType, DequeueFlags, EnqueueFlags, TaskId},
};

/// Load a single task contributes
pub const TASK_LOAD: usize = 1;

/// Restartable, dequeue-safe traversal of a class's run queue
pub trait RqIterator {
    /// Begin a pass over `rq` and return its first candidate
    fn start(&self, rq: &mut Rq, tasks: &TaskTable) -> Option<TaskId>;

    /// Return the next candidate of the pass, `None` once exhausted
    fn next(&self, rq: &mut Rq, tasks: &TaskTable) -> Option<TaskId>;

    /// The balancer is done with the pass
    fn finish(&self, _rq: &mut Rq) {}
}

/// Can `tid` be pulled from `busiest` onto `this_cpu`?
///
/// Never the task running on `busiest`, never a task pinned away from
/// `this_cpu`.
pub fn can_migrate_task(busiest: &Rq, tasks: &TaskTable, tid: TaskId, this_cpu: CpuId) -> bool {
    if busiest.curr == Some(tid) {
        return false;
    }
    tasks[tid].cpus_allowed.contains(this_cpu)
}

/// Move `tid` from `src` to `dst`
pub fn pull_task(
    class: &dyn SchedClass,
    src: &mut Rq,
    dst: &mut Rq,
    tasks: &mut TaskTable,
    ctx: &mut dyn KernelSchedCtx,
    tid: TaskId,
) {
    class.dequeue_task(src, tasks, ctx, tid, DequeueFlags::MIGRATE);
    tasks[tid].cpu = dst.cpu;
    class.enqueue_task(dst, tasks, ctx, tid, EnqueueFlags::MIGRATE);

    log::debug!("[Balance] pulled {} from {} to {}", tid, src.cpu, dst.cpu);

    // Let the pulled task preempt the destination's current task
    ctx.check_preempt_curr(dst, tasks, tid);
}

/// Pull tasks until `max_load_move` load has moved or the pass ends
///
/// A newly idle CPU only takes one task: it just needs something to run.
#[allow(clippy::too_many_arguments)]
pub fn balance_tasks(
    class: &dyn SchedClass,
    iter: &dyn RqIterator,
    this_rq: &mut Rq,
    busiest: &mut Rq,
    tasks: &mut TaskTable,
    ctx: &mut dyn KernelSchedCtx,
    max_load_move: usize,
    idle: CpuIdleType,
) -> usize {
    if max_load_move == 0 {
        return 0;
    }

    let mut moved = 0;
    let mut candidate = iter.start(busiest, tasks);

    while let Some(tid) = candidate {
        if can_migrate_task(busiest, tasks, tid, this_rq.cpu) {
            pull_task(class, busiest, this_rq, tasks, ctx, tid);
            moved += TASK_LOAD;

            if moved >= max_load_move || idle == CpuIdleType::NewlyIdle {
                break;
            }
        }
        candidate = iter.next(busiest, tasks);
    }

    iter.finish(busiest);
    moved
}

/// Pull the first movable task of `busiest`
pub fn iter_move_one_task(
    class: &dyn SchedClass,
    iter: &dyn RqIterator,
    this_rq: &mut Rq,
    busiest: &mut Rq,
    tasks: &mut TaskTable,
    ctx: &mut dyn KernelSchedCtx,
) -> bool {
    let mut candidate = iter.start(busiest, tasks);

    while let Some(tid) = candidate {
        if can_migrate_task(busiest, tasks, tid, this_rq.cpu) {
            pull_task(class, busiest, this_rq, tasks, ctx, tid);
            iter.finish(busiest);
            return true;
        }
        candidate = iter.next(busiest, tasks);
    }

    iter.finish(busiest);
    false
}
