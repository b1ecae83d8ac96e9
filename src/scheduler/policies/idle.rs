/*
 * Idle Scheduling Class
 *
 * The last class in the chain. It only ever runs the per-CPU idle task,
 * which is never queued: it is what the CPU runs when every class above
 * has nothing.
 */

use super::super::{
    run_queue::Rq,
    task::TaskTable,
    traits::{KernelSchedCtx, SchedClass},
    types::{CpuId, CpuIdleType, DequeueFlags, EnqueueFlags, SchedPolicy, SdFlag, TaskId},
};

/// The registered idle class
pub static IDLE_SCHED_CLASS: IdleSchedClass = IdleSchedClass;

/// Idle scheduling class
pub struct IdleSchedClass;

impl SchedClass for IdleSchedClass {
    fn name(&self) -> &'static str {
        "Idle"
    }

    fn policy(&self) -> SchedPolicy {
        SchedPolicy::Idle
    }

    fn next(&self) -> Option<&'static dyn SchedClass> {
        None
    }

    fn enqueue_task(
        &self,
        rq: &mut Rq,
        _tasks: &mut TaskTable,
        _ctx: &mut dyn KernelSchedCtx,
        tid: TaskId,
        _flags: EnqueueFlags,
    ) {
        log::error!("[Idle] bad enqueue of {} on {}", tid, rq.cpu);
    }

    fn dequeue_task(
        &self,
        rq: &mut Rq,
        _tasks: &mut TaskTable,
        _ctx: &mut dyn KernelSchedCtx,
        tid: TaskId,
        _flags: DequeueFlags,
    ) {
        log::error!("[Idle] bad dequeue of {} on {}", tid, rq.cpu);
    }

    fn yield_task(&self, _rq: &mut Rq, _tasks: &mut TaskTable) {}

    fn check_preempt_curr(&self, _rq: &mut Rq, _tasks: &mut TaskTable, _tid: TaskId) {}

    fn pick_next_task(&self, rq: &mut Rq, _tasks: &mut TaskTable) -> Option<TaskId> {
        rq.idle
    }

    fn put_prev_task(
        &self,
        _rq: &mut Rq,
        _tasks: &mut TaskTable,
        _ctx: &mut dyn KernelSchedCtx,
        _tid: TaskId,
    ) {
    }

    fn set_curr_task(&self, _rq: &mut Rq, _tasks: &mut TaskTable) {}

    fn task_tick(
        &self,
        _rq: &mut Rq,
        _tasks: &mut TaskTable,
        _ctx: &mut dyn KernelSchedCtx,
        _tid: TaskId,
        _queued: bool,
    ) {
    }

    fn switched_to(
        &self,
        _rq: &mut Rq,
        _tasks: &mut TaskTable,
        _ctx: &mut dyn KernelSchedCtx,
        _tid: TaskId,
        _running: bool,
    ) {
    }

    fn select_task_rq(
        &self,
        tasks: &TaskTable,
        _ctx: &mut dyn KernelSchedCtx,
        tid: TaskId,
        _sd_flag: SdFlag,
        _wake_flags: EnqueueFlags,
    ) -> CpuId {
        // idle tasks are bound to their CPU
        tasks[tid].cpu
    }

    fn load_balance(
        &self,
        _this_rq: &mut Rq,
        _busiest: &mut Rq,
        _tasks: &mut TaskTable,
        _ctx: &mut dyn KernelSchedCtx,
        _max_load_move: usize,
        _idle: CpuIdleType,
    ) -> usize {
        0
    }

    fn move_one_task(
        &self,
        _this_rq: &mut Rq,
        _busiest: &mut Rq,
        _tasks: &mut TaskTable,
        _ctx: &mut dyn KernelSchedCtx,
        _idle: CpuIdleType,
    ) -> bool {
        false
    }
}
