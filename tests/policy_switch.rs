/*
 * Class Chain and Policy Changes
 *
 * A minimal FIFO class for the Normal policy is registered ahead of
 * OTHER_RR, so the dispatcher has a higher class to fall through from
 * and tasks have somewhere to switch to and from.
 */

use std::collections::VecDeque;
use std::sync::Mutex;

use cluu_sched_rr::scheduler::{
    CpuIdleType, DequeueFlags, EnqueueFlags, KernelSchedCtx, Rq, SchedClass, SdFlag, TaskTable,
};
use cluu_sched_rr::{CpuId, OTHER_RR_SCHED_CLASS, SchedError, SchedPolicy, SchedulerCore, TaskId};

const CPU: CpuId = CpuId::BSP;
const TICK_NS: u64 = 1_000_000;

/// Per-CPU FIFO for Normal tasks, no time slicing
struct NormalClass {
    queues: Mutex<Vec<VecDeque<TaskId>>>,
}

impl NormalClass {
    const fn new() -> Self {
        Self {
            queues: Mutex::new(Vec::new()),
        }
    }

    fn with_queue<R>(&self, cpu: CpuId, f: impl FnOnce(&mut VecDeque<TaskId>) -> R) -> R {
        let mut queues = self.queues.lock().unwrap();
        if queues.len() <= cpu.as_usize() {
            queues.resize_with(cpu.as_usize() + 1, VecDeque::new);
        }
        f(&mut queues[cpu.as_usize()])
    }
}

impl SchedClass for NormalClass {
    fn name(&self) -> &'static str {
        "Normal"
    }

    fn policy(&self) -> SchedPolicy {
        SchedPolicy::Normal
    }

    fn next(&self) -> Option<&'static dyn SchedClass> {
        Some(&OTHER_RR_SCHED_CLASS)
    }

    fn enqueue_task(
        &self,
        rq: &mut Rq,
        _tasks: &mut TaskTable,
        _ctx: &mut dyn KernelSchedCtx,
        tid: TaskId,
        _flags: EnqueueFlags,
    ) {
        self.with_queue(rq.cpu, |q| q.push_back(tid));
    }

    fn dequeue_task(
        &self,
        rq: &mut Rq,
        _tasks: &mut TaskTable,
        _ctx: &mut dyn KernelSchedCtx,
        tid: TaskId,
        _flags: DequeueFlags,
    ) {
        self.with_queue(rq.cpu, |q| q.retain(|&t| t != tid));
    }

    fn yield_task(&self, _rq: &mut Rq, _tasks: &mut TaskTable) {}

    fn check_preempt_curr(&self, _rq: &mut Rq, _tasks: &mut TaskTable, _tid: TaskId) {}

    fn pick_next_task(&self, rq: &mut Rq, _tasks: &mut TaskTable) -> Option<TaskId> {
        self.with_queue(rq.cpu, |q| q.front().copied())
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
        rq: &mut Rq,
        tasks: &mut TaskTable,
        ctx: &mut dyn KernelSchedCtx,
        tid: TaskId,
        running: bool,
    ) {
        if !running {
            ctx.check_preempt_curr(rq, tasks, tid);
        }
    }

    fn select_task_rq(
        &self,
        tasks: &TaskTable,
        _ctx: &mut dyn KernelSchedCtx,
        tid: TaskId,
        _sd_flag: SdFlag,
        _wake_flags: EnqueueFlags,
    ) -> CpuId {
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

fn spawn_running(core: &SchedulerCore, name: &str, policy: SchedPolicy) -> TaskId {
    let tid = core.spawn(name, policy, CPU).unwrap();
    core.wake_up_new(tid, CPU).unwrap();
    core.schedule(CPU).unwrap();
    assert_eq!(core.current(CPU), Some(tid));
    tid
}

#[test]
fn higher_class_wakeup_preempts_other_rr() {
    static NORMAL: NormalClass = NormalClass::new();
    let core = SchedulerCore::new(&NORMAL, 1).unwrap();
    assert_eq!(core.class_name(), "Normal");

    let rr = spawn_running(&core, "rr", SchedPolicy::OtherRr);
    let n = core.spawn("n", SchedPolicy::Normal, CPU).unwrap();
    core.wake_up_new(n, CPU).unwrap();

    assert!(core.need_resched(CPU));
    assert_eq!(core.schedule(CPU), Ok(Some(n)));

    // OTHER_RR runs again once the higher class is empty
    core.sleep(n).unwrap();
    assert_eq!(core.schedule(CPU), Ok(Some(rr)));
}

#[test]
fn running_task_switched_to_other_rr_is_rescheduled() {
    static NORMAL: NormalClass = NormalClass::new();
    let core = SchedulerCore::new(&NORMAL, 1).unwrap();

    let n = spawn_running(&core, "n", SchedPolicy::Normal);
    core.scheduler_tick(CPU, TICK_NS).unwrap();
    assert!(!core.need_resched(CPU));

    core.set_policy(n, SchedPolicy::OtherRr).unwrap();
    let stats = core.task_stats(n).unwrap();
    assert_eq!(stats.policy, SchedPolicy::OtherRr);
    assert!(stats.need_resched);
    assert_eq!(stats.se.exec_start, TICK_NS);
    assert_eq!(stats.time_slice, 10);
    assert_eq!(core.queued(CPU), vec![n]);

    assert_eq!(core.schedule(CPU), Ok(Some(n)));

    // Accounting starts at the switch, not at the first pick
    core.scheduler_tick(CPU, 3 * TICK_NS).unwrap();
    assert_eq!(core.charged(n), 2 * TICK_NS);
}

#[test]
fn queued_task_switched_to_higher_class_preempts() {
    static NORMAL: NormalClass = NormalClass::new();
    let core = SchedulerCore::new(&NORMAL, 1).unwrap();

    let a = spawn_running(&core, "a", SchedPolicy::OtherRr);
    let b = core.spawn("b", SchedPolicy::OtherRr, CPU).unwrap();
    core.wake_up_new(b, CPU).unwrap();
    assert!(!core.need_resched(CPU));

    core.set_policy(b, SchedPolicy::Normal).unwrap();
    assert!(core.need_resched(CPU));
    assert_eq!(core.queued(CPU), vec![a]);
    assert_eq!(core.schedule(CPU), Ok(Some(b)));
}

#[test]
fn sleeping_task_switched_to_other_rr_wakes_at_the_tail() {
    static NORMAL: NormalClass = NormalClass::new();
    let core = SchedulerCore::new(&NORMAL, 1).unwrap();

    let a = spawn_running(&core, "a", SchedPolicy::OtherRr);
    let n = core.spawn("n", SchedPolicy::Normal, CPU).unwrap();
    core.set_policy(n, SchedPolicy::OtherRr).unwrap();
    core.wake_up(n, CPU).unwrap();
    assert!(!core.need_resched(CPU));
    assert_eq!(core.queued(CPU), vec![a, n]);
}

#[test]
fn sleeping_task_only_changes_policy() {
    static NORMAL: NormalClass = NormalClass::new();
    let core = SchedulerCore::new(&NORMAL, 1).unwrap();

    let n = core.spawn("n", SchedPolicy::Normal, CPU).unwrap();
    core.set_policy(n, SchedPolicy::OtherRr).unwrap();
    core.set_policy(n, SchedPolicy::OtherRr).unwrap();

    let stats = core.task_stats(n).unwrap();
    assert_eq!(stats.policy, SchedPolicy::OtherRr);
    assert!(!stats.on_rq);
    assert!(core.queued(CPU).is_empty());
}

#[test]
fn default_chain_has_no_normal_class() {
    let core = SchedulerCore::new(&OTHER_RR_SCHED_CLASS, 1).unwrap();
    let a = core.spawn("a", SchedPolicy::OtherRr, CPU).unwrap();

    assert_eq!(
        core.set_policy(a, SchedPolicy::Normal),
        Err(SchedError::UnregisteredPolicy(SchedPolicy::Normal))
    );
    assert_eq!(core.task_stats(a).unwrap().policy, SchedPolicy::OtherRr);
}
