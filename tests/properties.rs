/*
 * Property Tests
 *
 * Random operation sequences against SchedulerCore, checking the queue
 * bookkeeping and the accounting after every step; FIFO rotation for any
 * quantum; and the load-balance iterator under a dequeue in mid-pass.
 */

use cluu_sched_rr::scheduler::policies::other_rr::{
    load_balance_next_other_rr, load_balance_start_other_rr,
};
use cluu_sched_rr::scheduler::{
    CpuIdleType, DequeueFlags, EnqueueFlags, IDLE_SCHED_CLASS, KernelSchedCtx, OtherRrSchedClass,
    Rq, SchedClass, SchedConfig, TaskTable,
};
use cluu_sched_rr::{CpuId, OTHER_RR_SCHED_CLASS, SchedPolicy, SchedulerCore, TaskId};
use proptest::prelude::*;

const TICK_NS: u64 = 1_000_000;
const TASKS: usize = 6;

static RR_Q2: OtherRrSchedClass =
    OtherRrSchedClass::new(SchedConfig::with_quantum(2), Some(&IDLE_SCHED_CLASS));

#[derive(Debug, Clone, Copy)]
enum Op {
    Wake(usize, u32),
    Sleep(usize),
    Tick(u32),
    Yield(u32),
    Balance(u32),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => (0..TASKS, 0u32..2).prop_map(|(t, cpu)| Op::Wake(t, cpu)),
        1 => (0..TASKS).prop_map(Op::Sleep),
        3 => (0u32..2).prop_map(Op::Tick),
        1 => (0u32..2).prop_map(Op::Yield),
        1 => (0u32..2).prop_map(Op::Balance),
    ]
}

struct World {
    core: SchedulerCore,
    tids: Vec<TaskId>,
    now: u64,
}

impl World {
    fn new() -> Self {
        let core = SchedulerCore::new(&RR_Q2, 2).unwrap();
        let tids = (0..TASKS)
            .map(|i| {
                core.spawn("prop", SchedPolicy::OtherRr, CpuId((i % 2) as u32))
                    .unwrap()
            })
            .collect();
        Self {
            core,
            tids,
            now: 0,
        }
    }

    fn apply(&mut self, op: Op) {
        match op {
            Op::Wake(t, cpu) => {
                let _ = self.core.wake_up(self.tids[t], CpuId(cpu));
            }
            Op::Sleep(t) => {
                let _ = self.core.sleep(self.tids[t]);
            }
            Op::Tick(cpu) => {
                let cpu = CpuId(cpu);
                self.now += TICK_NS;
                if self.core.scheduler_tick(cpu, self.now).unwrap() {
                    self.core.schedule(cpu).unwrap();
                }
            }
            Op::Yield(cpu) => {
                self.core.yield_now(CpuId(cpu)).unwrap();
                self.core.schedule(CpuId(cpu)).unwrap();
            }
            Op::Balance(cpu) => {
                self.core.rebalance(CpuId(cpu), CpuIdleType::NotIdle).unwrap();
            }
        }
        // Pending wakeups and sleeps take effect
        for cpu in [CpuId(0), CpuId(1)] {
            if self.core.need_resched(cpu) {
                self.core.schedule(cpu).unwrap();
            }
        }
    }

    fn check(&self) -> Result<(), TestCaseError> {
        let mut seen = Vec::new();

        for cpu in [CpuId(0), CpuId(1)] {
            let queued = self.core.queued(cpu);
            prop_assert_eq!(queued.len(), self.core.nr_running(cpu));

            for &tid in &queued {
                let stats = self.core.task_stats(tid).unwrap();
                prop_assert!(stats.on_rq);
                prop_assert_eq!(stats.cpu, cpu);
                prop_assert!(stats.time_slice >= 1 && stats.time_slice <= 2);
            }

            // The running OTHER_RR task is the head of its queue
            let curr = self.core.current(cpu).unwrap();
            if Some(curr) != self.core.idle_task(cpu) {
                prop_assert_eq!(queued.first().copied(), Some(curr));
            }
            seen.extend(queued);
        }

        // No task is queued twice, sleepers are on no queue
        let mut sorted = seen.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(sorted.len(), seen.len());
        for &tid in &self.tids {
            let stats = self.core.task_stats(tid).unwrap();
            prop_assert_eq!(stats.on_rq, seen.contains(&tid));
        }

        let runtime: u64 = self
            .tids
            .iter()
            .map(|&tid| self.core.task_stats(tid).unwrap().se.sum_exec_runtime)
            .sum();
        prop_assert_eq!(runtime, self.core.total_charged());
        Ok(())
    }
}

proptest! {
    #[test]
    fn queues_stay_consistent(ops in prop::collection::vec(arb_op(), 1..120)) {
        let mut world = World::new();
        for op in ops {
            world.apply(op);
            world.check()?;
        }
    }

    #[test]
    fn lone_runnable_task_is_charged_every_tick(ticks in 1u64..60) {
        let core = SchedulerCore::new(&RR_Q2, 1).unwrap();
        let tid = core.spawn("solo", SchedPolicy::OtherRr, CpuId::BSP).unwrap();
        core.wake_up_new(tid, CpuId::BSP).unwrap();
        core.schedule(CpuId::BSP).unwrap();

        for i in 1..=ticks {
            if core.scheduler_tick(CpuId::BSP, i * TICK_NS).unwrap() {
                core.schedule(CpuId::BSP).unwrap();
            }
            prop_assert_eq!(core.current(CpuId::BSP), Some(tid));
        }
        prop_assert_eq!(core.charged(tid), ticks * TICK_NS);
        prop_assert_eq!(core.total_ticks(CpuId::BSP), ticks);
    }
}

/// Context for driving the class directly with nothing running
struct QuietCtx;

impl KernelSchedCtx for QuietCtx {
    fn this_cpu(&self) -> CpuId {
        CpuId::BSP
    }

    fn charge(&mut self, _tid: TaskId, _delta_ns: u64) {}

    fn check_preempt_curr(&mut self, _rq: &mut Rq, _tasks: &mut TaskTable, _tid: TaskId) {}
}

proptest! {
    #[test]
    fn quantum_rotation_is_fifo(quantum in 1u32..6, n in 1usize..6, rounds in 1usize..4) {
        let class: &'static OtherRrSchedClass = Box::leak(Box::new(OtherRrSchedClass::new(
            SchedConfig::with_quantum(quantum),
            Some(&IDLE_SCHED_CLASS),
        )));
        let core = SchedulerCore::new(class, 1).unwrap();
        let tids: Vec<TaskId> = (0..n)
            .map(|_| {
                let tid = core.spawn("fifo", SchedPolicy::OtherRr, CpuId::BSP).unwrap();
                core.wake_up_new(tid, CpuId::BSP).unwrap();
                tid
            })
            .collect();
        core.schedule(CpuId::BSP).unwrap();

        let q = quantum as usize;
        for t in 0..rounds * n * q {
            prop_assert_eq!(core.current(CpuId::BSP), Some(tids[(t / q) % n]));
            if core.scheduler_tick(CpuId::BSP, (t as u64 + 1) * TICK_NS).unwrap() {
                core.schedule(CpuId::BSP).unwrap();
            }
        }
    }

    #[test]
    fn lb_pass_survives_a_dequeue(n in 1usize..12, after in 0usize..12, pick in 0usize..12) {
        let after = after % n + 1;
        let mut rq = Rq::new(CpuId::BSP);
        let mut tasks = TaskTable::new();
        let mut ctx = QuietCtx;
        let class = &OTHER_RR_SCHED_CLASS;

        let order: Vec<TaskId> = (0..n)
            .map(|_| {
                let tid = tasks.insert("lb", SchedPolicy::OtherRr, CpuId::BSP).unwrap();
                class.enqueue_task(&mut rq, &mut tasks, &mut ctx, tid, EnqueueFlags::WAKEUP);
                tid
            })
            .collect();
        let victim = order[pick % n];

        // Tail first; the victim is dequeued once `after` tasks were returned
        let tail_first: Vec<TaskId> = order.iter().rev().copied().collect();
        let expected: Vec<TaskId> = tail_first
            .iter()
            .enumerate()
            .filter(|&(i, &tid)| tid != victim || i < after)
            .map(|(_, &tid)| tid)
            .collect();

        let mut visited = Vec::new();
        let mut next = load_balance_start_other_rr(&mut rq, &tasks);
        while let Some(tid) = next {
            visited.push(tid);
            if visited.len() == after {
                class.dequeue_task(&mut rq, &mut tasks, &mut ctx, victim, DequeueFlags::MIGRATE);
            }
            next = load_balance_next_other_rr(&mut rq, &tasks);
        }

        prop_assert_eq!(visited, expected);
        prop_assert_eq!(rq.nr_running(), n - 1);
    }
}
