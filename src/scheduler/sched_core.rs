/*
 * Scheduler Core - Mechanism Layer
 *
 * This module implements SchedulerCore, the stable mechanism layer that:
 * 1. Holds the chain of scheduling classes, highest first
 * 2. Owns the per-CPU run queues, the task table and CPU accounting
 * 3. Provides the stable external API that the rest of the kernel uses
 *    (spawn, wakeup, sleep, exit, tick, schedule, yield, balance)
 * 4. Routes each operation to the class governing the task's policy
 * 5. Implements the generic cross-class preemption check
 *
 * The SchedulerCore separates "mechanism" (locking, class lookup, context
 * switch bookkeeping) from "policy" (which task runs next). Classes never
 * lock anything: every class operation runs with the relevant run queue
 * lock(s) held by this module.
 *
 * Lock order: run queues by ascending CPU id, then the task table, then
 * the accounting table.
 */

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt;

use spin::{Mutex, MutexGuard};

use super::{
    error::SchedError,
    run_queue::Rq,
    task::{SchedEntity, Task, TaskTable},
    traits::{KernelSchedCtx, SchedClass},
    types::{CpuId, CpuIdleType, CpuMask, DequeueFlags, EnqueueFlags, SchedPolicy, SdFlag, TaskId},
};

/// Maximum number of CPUs the core manages
pub const MAX_CPUS: usize = 8;

// ================================================================================================
// CPU ACCOUNTING
// ================================================================================================

/// Runtime charged per task, in nanoseconds
///
/// Stands in for the cgroup CPU accounting controller: classes charge it
/// through `KernelSchedCtx::charge` every time they account runtime.
#[derive(Debug, Default)]
pub struct CpuAcct {
    usage: BTreeMap<TaskId, u64>,
    total: u64,
}

impl CpuAcct {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn charge(&mut self, tid: TaskId, delta_ns: u64) {
        *self.usage.entry(tid).or_insert(0) += delta_ns;
        self.total += delta_ns;
    }

    /// Runtime charged to `tid` so far
    pub fn usage(&self, tid: TaskId) -> u64 {
        self.usage.get(&tid).copied().unwrap_or(0)
    }

    /// Runtime charged to every task, exited ones included
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Drop the per-task entry of an exited task
    pub fn forget(&mut self, tid: TaskId) -> u64 {
        self.usage.remove(&tid).unwrap_or(0)
    }
}

// ================================================================================================
// CLASS CHAIN
// ================================================================================================

/// Find the class governing `policy` and its position in the chain
///
/// Position 0 is the highest class.
fn class_for(
    top: &'static dyn SchedClass,
    policy: SchedPolicy,
) -> Option<(&'static dyn SchedClass, usize)> {
    let mut class = Some(top);
    let mut rank = 0;

    while let Some(c) = class {
        if c.policy() == policy {
            return Some((c, rank));
        }
        class = c.next();
        rank += 1;
    }
    None
}

/// Context handed to the classes for one locked operation
struct CoreCtx<'a> {
    top: &'static dyn SchedClass,
    acct: &'a mut CpuAcct,
    this_cpu: CpuId,
}

impl<'a> CoreCtx<'a> {
    fn new(top: &'static dyn SchedClass, acct: &'a mut CpuAcct, this_cpu: CpuId) -> Self {
        Self {
            top,
            acct,
            this_cpu,
        }
    }
}

impl KernelSchedCtx for CoreCtx<'_> {
    fn this_cpu(&self) -> CpuId {
        self.this_cpu
    }

    fn charge(&mut self, tid: TaskId, delta_ns: u64) {
        self.acct.charge(tid, delta_ns);
    }

    fn check_preempt_curr(&mut self, rq: &mut Rq, tasks: &mut TaskTable, tid: TaskId) {
        let Some(curr) = rq.curr else {
            return;
        };
        let (Some((class, rank)), Some((_, curr_rank))) = (
            class_for(self.top, tasks[tid].policy),
            class_for(self.top, tasks[curr].policy),
        ) else {
            return;
        };

        if rank == curr_rank {
            class.check_preempt_curr(rq, tasks, tid);
        } else if rank < curr_rank {
            tasks[curr].set_need_resched();
        }
    }
}

// ================================================================================================
// SCHEDULER CORE
// ================================================================================================

/// Snapshot of a task's scheduling state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    pub policy: SchedPolicy,
    pub cpu: CpuId,
    pub time_slice: u32,
    pub on_rq: bool,
    pub on_cpu: bool,
    pub need_resched: bool,
    pub se: SchedEntity,
}

/// Scheduler Core - The Mechanism Layer
///
/// This is the stable interface between the rest of the kernel and the
/// scheduling classes. External code calls spawn(), wake_up(),
/// scheduler_tick(), schedule() and so on; SchedulerCore takes the locks,
/// finds the class governing the task and calls into it.
///
/// All methods take `&self`: the core is meant to live in a `static` and
/// be shared by every CPU.
pub struct SchedulerCore {
    /// Highest class of the chain
    top: &'static dyn SchedClass,

    /// One run queue per CPU, indexed by CpuId
    rqs: Vec<Mutex<Rq>>,

    tasks: Mutex<TaskTable>,

    acct: Mutex<CpuAcct>,
}

impl SchedulerCore {
    /// Create a new SchedulerCore over the given class chain
    ///
    /// Every CPU gets a run queue and an idle task, which starts out as the
    /// CPU's current task.
    ///
    /// # Arguments
    /// - `top`: Highest class of the chain (normally `&OTHER_RR_SCHED_CLASS`)
    /// - `cpu_count`: Number of CPUs in the system, 1 to `MAX_CPUS`
    pub fn new(top: &'static dyn SchedClass, cpu_count: usize) -> Result<Self, SchedError> {
        if cpu_count == 0 || cpu_count > MAX_CPUS {
            return Err(SchedError::InvalidCpu(CpuId(
                u32::try_from(cpu_count).unwrap_or(u32::MAX),
            )));
        }

        let mut tasks = TaskTable::new();
        let mut rqs = Vec::with_capacity(cpu_count);

        for i in 0..cpu_count {
            let cpu = CpuId(i as u32);
            let idle = tasks.insert("idle", SchedPolicy::Idle, cpu)?;
            tasks[idle].cpus_allowed = CpuMask::only(cpu);
            tasks[idle].on_cpu = true;

            let mut rq = Rq::new(cpu);
            rq.idle = Some(idle);
            rq.curr = Some(idle);
            rqs.push(Mutex::new(rq));
        }

        log::info!("SchedulerCore initialized with class: {}", top.name());
        log::info!("Managing {} CPU(s)", cpu_count);

        Ok(Self {
            top,
            rqs,
            tasks: Mutex::new(tasks),
            acct: Mutex::new(CpuAcct::new()),
        })
    }

    /// Name of the highest class
    pub fn class_name(&self) -> &'static str {
        self.top.name()
    }

    pub fn cpu_count(&self) -> usize {
        self.rqs.len()
    }

    // ========================================================================
    // INTERNAL HELPERS
    // ========================================================================

    fn rq(&self, cpu: CpuId) -> Result<&Mutex<Rq>, SchedError> {
        self.rqs.get(cpu.as_usize()).ok_or(SchedError::InvalidCpu(cpu))
    }

    fn class(&self, policy: SchedPolicy) -> Result<&'static dyn SchedClass, SchedError> {
        class_for(self.top, policy)
            .map(|(class, _)| class)
            .ok_or(SchedError::UnregisteredPolicy(policy))
    }

    fn task_cpu(&self, tid: TaskId) -> Result<CpuId, SchedError> {
        self.tasks
            .lock()
            .get(tid)
            .map(|task| task.cpu)
            .ok_or(SchedError::NoSuchTask(tid))
    }

    /// CPU for a wakeup whose chosen CPU can't be used
    ///
    /// The previous CPU if the task may still run there, otherwise the
    /// lowest allowed CPU.
    fn fallback_cpu(&self, task: &Task) -> CpuId {
        if self.rq(task.cpu).is_ok() && task.cpus_allowed.contains(task.cpu) {
            return task.cpu;
        }
        (0..self.rqs.len())
            .map(|i| CpuId(i as u32))
            .find(|&cpu| task.cpus_allowed.contains(cpu))
            .unwrap_or(task.cpu)
    }

    /// Lock the run queue `tid` is assigned to
    ///
    /// Retries if the task migrated between the lookup and the lock.
    fn lock_task_rq(&self, tid: TaskId) -> Result<MutexGuard<'_, Rq>, SchedError> {
        loop {
            let cpu = self.task_cpu(tid)?;
            let rq = self.rq(cpu)?.lock();
            if self.task_cpu(tid)? == cpu {
                return Ok(rq);
            }
        }
    }

    // ========================================================================
    // EXTERNAL API - What the rest of the kernel calls
    // ========================================================================

    /// Create a task, not yet runnable
    ///
    /// # Arguments
    /// - `name`: Debug name (truncated to `TASK_NAME_LEN`)
    /// - `policy`: Policy the task is governed by
    /// - `cpu`: Initial CPU assignment
    pub fn spawn(&self, name: &str, policy: SchedPolicy, cpu: CpuId) -> Result<TaskId, SchedError> {
        if policy == SchedPolicy::Idle {
            return Err(SchedError::ReservedPolicy(policy));
        }
        self.rq(cpu)?;

        let tid = self.tasks.lock().insert(name, policy, cpu)?;
        log::debug!("[SchedCore] spawned {} '{}' ({:?}) on {}", tid, name, policy, cpu);
        Ok(tid)
    }

    /// Make a sleeping task runnable
    ///
    /// Returns the CPU whose run queue received the task.
    pub fn wake_up(&self, tid: TaskId, waker_cpu: CpuId) -> Result<CpuId, SchedError> {
        self.try_to_wake_up(tid, waker_cpu, SdFlag::BalanceWake)
    }

    /// First wakeup of a freshly spawned task
    ///
    /// The task is placed on the waker's CPU.
    pub fn wake_up_new(&self, tid: TaskId, waker_cpu: CpuId) -> Result<CpuId, SchedError> {
        self.try_to_wake_up(tid, waker_cpu, SdFlag::BalanceFork)
    }

    fn try_to_wake_up(
        &self,
        tid: TaskId,
        waker_cpu: CpuId,
        sd_flag: SdFlag,
    ) -> Result<CpuId, SchedError> {
        self.rq(waker_cpu)?;

        let (class, selected) = {
            let tasks = self.tasks.lock();
            let task = tasks.get(tid).ok_or(SchedError::NoSuchTask(tid))?;
            if task.on_rq {
                return Err(SchedError::AlreadyQueued(tid));
            }
            let class = self.class(task.policy)?;

            let mut acct = self.acct.lock();
            let mut ctx = CoreCtx::new(self.top, &mut acct, waker_cpu);
            let mut cpu = class.select_task_rq(&tasks, &mut ctx, tid, sd_flag, EnqueueFlags::WAKEUP);

            if self.rq(cpu).is_err() || !task.cpus_allowed.contains(cpu) {
                cpu = self.fallback_cpu(task);
            }
            (class, cpu)
        };

        let mut target = selected;
        loop {
            let mut rq = self.rq(target)?.lock();
            let mut tasks = self.tasks.lock();

            let task = tasks.get(tid).ok_or(SchedError::NoSuchTask(tid))?;
            if task.on_rq {
                return Err(SchedError::AlreadyQueued(tid));
            }
            // Still switching out on its old CPU: it must stay there
            if task.on_cpu && task.cpu != target {
                if !task.cpus_allowed.contains(task.cpu) {
                    return Err(SchedError::TaskRunning(tid));
                }
                target = task.cpu;
                continue;
            }

            let mut acct = self.acct.lock();
            let mut ctx = CoreCtx::new(self.top, &mut acct, waker_cpu);

            tasks[tid].cpu = target;
            class.enqueue_task(&mut rq, &mut tasks, &mut ctx, tid, EnqueueFlags::WAKEUP);
            tasks[tid].on_rq = true;
            ctx.check_preempt_curr(&mut rq, &mut tasks, tid);

            log::debug!("[SchedCore] woke {} on {}", tid, target);
            return Ok(target);
        }
    }

    /// Take a runnable task off its run queue
    ///
    /// A running task keeps running until the next `schedule()` on its CPU,
    /// which is requested here.
    pub fn sleep(&self, tid: TaskId) -> Result<(), SchedError> {
        let mut rq = self.lock_task_rq(tid)?;
        let mut tasks = self.tasks.lock();

        let task = tasks.get(tid).ok_or(SchedError::NoSuchTask(tid))?;
        if !task.on_rq {
            return Err(SchedError::NotQueued(tid));
        }
        let class = self.class(task.policy)?;

        let mut acct = self.acct.lock();
        let mut ctx = CoreCtx::new(self.top, &mut acct, rq.cpu);

        class.dequeue_task(&mut rq, &mut tasks, &mut ctx, tid, DequeueFlags::SLEEP);
        tasks[tid].on_rq = false;

        if rq.curr == Some(tid) {
            tasks[tid].set_need_resched();
        }

        log::debug!("[SchedCore] {} sleeps", tid);
        Ok(())
    }

    /// Remove a task for good
    ///
    /// A task still executing on a CPU can't exit; put it to sleep and
    /// schedule away from it first.
    pub fn exit(&self, tid: TaskId) -> Result<(), SchedError> {
        let mut rq = self.lock_task_rq(tid)?;
        let mut tasks = self.tasks.lock();

        let task = tasks.get(tid).ok_or(SchedError::NoSuchTask(tid))?;
        if task.on_cpu || rq.curr == Some(tid) {
            return Err(SchedError::TaskRunning(tid));
        }
        if task.policy == SchedPolicy::Idle {
            return Err(SchedError::ReservedPolicy(task.policy));
        }

        let mut acct = self.acct.lock();
        if task.on_rq {
            let class = self.class(task.policy)?;
            let mut ctx = CoreCtx::new(self.top, &mut acct, rq.cpu);
            class.dequeue_task(&mut rq, &mut tasks, &mut ctx, tid, DequeueFlags::empty());
        }

        tasks.remove(tid)?;
        let runtime = acct.forget(tid);

        log::debug!("[SchedCore] {} exited after {} ns", tid, runtime);
        Ok(())
    }

    /// Timer tick on `cpu`
    ///
    /// Advances the CPU clock to `now` (nanoseconds) and hands the tick to
    /// the current task's class.
    ///
    /// # Returns
    /// Whether the current task needs to be switched out.
    pub fn scheduler_tick(&self, cpu: CpuId, now: u64) -> Result<bool, SchedError> {
        let mut rq = self.rq(cpu)?.lock();
        let mut tasks = self.tasks.lock();
        let mut acct = self.acct.lock();
        let mut ctx = CoreCtx::new(self.top, &mut acct, cpu);

        rq.update_clock(now);
        rq.nr_ticks += 1;

        let Some(curr) = rq.curr else {
            return Ok(false);
        };
        let queued = tasks[curr].on_rq;
        let class = self.class(tasks[curr].policy)?;
        class.task_tick(&mut rq, &mut tasks, &mut ctx, curr, queued);

        Ok(tasks[curr].need_resched())
    }

    /// Pick the next task to run on `cpu` and make it current
    ///
    /// The previous task is put back to its class first; then classes are
    /// asked in chain order until one has a task.
    ///
    /// # Returns
    /// The new current task, `None` only for a chain without an idle class.
    pub fn schedule(&self, cpu: CpuId) -> Result<Option<TaskId>, SchedError> {
        let mut rq = self.rq(cpu)?.lock();
        let mut tasks = self.tasks.lock();
        let mut acct = self.acct.lock();
        let mut ctx = CoreCtx::new(self.top, &mut acct, cpu);

        let prev = rq.curr;
        if let Some(prev) = prev {
            tasks[prev].clear_need_resched();
            let class = self.class(tasks[prev].policy)?;
            class.put_prev_task(&mut rq, &mut tasks, &mut ctx, prev);
        }

        let mut next = None;
        let mut class = Some(self.top);
        while let Some(c) = class {
            if let Some(tid) = c.pick_next_task(&mut rq, &mut tasks) {
                next = Some(tid);
                break;
            }
            class = c.next();
        }

        if next != prev {
            rq.nr_switches += 1;
            if let Some(prev) = prev {
                tasks[prev].on_cpu = false;
            }
            if let Some(next) = next {
                tasks[next].on_cpu = true;
            }
            log::trace!("[SchedCore] {}: {:?} -> {:?}", cpu, prev, next);
        }
        rq.curr = next;

        Ok(next)
    }

    /// Current task of `cpu` gives up its turn
    pub fn yield_now(&self, cpu: CpuId) -> Result<(), SchedError> {
        let mut rq = self.rq(cpu)?.lock();
        let mut tasks = self.tasks.lock();

        let Some(curr) = rq.curr else {
            return Ok(());
        };
        let class = self.class(tasks[curr].policy)?;
        class.yield_task(&mut rq, &mut tasks);
        tasks[curr].set_need_resched();
        Ok(())
    }

    /// Move a task to another scheduling policy
    ///
    /// The task leaves its old class and joins the new one in the same
    /// state (queued, running, or neither). The new class is then told
    /// about the switch.
    pub fn set_policy(&self, tid: TaskId, policy: SchedPolicy) -> Result<(), SchedError> {
        if policy == SchedPolicy::Idle {
            return Err(SchedError::ReservedPolicy(policy));
        }

        let mut rq = self.lock_task_rq(tid)?;
        let mut tasks = self.tasks.lock();

        let task = tasks.get(tid).ok_or(SchedError::NoSuchTask(tid))?;
        let old_policy = task.policy;
        if old_policy == SchedPolicy::Idle {
            return Err(SchedError::ReservedPolicy(old_policy));
        }
        if old_policy == policy {
            return Ok(());
        }

        let old_class = self.class(old_policy)?;
        let new_class = self.class(policy)?;
        let queued = task.on_rq;
        let running = rq.curr == Some(tid);

        let mut acct = self.acct.lock();
        let mut ctx = CoreCtx::new(self.top, &mut acct, rq.cpu);

        if queued {
            old_class.dequeue_task(&mut rq, &mut tasks, &mut ctx, tid, DequeueFlags::empty());
        }
        if running {
            old_class.put_prev_task(&mut rq, &mut tasks, &mut ctx, tid);
        }

        tasks[tid].policy = policy;

        if running {
            new_class.set_curr_task(&mut rq, &mut tasks);
        }
        if queued {
            new_class.enqueue_task(&mut rq, &mut tasks, &mut ctx, tid, EnqueueFlags::empty());
        }
        new_class.switched_to(&mut rq, &mut tasks, &mut ctx, tid, running);

        log::debug!("[SchedCore] {} switched {:?} -> {:?}", tid, old_policy, policy);
        Ok(())
    }

    /// Restrict the CPUs a task may be placed on
    ///
    /// Takes effect at the next wakeup or balance pass; a queued task is
    /// not moved. The mask must allow at least one CPU of this machine.
    pub fn set_cpus_allowed(&self, tid: TaskId, mask: CpuMask) -> Result<(), SchedError> {
        if !(0..self.rqs.len()).any(|i| mask.contains(CpuId(i as u32))) {
            return Err(SchedError::EmptyCpuMask);
        }

        let _rq = self.lock_task_rq(tid)?;
        let mut tasks = self.tasks.lock();
        let task = tasks.get_mut(tid).ok_or(SchedError::NoSuchTask(tid))?;
        task.cpus_allowed = mask;
        Ok(())
    }

    // ========================================================================
    // LOAD BALANCING
    // ========================================================================

    /// Pull up to `max_load_move` load from `busiest` onto `this_cpu`
    ///
    /// Both run queues are locked for the whole pass. Classes are asked in
    /// chain order until enough load has moved.
    pub fn load_balance(
        &self,
        this_cpu: CpuId,
        busiest: CpuId,
        max_load_move: usize,
        idle: CpuIdleType,
    ) -> Result<usize, SchedError> {
        self.with_rq_pair(this_cpu, busiest, |this_rq, busiest_rq, tasks, ctx| {
            let mut moved = 0;
            let mut class = Some(self.top);

            while let Some(c) = class {
                if moved >= max_load_move {
                    break;
                }
                moved += c.load_balance(
                    this_rq,
                    busiest_rq,
                    tasks,
                    ctx,
                    max_load_move - moved,
                    idle,
                );
                class = c.next();
            }
            moved
        })
    }

    /// Pull a single task from `busiest` onto `this_cpu`
    pub fn move_one_task(
        &self,
        this_cpu: CpuId,
        busiest: CpuId,
        idle: CpuIdleType,
    ) -> Result<bool, SchedError> {
        self.with_rq_pair(this_cpu, busiest, |this_rq, busiest_rq, tasks, ctx| {
            let mut class = Some(self.top);

            while let Some(c) = class {
                if c.move_one_task(this_rq, busiest_rq, tasks, ctx, idle) {
                    return true;
                }
                class = c.next();
            }
            false
        })
    }

    /// Even out `this_cpu` against the busiest other CPU
    ///
    /// Pulls half the difference in runnable tasks. A difference of one is
    /// left alone, as moving a task would only swap the heavier side; a
    /// newly idle CPU with nothing queued still takes one task.
    ///
    /// # Returns
    /// The load moved onto `this_cpu`.
    pub fn rebalance(&self, this_cpu: CpuId, idle: CpuIdleType) -> Result<usize, SchedError> {
        let this_load = self.rq(this_cpu)?.lock().nr_running();

        let busiest = (0..self.rqs.len())
            .map(|i| CpuId(i as u32))
            .filter(|&cpu| cpu != this_cpu)
            .map(|cpu| (cpu, self.nr_running(cpu)))
            .max_by_key(|&(_, load)| load);

        let Some((busiest, busiest_load)) = busiest else {
            return Ok(0);
        };
        if busiest_load <= this_load {
            return Ok(0);
        }

        let diff = busiest_load - this_load;
        let starving = idle == CpuIdleType::NewlyIdle && this_load == 0;
        if diff < 2 && !starving {
            return Ok(0);
        }

        let imbalance = (diff / 2).max(1);
        self.load_balance(this_cpu, busiest, imbalance, idle)
    }

    /// Lock two distinct run queues in CPU order and run `f` on them
    fn with_rq_pair<R: Default>(
        &self,
        this_cpu: CpuId,
        busiest: CpuId,
        f: impl FnOnce(&mut Rq, &mut Rq, &mut TaskTable, &mut dyn KernelSchedCtx) -> R,
    ) -> Result<R, SchedError> {
        let this_lock = self.rq(this_cpu)?;
        let busiest_lock = self.rq(busiest)?;
        if this_cpu == busiest {
            return Ok(R::default());
        }

        let (mut first, mut second) = if this_cpu < busiest {
            (this_lock.lock(), busiest_lock.lock())
        } else {
            let busiest_guard = busiest_lock.lock();
            (this_lock.lock(), busiest_guard)
        };
        let mut tasks = self.tasks.lock();
        let mut acct = self.acct.lock();
        let mut ctx = CoreCtx::new(self.top, &mut acct, this_cpu);

        Ok(f(&mut *first, &mut *second, &mut *tasks, &mut ctx))
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Task currently running on `cpu`
    pub fn current(&self, cpu: CpuId) -> Option<TaskId> {
        self.rq(cpu).ok()?.lock().curr
    }

    /// The idle task of `cpu`
    pub fn idle_task(&self, cpu: CpuId) -> Option<TaskId> {
        self.rq(cpu).ok()?.lock().idle
    }

    /// Does the current task of `cpu` need to be switched out?
    pub fn need_resched(&self, cpu: CpuId) -> bool {
        let Ok(rq) = self.rq(cpu) else {
            return false;
        };
        let rq = rq.lock();
        let tasks = self.tasks.lock();
        rq.curr
            .and_then(|curr| tasks.get(curr))
            .is_some_and(|task| task.need_resched())
    }

    /// Runnable tasks queued on `cpu`, the running one included
    pub fn nr_running(&self, cpu: CpuId) -> usize {
        self.rq(cpu).map(|rq| rq.lock().nr_running()).unwrap_or(0)
    }

    /// OTHER_RR queue of `cpu`, head first
    pub fn queued(&self, cpu: CpuId) -> Vec<TaskId> {
        let Ok(rq) = self.rq(cpu) else {
            return Vec::new();
        };
        let rq = rq.lock();
        let tasks = self.tasks.lock();
        rq.other_rr.queued(&tasks).collect()
    }

    pub fn task_stats(&self, tid: TaskId) -> Option<TaskStats> {
        let tasks = self.tasks.lock();
        let task = tasks.get(tid)?;
        Some(TaskStats {
            policy: task.policy,
            cpu: task.cpu,
            time_slice: task.time_slice,
            on_rq: task.on_rq,
            on_cpu: task.on_cpu,
            need_resched: task.need_resched(),
            se: task.se,
        })
    }

    /// Runtime charged to `tid` by the accounting table
    pub fn charged(&self, tid: TaskId) -> u64 {
        self.acct.lock().usage(tid)
    }

    /// Runtime charged to all tasks
    pub fn total_charged(&self) -> u64 {
        self.acct.lock().total()
    }

    pub fn context_switches(&self, cpu: CpuId) -> u64 {
        self.rq(cpu).map(|rq| rq.lock().nr_switches).unwrap_or(0)
    }

    pub fn total_ticks(&self, cpu: CpuId) -> u64 {
        self.rq(cpu).map(|rq| rq.lock().nr_ticks).unwrap_or(0)
    }
}

impl fmt::Debug for SchedulerCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchedulerCore")
            .field("class", &self.top.name())
            .field("cpus", &self.rqs.len())
            .field("tasks", &self.tasks.lock().len())
            .finish()
    }
}
