/*
 * Task Management
 *
 * This module defines the Task structure as the scheduler sees it, and the
 * TaskTable arena that owns every task.
 *
 * Run queues never own tasks. A task carries its own run-list link (the
 * prev/next handles of its neighbours), so membership in a queue is a
 * property of the task, as with an intrusive list, but the links are
 * TaskId handles into the table instead of raw pointers.
 */

use alloc::vec::Vec;
use core::fmt;
use core::ops::{Index, IndexMut};

use heapless::String;

use super::error::SchedError;
use super::types::{CpuId, CpuMask, SchedPolicy, TaskFlags, TaskId};

/// Maximum number of tasks
pub const MAX_TASKS: usize = 64;

/// Longest task name kept (longer names are truncated)
pub const TASK_NAME_LEN: usize = 32;

/// Runtime statistics of a task (nanoseconds)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedEntity {
    /// Clock value when the current execution interval started, 0 when not running
    pub exec_start: u64,

    /// Total runtime charged to the task, never decreases
    pub sum_exec_runtime: u64,

    /// Longest single accounting interval seen
    pub exec_max: u64,
}

/// A task's link into a run list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunLink {
    pub(crate) prev: Option<TaskId>,
    pub(crate) next: Option<TaskId>,
    pub(crate) linked: bool,
}

impl RunLink {
    pub fn is_linked(&self) -> bool {
        self.linked
    }
}

/// Task structure
pub struct Task {
    pub id: TaskId,
    pub name: String<TASK_NAME_LEN>,
    pub policy: SchedPolicy,

    /// CPU whose run queue the task was last assigned to
    pub cpu: CpuId,
    pub cpus_allowed: CpuMask,

    /// Ticks left in the current quantum
    pub time_slice: u32,

    pub se: SchedEntity,
    pub(crate) run_list: RunLink,

    /// Runnable and accounted on a run queue (stays set while running)
    pub on_rq: bool,

    /// Executing on `cpu` right now, until the next switch away
    pub on_cpu: bool,

    pub flags: TaskFlags,
}

impl Task {
    pub fn new(id: TaskId, name: &str, policy: SchedPolicy, cpu: CpuId) -> Self {
        let mut short = String::new();
        for ch in name.chars() {
            if short.push(ch).is_err() {
                break;
            }
        }

        Self {
            id,
            name: short,
            policy,
            cpu,
            cpus_allowed: CpuMask::ALL,
            time_slice: 0,
            se: SchedEntity::default(),
            run_list: RunLink::default(),
            on_rq: false,
            on_cpu: false,
            flags: TaskFlags::empty(),
        }
    }

    pub fn run_link(&self) -> &RunLink {
        &self.run_list
    }

    pub fn set_need_resched(&mut self) {
        self.flags.insert(TaskFlags::NEED_RESCHED);
    }

    pub fn clear_need_resched(&mut self) {
        self.flags.remove(TaskFlags::NEED_RESCHED);
    }

    pub fn need_resched(&self) -> bool {
        self.flags.contains(TaskFlags::NEED_RESCHED)
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("name", &self.name.as_str())
            .field("policy", &self.policy)
            .field("cpu", &self.cpu)
            .field("time_slice", &self.time_slice)
            .field("on_rq", &self.on_rq)
            .finish()
    }
}

// ================================================================================================
// TASK TABLE
// ================================================================================================

/// Arena of all tasks, indexed by TaskId
///
/// Freed slots are reused, so a TaskId is only meaningful while the task
/// is alive. Indexing with a dead TaskId is a caller bug and panics.
pub struct TaskTable {
    slots: Vec<Option<Task>>,
    live: usize,
}

impl TaskTable {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            live: 0,
        }
    }

    /// Create a task in the first free slot
    pub fn insert(
        &mut self,
        name: &str,
        policy: SchedPolicy,
        cpu: CpuId,
    ) -> Result<TaskId, SchedError> {
        let index = match self.slots.iter().position(Option::is_none) {
            Some(index) => index,
            None if self.slots.len() < MAX_TASKS => {
                self.slots.push(None);
                self.slots.len() - 1
            }
            None => return Err(SchedError::TableFull),
        };

        let tid = TaskId(index);
        self.slots[index] = Some(Task::new(tid, name, policy, cpu));
        self.live += 1;
        Ok(tid)
    }

    /// Remove a task, freeing its slot
    ///
    /// The caller must have taken the task off its run queue first.
    pub fn remove(&mut self, tid: TaskId) -> Result<Task, SchedError> {
        let task = self
            .slots
            .get_mut(tid.0)
            .and_then(Option::take)
            .ok_or(SchedError::NoSuchTask(tid))?;
        debug_assert!(!task.run_list.linked, "{} freed while linked", tid);
        self.live -= 1;
        Ok(task)
    }

    pub fn get(&self, tid: TaskId) -> Option<&Task> {
        self.slots.get(tid.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, tid: TaskId) -> Option<&mut Task> {
        self.slots.get_mut(tid.0).and_then(Option::as_mut)
    }

    pub fn contains(&self, tid: TaskId) -> bool {
        self.get(tid).is_some()
    }

    /// Number of live tasks
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }
}

impl Default for TaskTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<TaskId> for TaskTable {
    type Output = Task;

    fn index(&self, tid: TaskId) -> &Task {
        match self.get(tid) {
            Some(task) => task,
            None => panic!("stale {}", tid),
        }
    }
}

impl IndexMut<TaskId> for TaskTable {
    fn index_mut(&mut self, tid: TaskId) -> &mut Task {
        match self.get_mut(tid) {
            Some(task) => task,
            None => panic!("stale {}", tid),
        }
    }
}
