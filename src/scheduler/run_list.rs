/*
 * Run List
 *
 * A doubly-linked FIFO of tasks whose links live inside the tasks
 * themselves (Task::run_list), addressed by TaskId handles. This gives the
 * operations a scheduling class needs in O(1):
 *
 * - push_back: new arrivals go to the tail
 * - remove: unlink an arbitrary task
 * - move_to_back: rotate a task to the tail without unlinking it from
 *   the queue's point of view
 *
 * and lets a cursor (a TaskId) survive removal of any *other* task.
 *
 * The list does not count its members; the owning run queue keeps the
 * count. All methods assume the caller holds the owning run queue's lock.
 */

use super::task::{RunLink, TaskTable};
use super::types::TaskId;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunList {
    head: Option<TaskId>,
    tail: Option<TaskId>,
}

impl RunList {
    pub const fn new() -> Self {
        Self {
            head: None,
            tail: None,
        }
    }

    pub fn front(&self) -> Option<TaskId> {
        self.head
    }

    pub fn back(&self) -> Option<TaskId> {
        self.tail
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Append a task that is not on any list
    pub fn push_back(&mut self, tasks: &mut TaskTable, tid: TaskId) {
        debug_assert!(!tasks[tid].run_list.linked, "{} already linked", tid);

        tasks[tid].run_list = RunLink {
            prev: self.tail,
            next: None,
            linked: true,
        };
        match self.tail {
            Some(tail) => tasks[tail].run_list.next = Some(tid),
            None => self.head = Some(tid),
        }
        self.tail = Some(tid);
    }

    /// Unlink a task that is on this list
    pub fn remove(&mut self, tasks: &mut TaskTable, tid: TaskId) {
        let link = tasks[tid].run_list;
        debug_assert!(link.linked, "{} not linked", tid);

        match link.prev {
            Some(prev) => tasks[prev].run_list.next = link.next,
            None => self.head = link.next,
        }
        match link.next {
            Some(next) => tasks[next].run_list.prev = link.prev,
            None => self.tail = link.prev,
        }
        tasks[tid].run_list = RunLink::default();
    }

    /// Move a linked task to the tail
    pub fn move_to_back(&mut self, tasks: &mut TaskTable, tid: TaskId) {
        if self.tail == Some(tid) {
            return;
        }
        self.remove(tasks, tid);
        self.push_back(tasks, tid);
    }

    /// Neighbour towards the head
    pub fn prev_of(tasks: &TaskTable, tid: TaskId) -> Option<TaskId> {
        tasks[tid].run_list.prev
    }

    /// Neighbour towards the tail
    pub fn next_of(tasks: &TaskTable, tid: TaskId) -> Option<TaskId> {
        tasks[tid].run_list.next
    }

    /// Walk head to tail
    pub fn iter<'a>(&self, tasks: &'a TaskTable) -> Iter<'a> {
        Iter {
            tasks,
            cursor: self.head,
        }
    }
}

/// Head-to-tail iterator over a run list
pub struct Iter<'a> {
    tasks: &'a TaskTable,
    cursor: Option<TaskId>,
}

impl Iterator for Iter<'_> {
    type Item = TaskId;

    fn next(&mut self) -> Option<TaskId> {
        let tid = self.cursor?;
        self.cursor = RunList::next_of(self.tasks, tid);
        Some(tid)
    }
}
