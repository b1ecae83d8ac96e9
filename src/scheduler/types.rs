/*
 * Scheduler Type Definitions
 *
 * This module defines the core types used throughout the scheduler subsystem.
 * These types are designed to be lightweight, Copy-able, and suitable for
 * use in both the scheduling classes and the mechanism layer.
 */

use core::fmt;

use bitflags::bitflags;

/// CPU identifier
///
/// Represents a logical CPU core. Each CPU owns exactly one run queue.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CpuId(pub u32);

impl CpuId {
    /// Bootstrap processor (CPU 0)
    pub const BSP: CpuId = CpuId(0);

    /// Get the CPU ID as a usize for indexing
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CpuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CPU{}", self.0)
    }
}

/// Task identifier
///
/// A handle into the [`TaskTable`](super::task::TaskTable). Run-list links
/// store these handles instead of pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub usize);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Task({})", self.0)
    }
}

/// Time slice duration in timer ticks
///
/// With a 100Hz timer (10ms per tick), TimeSliceTicks(1) = 10ms.
/// A zero quantum disables forced rotation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeSliceTicks(pub u32);

impl TimeSliceTicks {
    /// Default time slice (10 ticks = 100ms @ 100Hz)
    pub const DEFAULT: TimeSliceTicks = TimeSliceTicks(10);

    /// Rotation disabled
    pub const DISABLED: TimeSliceTicks = TimeSliceTicks(0);

    /// Get the value as u32
    pub fn get(self) -> u32 {
        self.0
    }

    pub fn is_disabled(self) -> bool {
        self.0 == 0
    }
}

/// Scheduling policy a task is governed by
///
/// Each policy is served by exactly one scheduling class in the chain.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SchedPolicy {
    /// Time-sharing tasks of a class registered ahead of OTHER_RR
    ///
    /// No such class ships in this crate; the dispatcher reports
    /// `SchedError::UnregisteredPolicy` unless the chain provides one.
    Normal,

    /// Round robin without priorities
    OtherRr,

    /// Per-CPU idle task, runs only when nothing else is runnable
    Idle,
}

/// Why a CPU is being selected for a task
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SdFlag {
    /// Cross-CPU load-rebalance wakeup
    BalanceWake,

    /// Newly forked task
    BalanceFork,

    /// Task performing exec
    BalanceExec,
}

/// Idle state of the CPU running the balancer
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CpuIdleType {
    /// CPU is idle
    Idle,

    /// CPU is busy
    NotIdle,

    /// CPU just went idle
    NewlyIdle,
}

bitflags! {
    /// Per-task scheduler flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TaskFlags: u32 {
        /// The dispatcher must reschedule at the next safe point
        const NEED_RESCHED = 1 << 0;
    }
}

bitflags! {
    /// Flags passed to `enqueue_task`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct EnqueueFlags: u32 {
        /// Task is being woken up
        const WAKEUP = 1 << 0;

        /// Task is being migrated in by the balancer
        const MIGRATE = 1 << 1;
    }
}

bitflags! {
    /// Flags passed to `dequeue_task`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DequeueFlags: u32 {
        /// Task is going to sleep
        const SLEEP = 1 << 0;

        /// Task is being migrated out by the balancer
        const MIGRATE = 1 << 1;
    }
}

/// Set of CPUs a task may run on
///
/// Up to 64 CPUs, one bit each.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CpuMask(pub u64);

impl CpuMask {
    /// Every CPU allowed
    pub const ALL: CpuMask = CpuMask(u64::MAX);

    /// Mask allowing a single CPU, empty for a CPU beyond the mask width
    pub fn only(cpu: CpuId) -> Self {
        match 1u64.checked_shl(cpu.0) {
            Some(bit) => CpuMask(bit),
            None => CpuMask(0),
        }
    }

    pub fn contains(self, cpu: CpuId) -> bool {
        cpu.0 < 64 && self.0 & (1u64 << cpu.0) != 0
    }
}

impl Default for CpuMask {
    fn default() -> Self {
        CpuMask::ALL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_mask_membership() {
        let mask = CpuMask::only(CpuId(3));
        assert!(mask.contains(CpuId(3)));
        assert!(!mask.contains(CpuId(2)));
        assert!(!mask.contains(CpuId(64)));
        assert!(CpuMask::ALL.contains(CpuId(63)));
    }

    #[test]
    fn single_cpu_mask_beyond_width_is_empty() {
        assert_eq!(CpuMask::only(CpuId(63)), CpuMask(1 << 63));
        assert_eq!(CpuMask::only(CpuId(64)), CpuMask(0));
        assert!(!CpuMask::only(CpuId(200)).contains(CpuId(200)));
    }

    #[test]
    fn zero_quantum_is_disabled() {
        assert!(TimeSliceTicks::DISABLED.is_disabled());
        assert!(!TimeSliceTicks::DEFAULT.is_disabled());
    }
}
