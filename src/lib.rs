/*
 * CLUU OTHER_RR Scheduling Class
 *
 * This crate provides the OTHER_RR scheduling class for the CLUU kernel: a
 * round-robin policy with no priority mechanism, plus the scheduler core
 * (mechanism layer) that chains scheduling classes, owns the per-CPU run
 * queues and drives the class on wakeups, ticks and load balancing.
 *
 * Why this is important:
 * - Gives every runnable task the same fixed quantum in strict FIFO order
 * - Keeps accounting exact across rotations (no double-charging)
 * - Lets the cross-CPU balancer pull tasks from a locked remote queue while
 *   the queue changes underneath its cursor
 *
 * The crate is no_std + alloc so it links into the kernel image; under
 * `cargo test` it builds against std so the scheduler can be exercised on
 * the host.
 */

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod scheduler;
pub mod utils;

pub use scheduler::{
    CpuId, IDLE_SCHED_CLASS, IdleSchedClass, KernelSchedCtx, OTHER_RR_SCHED_CLASS,
    OtherRrSchedClass, SchedClass, SchedConfig, SchedError, SchedPolicy, SchedulerCore, TaskId,
};
