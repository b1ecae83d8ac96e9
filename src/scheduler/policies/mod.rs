/*
 * Scheduling Classes Module
 *
 * This module contains the scheduling class implementations. Each class
 * implements the SchedClass trait and is registered as a static value
 * linked to the next class in the chain.
 *
 * Registered chain (highest first):
 * - OtherRr: round robin, no priorities, fixed quantum
 * - Idle: the per-CPU idle task
 */

pub mod idle;
pub mod other_rr;

pub use idle::{IDLE_SCHED_CLASS, IdleSchedClass};
pub use other_rr::{OTHER_RR_SCHED_CLASS, OtherRrRqIterator, OtherRrSchedClass};
