/*
 * Scheduler Errors
 *
 * Scheduling classes themselves never fail: their callers are trusted and
 * an empty run queue is a normal answer, not an error. The errors here are
 * reported by the mechanism layer (task table, wakeup/sleep paths) and by
 * configuration parsing.
 */

use core::fmt;

use super::types::{CpuId, SchedPolicy, TaskId};

/// Errors reported by the scheduler core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedError {
    /// Task table has no free slot
    TableFull,
    /// Task ID doesn't exist in the table
    NoSuchTask(TaskId),
    /// CPU ID has no run queue
    InvalidCpu(CpuId),
    /// Operation not allowed on the running task
    TaskRunning(TaskId),
    /// Task is not on a run queue
    NotQueued(TaskId),
    /// Task is already on a run queue
    AlreadyQueued(TaskId),
    /// No class in the chain governs this policy
    UnregisteredPolicy(SchedPolicy),
    /// Policy reserved for the per-CPU idle tasks
    ReservedPolicy(SchedPolicy),
    /// Affinity mask allows no CPU of this machine
    EmptyCpuMask,
}

impl fmt::Display for SchedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedError::TableFull => write!(f, "Task table full"),
            SchedError::NoSuchTask(tid) => write!(f, "{} not found", tid),
            SchedError::InvalidCpu(cpu) => write!(f, "{} has no run queue", cpu),
            SchedError::TaskRunning(tid) => write!(f, "{} is running", tid),
            SchedError::NotQueued(tid) => write!(f, "{} is not queued", tid),
            SchedError::AlreadyQueued(tid) => write!(f, "{} is already queued", tid),
            SchedError::UnregisteredPolicy(policy) => {
                write!(f, "No scheduling class for {:?}", policy)
            }
            SchedError::ReservedPolicy(policy) => write!(f, "{:?} policy is reserved", policy),
            SchedError::EmptyCpuMask => write!(f, "CPU mask allows no CPU"),
        }
    }
}

/// Errors reported while parsing scheduler configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `other_rr.<key>` with a key we don't know
    UnknownKey,
    /// Key given without `=value`
    MissingValue,
    /// Value is not a decimal number
    InvalidNumber,
    /// Quantum above `MAX_QUANTUM`
    QuantumTooLarge,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownKey => write!(f, "Unknown other_rr parameter"),
            ConfigError::MissingValue => write!(f, "Missing parameter value"),
            ConfigError::InvalidNumber => write!(f, "Invalid number"),
            ConfigError::QuantumTooLarge => write!(f, "Quantum too large"),
        }
    }
}
