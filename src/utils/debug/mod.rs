/*
 * Debugging and Logging Utilities
 *
 * This module contains utilities for debugging and logging,
 * providing structured logging into a bounded in-memory buffer.
 */

pub mod log_buffer;
pub mod logger;
