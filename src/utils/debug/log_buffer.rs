/*
 * Buffered Logging System
 *
 * This module provides the bounded buffer log records are written into.
 * Scheduler code logs while holding run-queue locks, so writing a record
 * must never block on an output device: records go into a fixed ring of
 * lines and whoever owns the output drains it later.
 *
 * Design:
 * - Fixed number of fixed-size lines (no heap allocations)
 * - Overwrite on overflow (loses the oldest lines)
 * - Lines longer than LOG_LINE_LEN are truncated
 * - The buffer lock is a leaf lock: nothing is locked while holding it
 */

use core::fmt::{self, Write};
use core::sync::atomic::{AtomicUsize, Ordering};

use heapless::{Deque, String};
use spin::Mutex;

/// Lines kept before the oldest is overwritten
pub const LOG_LINES: usize = 128;

/// Longest line kept (longer lines are truncated)
pub const LOG_LINE_LEN: usize = 160;

/// One buffered log line
pub type LogLine = String<LOG_LINE_LEN>;

/// Global log buffer
static LOG_BUFFER: Mutex<Deque<LogLine, LOG_LINES>> = Mutex::new(Deque::new());

/// Lines overwritten before anyone drained them
static DROPPED: AtomicUsize = AtomicUsize::new(0);

/// Writer that stops at the line capacity instead of failing
struct Truncating<'a>(&'a mut LogLine);

impl Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for ch in s.chars() {
            if self.0.push(ch).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Format `args` into a new line at the end of the buffer
///
/// Safe to call with any scheduler lock held.
pub fn write_log(args: fmt::Arguments<'_>) {
    let mut line = LogLine::new();
    // Truncating never fails
    let _ = Truncating(&mut line).write_fmt(args);

    let mut buffer = LOG_BUFFER.lock();
    if buffer.is_full() {
        buffer.pop_front();
        DROPPED.fetch_add(1, Ordering::Relaxed);
    }
    // Can't fail: a slot was just freed if needed
    let _ = buffer.push_back(line);
}

/// Hand every buffered line to `sink`, oldest first, and empty the buffer
///
/// # Returns
/// Number of lines drained.
pub fn drain<F: FnMut(&str)>(mut sink: F) -> usize {
    let mut buffer = LOG_BUFFER.lock();
    let mut drained = 0;

    while let Some(line) = buffer.pop_front() {
        sink(line.as_str());
        drained += 1;
    }
    drained
}

/// Get current buffer usage in lines (for monitoring)
pub fn buffer_usage() -> usize {
    LOG_BUFFER.lock().len()
}

/// Lines lost to overflow since boot
pub fn dropped() -> usize {
    DROPPED.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_lines_are_truncated() {
        let mut line = LogLine::new();
        let long = "x".repeat(LOG_LINE_LEN * 2);
        let _ = Truncating(&mut line).write_str(&long);
        assert_eq!(line.len(), LOG_LINE_LEN);
    }
}
