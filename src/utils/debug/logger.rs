/*
 * Scheduler Logging System
 *
 * This module implements the `log` backend for the scheduler. Records at
 * or above the configured level are formatted as "[LEVEL] message" into
 * the log buffer, from which the kernel drains them to its console.
 *
 * Scheduler code itself only uses the `log` macros, so any other `log`
 * backend works just as well (the host test suite may install its own).
 */

use log::{LevelFilter, Metadata, Record, SetLoggerError};

use super::log_buffer;

/// Logger writing into the log buffer
struct CluuLogger;

impl log::Log for CluuLogger {
    /// Checks if the given log level is enabled.
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    /// Logs the record by appending it to the log buffer.
    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            log_buffer::write_log(format_args!("[{}] {}", record.level(), record.args()));
        }
    }

    /// Nothing to flush: draining is up to the buffer's owner.
    fn flush(&self) {}
}

/// The CluuLogger instance used for logging.
static LOGGER: CluuLogger = CluuLogger;

/// Install the logger and set the maximum level
///
/// # Errors
///
/// Fails if a logger was already installed; the level is left unchanged
/// in that case.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}
