/*
 * Utility Modules
 *
 * Support code shared by the scheduler that isn't scheduling itself.
 */

pub mod debug;
