/*
 * Scheduler Logging
 *
 * Single test: the logger is process-global.
 */

use cluu_sched_rr::utils::debug::{log_buffer, logger};
use cluu_sched_rr::{CpuId, OTHER_RR_SCHED_CLASS, SchedPolicy, SchedulerCore};
use log::LevelFilter;

#[test]
fn scheduler_events_land_in_the_log_buffer() {
    logger::init(LevelFilter::Debug).unwrap();
    assert!(logger::init(LevelFilter::Trace).is_err());
    assert_eq!(log::max_level(), LevelFilter::Debug);

    let core = SchedulerCore::new(&OTHER_RR_SCHED_CLASS, 1).unwrap();
    let a = core.spawn("logged", SchedPolicy::OtherRr, CpuId::BSP).unwrap();
    core.wake_up_new(a, CpuId::BSP).unwrap();
    core.schedule(CpuId::BSP).unwrap();

    let mut lines = Vec::new();
    let drained = log_buffer::drain(|line| lines.push(line.to_string()));
    assert_eq!(drained, lines.len());
    assert_eq!(log_buffer::buffer_usage(), 0);

    assert!(lines.iter().any(|l| l.starts_with("[INFO] SchedulerCore initialized")));
    assert!(lines.iter().any(|l| l.starts_with("[DEBUG]") && l.contains("'logged'")));
    // Trace records are filtered out at Debug
    assert!(lines.iter().all(|l| !l.starts_with("[TRACE]")));

    // Overflow drops the oldest lines
    for i in 0..log_buffer::LOG_LINES + 5 {
        log::warn!("line {}", i);
    }
    assert_eq!(log_buffer::buffer_usage(), log_buffer::LOG_LINES);
    assert_eq!(log_buffer::dropped(), 5);

    let mut first = None;
    log_buffer::drain(|line| {
        first.get_or_insert_with(|| line.to_string());
    });
    assert_eq!(first.as_deref(), Some("[WARN] line 5"));
}
