use crate::tests::{cpu_process, id, process, run, start_order, starts, summary, termination_time};
use crate::{srt, Alpha, EventKind, SimulationConfig};

fn exact() -> SimulationConfig {
    SimulationConfig::default()
        .with_alpha(Alpha::Actual)
        .with_context_switch(4)
}

#[test]
fn equal_estimates_break_ties_by_id() {
    let processes = [process("B0", 0, &[10], &[]), process("A1", 0, &[10], &[])];
    let config = SimulationConfig::default();

    let (_, events) = run(&processes, &srt(config.alpha).unwrap(), &config);

    assert_eq!(start_order(&events), ["A1", "B0"]);
}

#[test]
fn shorter_arrival_preempts_the_running_burst() {
    let processes = [process("A0", 3, &[10], &[]), process("B0", 8, &[3], &[])];
    let config = exact();

    let (report, events) = run(&processes, &srt(config.alpha).unwrap(), &config);

    let preemption = events
        .iter()
        .find(|r| matches!(r.kind, EventKind::Preempted { .. }))
        .unwrap();
    assert_eq!(preemption.time.get(), 8);
    assert_eq!(
        preemption.kind,
        EventKind::Preempted {
            process: id("A0"),
            by: id("B0"),
            remaining: 7,
            predicted: None,
        }
    );
    assert_eq!(preemption.queue, [id("B0"), id("A0")]);
    assert_eq!(preemption.cpu, None);

    assert_eq!(starts(&events, "A0"), [(5, 10), (19, 7)]);
    assert_eq!(starts(&events, "B0"), [(12, 3)]);
    assert_eq!(termination_time(&events, "B0"), Some(15));
    assert_eq!(termination_time(&events, "A0"), Some(26));

    assert_eq!(summary(&report, "A0").wait_time, 9);
    assert_eq!(summary(&report, "A0").preemptions, 1);
    assert_eq!(summary(&report, "B0").wait_time, 2);

    let stats = &report.statistics;
    assert_eq!(stats.busy_time, 13);
    assert_eq!(stats.cpu_utilization, 50.0);
    assert_eq!(stats.overall.context_switches, 3);
    assert_eq!(stats.io_bound.preemptions, 1);
}

#[test]
fn preemption_is_counted_for_the_preempting_class() {
    let processes = [process("A0", 3, &[10], &[]), cpu_process("B0", 8, &[3], &[])];
    let config = exact();

    let (report, _) = run(&processes, &srt(config.alpha).unwrap(), &config);

    assert_eq!(report.statistics.cpu_bound.preemptions, 1);
    assert_eq!(report.statistics.io_bound.preemptions, 0);
}

#[test]
fn equal_remaining_time_does_not_preempt() {
    let processes = [process("A0", 3, &[10], &[]), process("B0", 8, &[7], &[])];
    let config = exact();

    let (report, _) = run(&processes, &srt(config.alpha).unwrap(), &config);

    assert_eq!(report.statistics.overall.preemptions, 0);
}

#[test]
fn burst_ending_on_the_arrival_tick_is_not_preempted() {
    // A0 runs 5..15; B0 arrives at 15 with a 1ms burst
    let processes = [process("A0", 3, &[10], &[]), process("B0", 15, &[1], &[])];
    let config = exact();

    let (report, events) = run(&processes, &srt(config.alpha).unwrap(), &config);

    assert_eq!(report.statistics.overall.preemptions, 0);
    assert_eq!(termination_time(&events, "A0"), Some(15));
}

#[test]
fn preemption_during_switch_in_skips_the_start() {
    let processes = [process("A0", 3, &[10], &[]), process("B0", 4, &[3], &[])];
    let config = exact();

    let (report, events) = run(&processes, &srt(config.alpha).unwrap(), &config);

    assert_eq!(start_order(&events), ["B0", "A0"]);
    assert_eq!(starts(&events, "A0"), [(15, 10)]);
    assert_eq!(report.statistics.busy_time, 13);
}

#[test]
fn estimated_preemption_reports_the_prediction() {
    // A0 comes back from I/O with tau 51 while A1 is predicted to need 100 - 1
    let processes = [
        process("A0", 0, &[1, 5], &[2]),
        process("A1", 0, &[200], &[]),
    ];
    let config = SimulationConfig::default()
        .with_alpha(Alpha::Smoothed(0.5))
        .with_context_switch(2);

    let (report, events) = run(&processes, &srt(config.alpha).unwrap(), &config);

    let preemption = events
        .iter()
        .find_map(|r| match r.kind {
            EventKind::Preempted {
                process,
                by,
                remaining,
                predicted,
            } => Some((r.time.get(), process, by, remaining, predicted)),
            _ => None,
        })
        .unwrap();
    assert_eq!(preemption, (5, id("A1"), id("A0"), 199, Some(99)));

    assert_eq!(start_order(&events), ["A0", "A1", "A0", "A1"]);
    assert_eq!(starts(&events, "A1"), [(4, 200), (14, 199)]);
    assert_eq!(report.statistics.busy_time, 206);
}
