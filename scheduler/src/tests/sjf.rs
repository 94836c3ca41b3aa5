use crate::tests::{process, run, start_order, starts};
use crate::{sjf, Alpha, EventKind, SimulationConfig};

#[test]
fn full_weight_makes_tau_the_last_burst() {
    let processes = [process("A0", 0, &[30, 50, 7], &[10, 10])];
    let config = SimulationConfig::default()
        .with_alpha(Alpha::Smoothed(1.0))
        .with_lambda(0.01);

    let (_, events) = run(&processes, &sjf(config.alpha).unwrap(), &config);

    let recalculated: Vec<(usize, usize)> = events
        .iter()
        .filter_map(|r| match r.kind {
            EventKind::TauRecalculated { old, new, .. } => Some((old, new)),
            _ => None,
        })
        .collect();

    assert_eq!(recalculated, [(100, 30), (30, 50), (50, 7)]);
}

#[test]
fn shortest_actual_burst_goes_first() {
    let processes = [
        process("A0", 0, &[20], &[]),
        process("B0", 1, &[9], &[]),
        process("C0", 2, &[3], &[]),
    ];
    let config = SimulationConfig::default()
        .with_alpha(Alpha::Actual)
        .with_context_switch(2);

    let (report, events) = run(&processes, &sjf(config.alpha).unwrap(), &config);

    assert_eq!(start_order(&events), ["A0", "C0", "B0"]);
    assert_eq!(starts(&events, "C0"), [(23, 3)]);
    assert_eq!(starts(&events, "B0"), [(28, 9)]);
    assert_eq!(report.statistics.elapsed, 37);

    // no estimates are kept when sorting by the real burst
    assert!(events
        .iter()
        .all(|r| !matches!(r.kind, EventKind::TauRecalculated { .. })));
}

#[test]
fn equal_estimates_keep_arrival_order() {
    let processes = [
        process("A0", 0, &[20], &[]),
        process("C0", 1, &[9], &[]),
        process("B0", 2, &[3], &[]),
    ];
    let config = SimulationConfig::default().with_context_switch(2);

    let (_, events) = run(&processes, &sjf(config.alpha).unwrap(), &config);

    assert_eq!(start_order(&events), ["A0", "C0", "B0"]);
}

#[test]
fn sjf_never_preempts() {
    let processes = [process("A0", 0, &[500], &[]), process("B0", 5, &[1], &[])];
    let config = SimulationConfig::default();

    let (report, events) = run(&processes, &sjf(config.alpha).unwrap(), &config);

    assert_eq!(report.statistics.overall.preemptions, 0);
    assert!(events
        .iter()
        .all(|r| !matches!(r.kind, EventKind::Preempted { .. })));
}

#[test]
fn estimates_reorder_the_queue_after_a_short_burst() {
    // A1 comes back from I/O with tau 51 and overtakes B0, still at 100
    let processes = [
        process("A1", 0, &[1, 5], &[2]),
        process("A0", 0, &[40], &[]),
        process("B0", 1, &[5], &[]),
    ];
    let config = SimulationConfig::default()
        .with_alpha(Alpha::Smoothed(0.5))
        .with_context_switch(2);

    let (_, events) = run(&processes, &sjf(config.alpha).unwrap(), &config);

    assert_eq!(start_order(&events), ["A1", "A0", "A1", "B0"]);
    assert_eq!(starts(&events, "A1"), [(1, 1), (46, 5)]);
}
