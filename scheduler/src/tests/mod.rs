//! Scenario tests that run the whole engine over small, hand-built process sets

use crate::{
    simulate, EventKind, EventRecord, Process, ProcessId, SchedulingPolicy, SimulationConfig,
    SimulationReport,
};

mod sjf;
mod srt;

pub(crate) fn id(label: &str) -> ProcessId {
    label.parse().unwrap()
}

/// An I/O-bound process
pub(crate) fn process(label: &str, arrival: usize, cpu: &[usize], io: &[usize]) -> Process {
    Process::new(id(label), arrival, false, cpu, io).unwrap()
}

pub(crate) fn cpu_process(label: &str, arrival: usize, cpu: &[usize], io: &[usize]) -> Process {
    Process::new(id(label), arrival, true, cpu, io).unwrap()
}

pub(crate) fn run<P: SchedulingPolicy + ?Sized>(
    processes: &[Process],
    policy: &P,
    config: &SimulationConfig,
) -> (SimulationReport, Vec<EventRecord>) {
    let mut events = Vec::new();
    let report = simulate(processes, policy, config, &mut events).unwrap();

    (report, events)
}

/// Times at which `label` started executing, with the remaining time it started with
pub(crate) fn starts(events: &[EventRecord], label: &str) -> Vec<(usize, usize)> {
    events
        .iter()
        .filter_map(|record| match record.kind {
            EventKind::BurstStarted {
                process, remaining, ..
            } if process == id(label) => Some((record.time.get(), remaining)),
            _ => None,
        })
        .collect()
}

/// Process ids in the order they started executing
pub(crate) fn start_order(events: &[EventRecord]) -> Vec<String> {
    events
        .iter()
        .filter_map(|record| match record.kind {
            EventKind::BurstStarted { process, .. } => Some(process.to_string()),
            _ => None,
        })
        .collect()
}

pub(crate) fn termination_time(events: &[EventRecord], label: &str) -> Option<usize> {
    events.iter().find_map(|record| match record.kind {
        EventKind::Terminated { process } if process == id(label) => Some(record.time.get()),
        _ => None,
    })
}

pub(crate) fn summary<'r>(report: &'r SimulationReport, label: &str) -> &'r crate::ProcessSummary {
    report
        .processes
        .iter()
        .find(|p| p.id == id(label))
        .unwrap()
}
