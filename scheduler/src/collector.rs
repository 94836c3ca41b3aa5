use serde::Serialize;

use crate::common_types::{ProcessId, Timestamp};

/// Something that happened on the simulation clock
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EventKind {
    SimulatorStarted {
        algorithm: &'static str,
    },
    Arrived {
        process: ProcessId,
        tau: Option<usize>,
    },
    IoCompleted {
        process: ProcessId,
        tau: Option<usize>,
    },
    /// The switch-in finished and the process runs
    ///
    /// `remaining` is smaller than `burst` when a partial burst is resumed.
    BurstStarted {
        process: ProcessId,
        tau: Option<usize>,
        remaining: usize,
        burst: usize,
    },
    BurstCompleted {
        process: ProcessId,
        tau: Option<usize>,
        bursts_to_go: usize,
    },
    TauRecalculated {
        process: ProcessId,
        old: usize,
        new: usize,
    },
    SwitchedOut {
        process: ProcessId,
        io_until: Timestamp,
    },
    /// `process` lost the CPU to `by`, which just became ready
    Preempted {
        process: ProcessId,
        by: ProcessId,
        remaining: usize,
        predicted: Option<usize>,
    },
    /// Round-Robin quanta ran out; `requeued` is false when nobody else was waiting
    TimeSliceExpired {
        process: ProcessId,
        remaining: usize,
        requeued: bool,
    },
    Terminated {
        process: ProcessId,
    },
    SimulatorEnded {
        algorithm: &'static str,
    },
}

impl EventKind {
    /// The process the event is about, if any
    pub fn process(&self) -> Option<ProcessId> {
        match self {
            EventKind::SimulatorStarted { .. } | EventKind::SimulatorEnded { .. } => None,
            EventKind::Arrived { process, .. }
            | EventKind::IoCompleted { process, .. }
            | EventKind::BurstStarted { process, .. }
            | EventKind::BurstCompleted { process, .. }
            | EventKind::TauRecalculated { process, .. }
            | EventKind::SwitchedOut { process, .. }
            | EventKind::Preempted { process, .. }
            | EventKind::TimeSliceExpired { process, .. }
            | EventKind::Terminated { process } => Some(*process),
        }
    }
}

/// One timestamped event with the scheduler state right after it
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    pub time: Timestamp,
    pub kind: EventKind,
    /// Ready queue, head first
    pub queue: Vec<ProcessId>,
    /// Process holding the CPU, including one still switching in
    pub cpu: Option<ProcessId>,
}

pub trait Collector {
    /// Receives every event of a run, in clock order
    fn collect(&mut self, record: EventRecord);
}

impl Collector for Vec<EventRecord> {
    fn collect(&mut self, record: EventRecord) {
        self.push(record);
    }
}

/// Drops every event
#[derive(Clone, Copy, Debug, Default)]
pub struct NullCollector;

impl Collector for NullCollector {
    fn collect(&mut self, _record: EventRecord) {}
}

/// Writes every event through the `log` facade at debug level
#[derive(Clone, Copy, Debug, Default)]
pub struct LogCollector;

impl Collector for LogCollector {
    fn collect(&mut self, record: EventRecord) {
        log::debug!(
            "t={} {:?} queue={:?} cpu={:?}",
            record.time.get(),
            record.kind,
            record.queue,
            record.cpu
        );
    }
}

/// Forwards every event to two collectors
pub struct Tee<'a> {
    first: &'a mut dyn Collector,
    second: &'a mut dyn Collector,
}

impl<'a> Tee<'a> {
    pub fn new(first: &'a mut dyn Collector, second: &'a mut dyn Collector) -> Tee<'a> {
        Tee { first, second }
    }
}

impl Collector for Tee<'_> {
    fn collect(&mut self, record: EventRecord) {
        self.first.collect(record.clone());
        self.second.collect(record);
    }
}
