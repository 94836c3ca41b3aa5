//! A CPU scheduling simulator library.
//!
//! This library provides the process model, the scheduling policies and the
//! discrete-event engine needed to compare First-Come-First-Served,
//! Shortest-Job-First, Shortest-Remaining-Time and Round-Robin over the
//! same synthetic workload.
//!

use std::num::NonZeroUsize;

mod common_types;
pub use crate::common_types::{Alpha, ProcessClass, ProcessId, Timestamp};
pub use crate::common_types::{MAX_BURSTS, MAX_PROCESSES, MIN_TAU};

mod error;
pub use crate::error::SimError;

mod config;
pub use crate::config::{SimulationConfig, WorkloadConfig};

mod common_funcs;
pub use common_funcs::{initial_tau, next_tau};

mod process;
pub use crate::process::{Burst, Process, ProcessState};

mod process_control_block;
pub use process_control_block::ProcessControlBlock;

mod ready_queue;
pub use crate::ready_queue::{QueueDiscipline, ReadyQueue, SortKey};

mod scheduler_state;
pub use crate::scheduler_state::{CpuSlot, SchedulerState};

mod schedulers;
pub use schedulers::{Algorithm, Preemption, SchedulingPolicy};
pub use schedulers::{Fcfs, RoundRobin, Sjf, Srt, SrtVariant};

mod collector;
pub use crate::collector::{Collector, EventKind, EventRecord, LogCollector, NullCollector, Tee};

mod stats;
pub use crate::stats::{ClassStatistics, ClassTotals, RunStatistics, StatisticsAccumulator};

mod simulator;
pub use crate::simulator::{simulate, ProcessSummary, SimulationReport, Simulator};

mod rand48;
pub use crate::rand48::Drand48;

mod workload;
pub use crate::workload::{next_exp, BurstAverages, WorkloadGenerator, WorkloadSummary};

#[cfg(test)]
mod tests;

/// Returns a policy that runs processes in arrival order, without preemption
pub fn fcfs() -> impl SchedulingPolicy {
    Fcfs
}

/// Returns a policy that runs the process with the shortest estimated burst first
///
/// * `alpha` - smoothing weight of the burst estimate; `Alpha::Actual` orders
///             by the real burst length instead
pub fn sjf(alpha: Alpha) -> Result<impl SchedulingPolicy, SimError> {
    Sjf::new(alpha)
}

/// Returns a policy that lets a newly ready process preempt the running one
/// when its burst is expected to finish sooner
///
/// * `alpha` - smoothing weight of the burst estimate; `Alpha::Actual` compares
///             real remaining times instead
pub fn srt(alpha: Alpha) -> Result<impl SchedulingPolicy, SimError> {
    Srt::new(alpha)
}

/// Returns a policy that gives every process the CPU for at most one time quanta
///
/// * `timeslice` - the time quanta that a process can run before it is preempted
/// * `rr_alt` - newly arrived processes and processes back from I/O are put
///              at the head of the ready queue instead of its tail
pub fn round_robin(timeslice: NonZeroUsize, rr_alt: bool) -> impl SchedulingPolicy {
    RoundRobin::new(timeslice, rr_alt)
}
