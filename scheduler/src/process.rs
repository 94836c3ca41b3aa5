use serde::{Deserialize, Serialize};

use crate::common_types::{ProcessClass, ProcessId, Timestamp, MAX_BURSTS};
use crate::SimError;

/// One CPU burst and the I/O burst that follows it
///
/// The last burst of a process has no trailing I/O.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Burst {
    pub cpu_time: usize,
    pub io_time: Option<usize>,
}

/// The state of a process within one run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessState {
    /// Arrival time not reached yet
    Pending,
    Ready,
    Running,
    /// Waiting for I/O to finish
    Blocked,
    Terminated,
}

/// Immutable description of one simulated task
///
/// Produced once by the workload generator and shared read-only by every
/// algorithm run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    id: ProcessId,
    arrival_time: Timestamp,
    is_cpu_bound: bool,
    bursts: Vec<Burst>,
}

impl Process {
    /// Creates a new process
    ///
    /// * `id` - unique label of the process
    /// * `arrival_time` - ms at which the process first becomes ready
    /// * `is_cpu_bound` - classification used by the statistics
    /// * `cpu_bursts` - CPU burst lengths, 1 to 32 entries, each positive
    /// * `io_bursts` - I/O burst lengths, exactly one less than `cpu_bursts`
    pub fn new(
        id: ProcessId,
        arrival_time: usize,
        is_cpu_bound: bool,
        cpu_bursts: &[usize],
        io_bursts: &[usize],
    ) -> Result<Process, SimError> {
        if cpu_bursts.is_empty() || cpu_bursts.len() > MAX_BURSTS {
            return Err(SimError::Config(format!(
                "process {} must have between 1 and {} CPU bursts, got {}",
                id,
                MAX_BURSTS,
                cpu_bursts.len()
            )));
        }

        if io_bursts.len() + 1 != cpu_bursts.len() {
            return Err(SimError::Config(format!(
                "process {} has {} CPU bursts but {} I/O bursts",
                id,
                cpu_bursts.len(),
                io_bursts.len()
            )));
        }

        if cpu_bursts.contains(&0) {
            return Err(SimError::Config(format!(
                "process {} has an empty CPU burst",
                id
            )));
        }

        let bursts = cpu_bursts
            .iter()
            .enumerate()
            .map(|(i, &cpu_time)| Burst {
                cpu_time,
                io_time: io_bursts.get(i).copied(),
            })
            .collect();

        Ok(Process {
            id,
            arrival_time: Timestamp::new(arrival_time),
            is_cpu_bound,
            bursts,
        })
    }

    pub fn id(&self) -> ProcessId {
        self.id
    }

    pub fn arrival_time(&self) -> Timestamp {
        self.arrival_time
    }

    pub fn is_cpu_bound(&self) -> bool {
        self.is_cpu_bound
    }

    pub fn class(&self) -> ProcessClass {
        ProcessClass::from_cpu_bound(self.is_cpu_bound)
    }

    pub fn bursts(&self) -> &[Burst] {
        &self.bursts
    }

    pub fn num_bursts(&self) -> usize {
        self.bursts.len()
    }

    pub fn burst(&self, index: usize) -> Option<&Burst> {
        self.bursts.get(index)
    }

    pub fn total_cpu_time(&self) -> usize {
        self.bursts.iter().map(|b| b.cpu_time).sum()
    }

    pub fn total_io_time(&self) -> usize {
        self.bursts.iter().filter_map(|b| b.io_time).sum()
    }
}
