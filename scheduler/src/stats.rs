use serde::Serialize;

use crate::common_funcs::ratio;
use crate::common_types::{ProcessClass, Timestamp};

/// Running totals for one process class
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ClassTotals {
    /// Processes that terminated
    pub processes: usize,
    pub bursts: usize,
    pub wait_time: usize,
    pub turnaround_time: usize,
    pub context_switches: usize,
    pub preemptions: usize,
}

impl ClassTotals {
    fn merged(&self, other: &ClassTotals) -> ClassTotals {
        ClassTotals {
            processes: self.processes + other.processes,
            bursts: self.bursts + other.bursts,
            wait_time: self.wait_time + other.wait_time,
            turnaround_time: self.turnaround_time + other.turnaround_time,
            context_switches: self.context_switches + other.context_switches,
            preemptions: self.preemptions + other.preemptions,
        }
    }
}

/// Averages and counts for one class, or for all processes
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ClassStatistics {
    pub processes: usize,
    pub average_wait_time: f64,
    pub average_turnaround_time: f64,
    pub context_switches: usize,
    pub preemptions: usize,
}

impl From<&ClassTotals> for ClassStatistics {
    fn from(totals: &ClassTotals) -> Self {
        ClassStatistics {
            processes: totals.processes,
            average_wait_time: ratio(totals.wait_time as f64, totals.processes),
            average_turnaround_time: ratio(totals.turnaround_time as f64, totals.processes),
            context_switches: totals.context_switches,
            preemptions: totals.preemptions,
        }
    }
}

/// Final statistics of one algorithm run
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunStatistics {
    pub algorithm: &'static str,
    /// Time printed in the "simulator ended" line
    pub end_time: Timestamp,
    /// Clock value at the termination tick
    pub elapsed: usize,
    pub busy_time: usize,
    pub cpu_utilization: f64,
    pub cpu_bound: ClassStatistics,
    pub io_bound: ClassStatistics,
    pub overall: ClassStatistics,
}

/// Collects the numbers a run reports
#[derive(Clone, Debug, Default)]
pub struct StatisticsAccumulator {
    busy_time: usize,
    cpu_bound: ClassTotals,
    io_bound: ClassTotals,
}

impl StatisticsAccumulator {
    pub fn new() -> StatisticsAccumulator {
        StatisticsAccumulator::default()
    }

    fn totals_mut(&mut self, class: ProcessClass) -> &mut ClassTotals {
        match class {
            ProcessClass::CpuBound => &mut self.cpu_bound,
            ProcessClass::IoBound => &mut self.io_bound,
        }
    }

    pub fn totals(&self, class: ProcessClass) -> &ClassTotals {
        match class {
            ProcessClass::CpuBound => &self.cpu_bound,
            ProcessClass::IoBound => &self.io_bound,
        }
    }

    /// Counts a context switch and the wait that preceded it
    ///
    /// * `class` - class of the dispatched process
    /// * `waited` - ms spent in the ready queue since it last became ready
    pub fn record_dispatch(&mut self, class: ProcessClass, waited: usize) {
        let totals = self.totals_mut(class);
        totals.context_switches += 1;
        totals.wait_time += waited;
    }

    pub fn record_preemption(&mut self, class: ProcessClass) {
        self.totals_mut(class).preemptions += 1;
    }

    /// Time the CPU spent executing bursts
    pub fn record_busy(&mut self, time: usize) {
        self.busy_time += time;
    }

    pub fn record_burst(&mut self, class: ProcessClass) {
        self.totals_mut(class).bursts += 1;
    }

    pub fn record_termination(&mut self, class: ProcessClass, turnaround: usize) {
        let totals = self.totals_mut(class);
        totals.processes += 1;
        totals.turnaround_time += turnaround;
    }

    pub fn busy_time(&self) -> usize {
        self.busy_time
    }

    /// Computes the final averages
    ///
    /// * `algorithm` - name of the policy that ran
    /// * `elapsed` - clock value when the last process terminated
    /// * `end_time` - time reported as the end of the simulation
    pub fn finish(&self, algorithm: &'static str, elapsed: usize, end_time: Timestamp) -> RunStatistics {
        let overall = self.cpu_bound.merged(&self.io_bound);
        let cpu_utilization = if elapsed == 0 {
            0.0
        } else {
            100.0 * self.busy_time as f64 / elapsed as f64
        };

        RunStatistics {
            algorithm,
            end_time,
            elapsed,
            busy_time: self.busy_time,
            cpu_utilization,
            cpu_bound: ClassStatistics::from(&self.cpu_bound),
            io_bound: ClassStatistics::from(&self.io_bound),
            overall: ClassStatistics::from(&overall),
        }
    }
}
