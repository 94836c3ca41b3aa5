//! Synthetic process sets
//!
//! Arrival times and burst lengths are drawn from a truncated exponential
//! distribution fed by [`Drand48`], so a seed always reproduces the same set.

use serde::Serialize;

use crate::common_funcs::ratio;
use crate::common_types::{ProcessClass, ProcessId, MAX_BURSTS};
use crate::config::WorkloadConfig;
use crate::process::Process;
use crate::rand48::Drand48;
use crate::SimError;

/// CPU bursts of CPU-bound processes are this many times longer
pub const CPU_BOUND_FACTOR: usize = 4;
/// I/O bursts of I/O-bound processes are this many times longer
pub const IO_BOUND_FACTOR: usize = 8;

/// Draws from an exponential distribution, redrawing anything above `upper_bound`
///
/// * `rng` - the uniform source
/// * `lambda` - rate of the distribution
/// * `upper_bound` - largest accepted value
pub fn next_exp(rng: &mut Drand48, lambda: f64, upper_bound: f64) -> f64 {
    loop {
        let value = -rng.next_f64().ln() / lambda;
        if value <= upper_bound {
            return value;
        }
    }
}

pub struct WorkloadGenerator {
    config: WorkloadConfig,
    rng: Drand48,
}

impl WorkloadGenerator {
    pub fn new(config: WorkloadConfig) -> Result<WorkloadGenerator, SimError> {
        config.validate()?;

        Ok(WorkloadGenerator {
            config,
            rng: Drand48::new(config.seed),
        })
    }

    fn next_exp(&mut self) -> f64 {
        next_exp(&mut self.rng, self.config.lambda, self.config.upper_bound)
    }

    /// Builds the whole process set, in id order
    pub fn generate(mut self) -> Result<Vec<Process>, SimError> {
        let mut processes = Vec::with_capacity(self.config.n_processes);

        for index in 0..self.config.n_processes {
            let is_cpu_bound = index < self.config.n_cpu_bound;
            processes.push(self.generate_process(ProcessId::from_index(index)?, is_cpu_bound)?);
        }

        log::info!(
            "generated {} processes ({} CPU-bound) from seed {}",
            processes.len(),
            self.config.n_cpu_bound,
            self.config.seed
        );

        Ok(processes)
    }

    fn generate_process(&mut self, id: ProcessId, is_cpu_bound: bool) -> Result<Process, SimError> {
        let arrival = self.next_exp().floor() as usize;
        let num_bursts = ((self.rng.next_f64() * MAX_BURSTS as f64).ceil() as usize).max(1);

        let mut cpu_bursts = Vec::with_capacity(num_bursts);
        let mut io_bursts = Vec::with_capacity(num_bursts - 1);

        for burst in 0..num_bursts {
            let mut cpu = (self.next_exp().ceil() as usize).max(1);
            if is_cpu_bound {
                cpu *= CPU_BOUND_FACTOR;
            }
            cpu_bursts.push(cpu);

            if burst + 1 < num_bursts {
                let mut io = (self.next_exp().ceil() as usize).max(1);
                if !is_cpu_bound {
                    io *= IO_BOUND_FACTOR;
                }
                io_bursts.push(io);
            }
        }

        log::trace!(
            "{}: arrival {}ms, {} bursts",
            id,
            arrival,
            num_bursts
        );

        Process::new(id, arrival, is_cpu_bound, &cpu_bursts, &io_bursts)
    }
}

/// Burst averages of one class
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct BurstAverages {
    pub processes: usize,
    pub cpu_bursts: usize,
    pub io_bursts: usize,
    pub average_cpu_burst: f64,
    pub average_io_burst: f64,
}

#[derive(Clone, Copy, Debug, Default)]
struct BurstTotals {
    processes: usize,
    cpu_bursts: usize,
    cpu_time: usize,
    io_bursts: usize,
    io_time: usize,
}

impl BurstTotals {
    fn add(&mut self, process: &Process) {
        self.processes += 1;
        self.cpu_bursts += process.num_bursts();
        self.cpu_time += process.total_cpu_time();
        self.io_bursts += process.num_bursts() - 1;
        self.io_time += process.total_io_time();
    }

    fn averages(&self) -> BurstAverages {
        BurstAverages {
            processes: self.processes,
            cpu_bursts: self.cpu_bursts,
            io_bursts: self.io_bursts,
            average_cpu_burst: ratio(self.cpu_time as f64, self.cpu_bursts),
            average_io_burst: ratio(self.io_time as f64, self.io_bursts),
        }
    }
}

/// Shape of a process set, reported ahead of the algorithm statistics
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct WorkloadSummary {
    pub cpu_bound: BurstAverages,
    pub io_bound: BurstAverages,
    pub overall: BurstAverages,
}

impl WorkloadSummary {
    pub fn of(processes: &[Process]) -> WorkloadSummary {
        let mut cpu_bound = BurstTotals::default();
        let mut io_bound = BurstTotals::default();
        let mut overall = BurstTotals::default();

        for process in processes {
            match process.class() {
                ProcessClass::CpuBound => cpu_bound.add(process),
                ProcessClass::IoBound => io_bound.add(process),
            }
            overall.add(process);
        }

        WorkloadSummary {
            cpu_bound: cpu_bound.averages(),
            io_bound: io_bound.averages(),
            overall: overall.averages(),
        }
    }
}
