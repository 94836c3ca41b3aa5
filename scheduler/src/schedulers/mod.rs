//! Scheduling policies
//!
//! Every algorithm runs on the same engine; a policy only decides how the
//! ready queue is ordered, whether a newly ready process takes the CPU from
//! the running one, and how long a dispatched process may run.

use std::num::NonZeroUsize;

use crate::ready_queue::{QueueDiscipline, SortKey};
use crate::{ProcessControlBlock, SimError, SimulationConfig};

mod fcfs;
pub use fcfs::Fcfs;

mod sjf;
pub use sjf::Sjf;

mod srt;
pub use srt::{Srt, SrtVariant};

mod round_robin;
pub use round_robin::RoundRobin;

/// Outcome of a successful preemption check
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Preemption {
    /// Estimated time left for the preempted process, for estimate-driven policies
    pub predicted: Option<usize>,
}

pub trait SchedulingPolicy: Send + Sync {
    /// Name used in reports
    fn name(&self) -> &'static str;

    fn discipline(&self) -> QueueDiscipline;

    /// Key a process is queued with
    fn order_key(&self, pcb: &ProcessControlBlock) -> SortKey;

    /// Decides whether `incoming`, which just became ready, takes the CPU
    ///
    /// * `incoming` - the newly ready process
    /// * `running` - the process on the CPU, with at least 1ms of its burst left
    /// * `executed` - ms `running` has executed since its last dispatch
    fn should_preempt(
        &self,
        _incoming: &ProcessControlBlock,
        _running: &ProcessControlBlock,
        _executed: usize,
    ) -> Option<Preemption> {
        None
    }

    /// How long a dispatched process may run before the engine looks at it again
    fn dispatch_slice(&self, pcb: &ProcessControlBlock) -> usize {
        pcb.remaining_burst_time
    }

    /// Smoothing weight when the policy maintains burst estimates
    fn smoothing(&self) -> Option<f64> {
        None
    }

    /// Whether arrivals and I/O completions jump to the head of the queue
    fn admit_at_front(&self) -> bool {
        false
    }

    /// Rejects a configuration whose alpha or time slice differs from the one
    /// the policy was built with
    fn check_config(&self, _config: &SimulationConfig) -> Result<(), SimError> {
        Ok(())
    }
}

impl<P: SchedulingPolicy + ?Sized> SchedulingPolicy for Box<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn discipline(&self) -> QueueDiscipline {
        (**self).discipline()
    }

    fn order_key(&self, pcb: &ProcessControlBlock) -> SortKey {
        (**self).order_key(pcb)
    }

    fn should_preempt(
        &self,
        incoming: &ProcessControlBlock,
        running: &ProcessControlBlock,
        executed: usize,
    ) -> Option<Preemption> {
        (**self).should_preempt(incoming, running, executed)
    }

    fn dispatch_slice(&self, pcb: &ProcessControlBlock) -> usize {
        (**self).dispatch_slice(pcb)
    }

    fn smoothing(&self) -> Option<f64> {
        (**self).smoothing()
    }

    fn admit_at_front(&self) -> bool {
        (**self).admit_at_front()
    }

    fn check_config(&self, config: &SimulationConfig) -> Result<(), SimError> {
        (**self).check_config(config)
    }
}

/// The four algorithms compared by the simulator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Fcfs,
    Sjf,
    Srt,
    RoundRobin,
}

impl Algorithm {
    /// Report order
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Fcfs,
        Algorithm::Sjf,
        Algorithm::Srt,
        Algorithm::RoundRobin,
    ];

    /// Builds the policy for this algorithm from validated parameters
    pub fn policy(&self, config: &SimulationConfig) -> Result<Box<dyn SchedulingPolicy>, SimError> {
        config.validate()?;

        Ok(match self {
            Algorithm::Fcfs => Box::new(Fcfs),
            Algorithm::Sjf => Box::new(Sjf::new(config.alpha)?),
            Algorithm::Srt => Box::new(Srt::new(config.alpha)?),
            Algorithm::RoundRobin => {
                let time_slice = NonZeroUsize::new(config.time_slice)
                    .ok_or_else(|| SimError::Config("time slice must be positive".to_string()))?;
                Box::new(RoundRobin::new(time_slice, config.rr_alt))
            }
        })
    }
}
