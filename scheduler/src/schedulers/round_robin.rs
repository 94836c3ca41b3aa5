use std::num::NonZeroUsize;

use crate::ready_queue::{QueueDiscipline, SortKey};
use crate::schedulers::SchedulingPolicy;
use crate::{ProcessControlBlock, SimError, SimulationConfig};

/// Round-Robin with a fixed time quanta
///
/// A process whose quanta expires goes to the tail of the queue, unless the
/// queue is empty, in which case it keeps the CPU.
#[derive(Clone, Copy, Debug)]
pub struct RoundRobin {
    quanta: NonZeroUsize,
    /// Newly ready processes are placed at the head instead of the tail
    admit_at_front: bool,
}

impl RoundRobin {
    /// Creates a Round-Robin policy
    ///
    /// * `timeslice` - the time quanta that a process can run before it is preempted
    /// * `rr_alt` - place arrivals and I/O completions at the head of the queue
    pub fn new(timeslice: NonZeroUsize, rr_alt: bool) -> RoundRobin {
        RoundRobin {
            quanta: timeslice,
            admit_at_front: rr_alt,
        }
    }

    pub fn quanta(&self) -> NonZeroUsize {
        self.quanta
    }
}

impl SchedulingPolicy for RoundRobin {
    fn name(&self) -> &'static str {
        "RR"
    }

    fn discipline(&self) -> QueueDiscipline {
        QueueDiscipline::Fifo
    }

    fn order_key(&self, _pcb: &ProcessControlBlock) -> SortKey {
        SortKey::primary(0)
    }

    fn dispatch_slice(&self, pcb: &ProcessControlBlock) -> usize {
        pcb.remaining_burst_time.min(self.quanta.get())
    }

    fn admit_at_front(&self) -> bool {
        self.admit_at_front
    }

    fn check_config(&self, config: &SimulationConfig) -> Result<(), SimError> {
        if self.quanta.get() != config.time_slice {
            return Err(SimError::Config(format!(
                "RR built with a {}ms time slice but the configuration says {}ms",
                self.quanta, config.time_slice
            )));
        }

        if self.admit_at_front != config.rr_alt {
            return Err(SimError::Config(format!(
                "RR built with rr_alt {} but the configuration says {}",
                self.admit_at_front, config.rr_alt
            )));
        }

        Ok(())
    }
}
