use crate::common_types::Timestamp;
use crate::ready_queue::{QueueDiscipline, ReadyQueue};
use crate::SimError;

/// The process currently holding the CPU
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CpuSlot {
    /// Index of the process in the process set
    pub slot: usize,
    /// When the switch-in ends and the process starts executing
    pub started_at: Timestamp,
    /// Ms the process may run from `started_at`
    pub slice: usize,
    /// Whether the start of execution was already reported
    pub announced: bool,
}

impl CpuSlot {
    pub fn burst_end(&self) -> Timestamp {
        self.started_at + self.slice
    }

    /// Ms executed by `now`, 0 while still switching in
    pub fn executed(&self, now: Timestamp) -> usize {
        now.since(self.started_at).min(self.slice)
    }
}

/// Everything the engine tracks besides the per-process run state
///
/// Owned by one run; nothing here is shared between runs.
#[derive(Clone, Debug)]
pub struct SchedulerState {
    pub clock: Timestamp,
    pub ready_queue: ReadyQueue,
    cpu: Option<CpuSlot>,
    /// Earliest time a new dispatch may begin
    pub cpu_free_at: Timestamp,
}

impl SchedulerState {
    pub fn new(discipline: QueueDiscipline) -> SchedulerState {
        SchedulerState {
            clock: Timestamp::new(0),
            ready_queue: ReadyQueue::new(discipline),
            cpu: None,
            cpu_free_at: Timestamp::new(0),
        }
    }

    pub fn occupant(&self) -> Option<&CpuSlot> {
        self.cpu.as_ref()
    }

    pub fn occupant_mut(&mut self) -> Option<&mut CpuSlot> {
        self.cpu.as_mut()
    }

    pub fn is_cpu_free(&self) -> bool {
        self.cpu.is_none()
    }

    /// Whether a dispatch may happen on this tick
    pub fn can_dispatch(&self) -> bool {
        self.cpu.is_none() && !self.ready_queue.is_empty() && self.clock >= self.cpu_free_at
    }

    /// Puts a process on the CPU
    pub fn occupy(&mut self, cpu: CpuSlot) -> Result<(), SimError> {
        if let Some(current) = self.cpu {
            return Err(SimError::invariant(format!(
                "dispatch of slot {} while slot {} occupies the CPU",
                cpu.slot, current.slot
            )));
        }

        if self.ready_queue.contains(cpu.slot) {
            return Err(SimError::invariant(format!(
                "slot {} dispatched while still in the ready queue",
                cpu.slot
            )));
        }

        self.cpu = Some(cpu);
        Ok(())
    }

    /// Takes the occupant off the CPU; the next dispatch waits until `free_at`
    pub fn release(&mut self, free_at: Timestamp) -> Result<CpuSlot, SimError> {
        let cpu = self
            .cpu
            .take()
            .ok_or_else(|| SimError::invariant("release of an idle CPU"))?;
        self.cpu_free_at = free_at;

        Ok(cpu)
    }

    /// Gives the occupant a new slice starting now, without a context switch
    pub fn renew_slice(&mut self, slice: usize) -> Result<(), SimError> {
        let now = self.clock;
        let cpu = self
            .cpu
            .as_mut()
            .ok_or_else(|| SimError::invariant("slice renewal on an idle CPU"))?;

        cpu.started_at = now;
        cpu.slice = slice;
        cpu.announced = true;

        Ok(())
    }

    /// Fails when the occupant is also waiting in the ready queue
    pub fn check_occupancy(&self) -> Result<(), SimError> {
        match self.cpu {
            Some(cpu) if self.ready_queue.contains(cpu.slot) => Err(SimError::invariant(format!(
                "slot {} is on the CPU and in the ready queue at {}",
                cpu.slot, self.clock
            ))),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(slot: usize) -> CpuSlot {
        CpuSlot {
            slot,
            started_at: Timestamp::new(2),
            slice: 10,
            announced: false,
        }
    }

    #[test]
    fn executed_time_excludes_switch_in() {
        let cpu = slot(0);

        assert_eq!(cpu.executed(Timestamp::new(1)), 0);
        assert_eq!(cpu.executed(Timestamp::new(5)), 3);
        assert_eq!(cpu.executed(Timestamp::new(40)), 10);
        assert_eq!(cpu.burst_end(), Timestamp::new(12));
    }

    #[test]
    fn double_occupancy_is_rejected() {
        let mut state = SchedulerState::new(QueueDiscipline::Fifo);
        assert!(state.is_cpu_free());

        state.occupy(slot(0)).unwrap();
        assert!(!state.is_cpu_free());
        assert!(matches!(state.occupy(slot(1)), Err(SimError::Invariant(_))));

        let released = state.release(Timestamp::new(7)).unwrap();
        assert_eq!(released.slot, 0);
        assert_eq!(state.cpu_free_at, Timestamp::new(7));
        assert!(state.is_cpu_free());
        assert!(state.release(Timestamp::new(8)).is_err());
    }

    #[test]
    fn occupant_in_queue_is_detected() {
        let mut state = SchedulerState::new(QueueDiscipline::Fifo);

        state.occupy(slot(3)).unwrap();
        state.ready_queue.push(3, "A3".parse().unwrap(), crate::SortKey::primary(0));

        assert!(state.check_occupancy().is_err());
    }
}
