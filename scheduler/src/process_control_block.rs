use crate::common_types::{ProcessClass, ProcessId, Timestamp};
use crate::process::{Process, ProcessState};
use crate::SimError;

/// Run state of one process during one algorithm run
///
/// Lives beside the immutable [`Process`] and is thrown away when the run
/// ends, so nothing leaks from one algorithm into the next.
#[derive(Clone, Debug)]
pub struct ProcessControlBlock {
    /// Position of the process in the process set
    pub slot: usize,
    pub id: ProcessId,
    pub class: ProcessClass,
    pub arrival_time: Timestamp,
    pub state: ProcessState,
    /// Which burst is currently or next active
    pub burst_index: usize,
    /// CPU bursts left to execute
    pub bursts_remaining: usize,
    /// Length of the active CPU burst
    pub burst_time: usize,
    /// Ms left in the active CPU burst
    pub remaining_burst_time: usize,
    /// When the pending I/O finishes, if the process is blocked
    pub io_completion_time: Option<Timestamp>,
    /// Estimated length of the next CPU burst
    pub tau: usize,
    /// Estimated time left, captured when the process was preempted
    pub predicted_remaining: Option<usize>,
    /// Set while the process holds a partially executed burst
    pub was_preempted: bool,
    /// When the process last entered the ready queue
    pub ready_since: Timestamp,
    pub wait_time: usize,
    pub turnaround_time: Option<usize>,
    pub context_switches: usize,
    /// Number of times this process was forced off the CPU
    pub preemptions: usize,
}

impl ProcessControlBlock {
    /// Creates a fresh Process Control Block
    ///
    /// * `slot` - index of the process in the process set
    /// * `process` - the immutable description
    /// * `tau` - the initial burst estimate
    pub fn new(slot: usize, process: &Process, tau: usize) -> ProcessControlBlock {
        let burst_time = process.burst(0).map_or(0, |b| b.cpu_time);

        ProcessControlBlock {
            slot,
            id: process.id(),
            class: process.class(),
            arrival_time: process.arrival_time(),
            state: ProcessState::Pending,
            burst_index: 0,
            bursts_remaining: process.num_bursts(),
            burst_time,
            remaining_burst_time: burst_time,
            io_completion_time: None,
            tau,
            predicted_remaining: None,
            was_preempted: false,
            ready_since: process.arrival_time(),
            wait_time: 0,
            turnaround_time: None,
            context_switches: 0,
            preemptions: 0,
        }
    }

    /// Moves the process to the ready state
    pub fn make_ready(&mut self, now: Timestamp) {
        self.state = ProcessState::Ready;
        self.ready_since = now;
    }

    /// Marks the process as dispatched and returns how long it waited
    pub fn dispatch(&mut self, now: Timestamp) -> usize {
        let waited = now.since(self.ready_since);

        self.state = ProcessState::Running;
        self.wait_time += waited;
        self.context_switches += 1;

        waited
    }

    /// Takes `executed` ms off the active burst
    pub fn execute(&mut self, executed: usize) -> Result<(), SimError> {
        self.remaining_burst_time = self
            .remaining_burst_time
            .checked_sub(executed)
            .ok_or_else(|| {
                SimError::invariant(format!(
                    "process {} ran {}ms with only {}ms left in its burst",
                    self.id, executed, self.remaining_burst_time
                ))
            })?;

        Ok(())
    }

    /// Records a forced removal from the CPU
    ///
    /// * `executed` - ms run since the last dispatch
    /// * `predicted` - estimated time left, when the policy uses estimates
    /// * `now` - time of the preemption
    pub fn get_interrupted(
        &mut self,
        executed: usize,
        predicted: Option<usize>,
        now: Timestamp,
    ) -> Result<(), SimError> {
        self.execute(executed)?;

        if self.remaining_burst_time == 0 {
            return Err(SimError::invariant(format!(
                "process {} preempted with nothing left to run",
                self.id
            )));
        }

        self.was_preempted = true;
        self.predicted_remaining = predicted;
        self.preemptions += 1;
        self.make_ready(now);

        Ok(())
    }

    /// Ms of the active burst already executed before the current dispatch
    pub fn elapsed_in_burst(&self) -> usize {
        self.burst_time - self.remaining_burst_time
    }

    /// Finishes the active CPU burst and returns the bursts still to go
    pub fn complete_burst(&mut self) -> Result<usize, SimError> {
        if self.remaining_burst_time != 0 {
            return Err(SimError::invariant(format!(
                "process {} completed a burst with {}ms left",
                self.id, self.remaining_burst_time
            )));
        }

        self.bursts_remaining = self.bursts_remaining.checked_sub(1).ok_or_else(|| {
            SimError::invariant(format!("process {} has no bursts left to complete", self.id))
        })?;
        self.was_preempted = false;
        self.predicted_remaining = None;

        Ok(self.bursts_remaining)
    }

    /// Blocks the process on the I/O that follows its active burst and loads the next one
    ///
    /// * `process` - the immutable description holding the burst lengths
    /// * `until` - when the I/O finishes
    pub fn block_on_io(&mut self, process: &Process, until: Timestamp) -> Result<(), SimError> {
        self.burst_index += 1;

        let next = process.burst(self.burst_index).ok_or_else(|| {
            SimError::invariant(format!(
                "process {} has no CPU burst #{}",
                self.id, self.burst_index
            ))
        })?;

        self.burst_time = next.cpu_time;
        self.remaining_burst_time = next.cpu_time;
        self.io_completion_time = Some(until);
        self.state = ProcessState::Blocked;

        Ok(())
    }

    pub fn terminate(&mut self, now: Timestamp) -> usize {
        let turnaround = now.since(self.arrival_time);

        self.state = ProcessState::Terminated;
        self.turnaround_time = Some(turnaround);

        turnaround
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Process {
        Process::new("B3".parse().unwrap(), 5, false, &[10, 4], &[20]).unwrap()
    }

    #[test]
    fn fresh_block_starts_at_first_burst() {
        let pcb = ProcessControlBlock::new(7, &sample(), 100);

        assert_eq!(pcb.slot, 7);
        assert_eq!(pcb.state, ProcessState::Pending);
        assert_eq!(pcb.bursts_remaining, 2);
        assert_eq!(pcb.remaining_burst_time, 10);
        assert_eq!(pcb.tau, 100);
    }

    #[test]
    fn interruption_keeps_the_partial_burst() {
        let mut pcb = ProcessControlBlock::new(0, &sample(), 100);

        pcb.get_interrupted(3, Some(97), Timestamp::new(12)).unwrap();

        assert!(pcb.was_preempted);
        assert_eq!(pcb.remaining_burst_time, 7);
        assert_eq!(pcb.elapsed_in_burst(), 3);
        assert_eq!(pcb.predicted_remaining, Some(97));
        assert_eq!(pcb.ready_since, Timestamp::new(12));
    }

    #[test]
    fn overrunning_a_burst_is_an_invariant_error() {
        let mut pcb = ProcessControlBlock::new(0, &sample(), 100);

        assert!(matches!(pcb.execute(11), Err(SimError::Invariant(_))));
        assert!(matches!(pcb.complete_burst(), Err(SimError::Invariant(_))));
    }

    #[test]
    fn io_loads_the_next_burst() {
        let process = sample();
        let mut pcb = ProcessControlBlock::new(0, &process, 100);

        pcb.execute(10).unwrap();
        assert_eq!(pcb.complete_burst().unwrap(), 1);
        pcb.block_on_io(&process, Timestamp::new(42)).unwrap();

        assert_eq!(pcb.burst_index, 1);
        assert_eq!(pcb.remaining_burst_time, 4);
        assert_eq!(pcb.io_completion_time, Some(Timestamp::new(42)));
        assert_eq!(pcb.state, ProcessState::Blocked);
    }
}
