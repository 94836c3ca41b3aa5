//! The discrete-event engine shared by every scheduling policy
//!
//! The clock advances one millisecond at a time. Each tick runs, in order:
//! the end of a pending switch-in, arrivals, I/O completions, the end of the
//! running burst or slice, and finally a dispatch if the CPU is free.

use std::collections::HashSet;

use serde::Serialize;

use crate::collector::{Collector, EventKind, EventRecord};
use crate::common_funcs::next_tau;
use crate::common_types::{ProcessClass, ProcessId, Timestamp};
use crate::process::{Process, ProcessState};
use crate::process_control_block::ProcessControlBlock;
use crate::scheduler_state::{CpuSlot, SchedulerState};
use crate::schedulers::{Preemption, SchedulingPolicy};
use crate::stats::{RunStatistics, StatisticsAccumulator};
use crate::{SimError, SimulationConfig};

/// Why a process entered the ready queue
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ReadyReason {
    Arrival,
    IoCompletion,
}

/// Per-process results of one run
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProcessSummary {
    pub id: ProcessId,
    pub class: ProcessClass,
    pub wait_time: usize,
    pub turnaround_time: usize,
    pub context_switches: usize,
    pub preemptions: usize,
    pub bursts: usize,
}

/// Everything a finished run produces besides its event stream
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulationReport {
    pub statistics: RunStatistics,
    pub processes: Vec<ProcessSummary>,
}

/// One algorithm run over a shared, read-only process set
pub struct Simulator<'a, P: SchedulingPolicy + ?Sized> {
    processes: &'a [Process],
    policy: &'a P,
    half_switch: usize,
    pcbs: Vec<ProcessControlBlock>,
    state: SchedulerState,
    stats: StatisticsAccumulator,
    finished: usize,
}

impl<'a, P: SchedulingPolicy + ?Sized> Simulator<'a, P> {
    /// Prepares a run with fresh run state for every process
    ///
    /// * `processes` - the workload, reused untouched by every run
    /// * `policy` - ordering and preemption rules
    /// * `config` - context switch cost and estimate parameters
    pub fn new(
        processes: &'a [Process],
        policy: &'a P,
        config: &SimulationConfig,
    ) -> Result<Simulator<'a, P>, SimError> {
        config.validate()?;
        policy.check_config(config)?;

        if let Some(weight) = policy.smoothing() {
            if !(0.0..=1.0).contains(&weight) {
                return Err(SimError::Config(format!(
                    "{} smoothing weight must be between 0 and 1, got {}",
                    policy.name(),
                    weight
                )));
            }
        }

        let mut seen = HashSet::new();
        for process in processes {
            if !seen.insert(process.id()) {
                return Err(SimError::Config(format!(
                    "process id {} used more than once",
                    process.id()
                )));
            }
        }

        let tau = config.initial_tau();
        let pcbs = processes
            .iter()
            .enumerate()
            .map(|(slot, process)| ProcessControlBlock::new(slot, process, tau))
            .collect();

        Ok(Simulator {
            processes,
            policy,
            half_switch: config.half_context_switch(),
            pcbs,
            state: SchedulerState::new(policy.discipline()),
            stats: StatisticsAccumulator::new(),
            finished: 0,
        })
    }

    /// Runs until every process terminated
    pub fn run(mut self, collector: &mut dyn Collector) -> Result<SimulationReport, SimError> {
        let total = self.processes.len();
        log::info!("{}: simulating {} processes", self.policy.name(), total);

        self.emit(
            collector,
            EventKind::SimulatorStarted {
                algorithm: self.policy.name(),
            },
        );

        while self.finished < total {
            self.announce_start(collector);
            self.handle_arrivals(collector)?;
            self.handle_io_completions(collector)?;
            self.handle_cpu_burst_end(collector)?;

            if self.finished == total {
                break;
            }

            self.dispatch()?;
            self.state.check_occupancy()?;

            log::trace!(
                "{} t={} queue={:?}",
                self.policy.name(),
                self.state.clock.get(),
                self.state.ready_queue.snapshot()
            );
            self.state.clock = self.state.clock + 1;
        }

        let end_time = self.state.clock + 1;
        self.emit_at(
            collector,
            end_time,
            EventKind::SimulatorEnded {
                algorithm: self.policy.name(),
            },
        );

        let statistics = self
            .stats
            .finish(self.policy.name(), self.state.clock.get(), end_time);
        log::info!(
            "{}: ended at {} with {:.3}% CPU utilization",
            statistics.algorithm,
            statistics.end_time,
            statistics.cpu_utilization
        );

        let processes = self
            .pcbs
            .iter()
            .map(|pcb| ProcessSummary {
                id: pcb.id,
                class: pcb.class,
                wait_time: pcb.wait_time,
                turnaround_time: pcb.turnaround_time.unwrap_or(0),
                context_switches: pcb.context_switches,
                preemptions: pcb.preemptions,
                bursts: pcb.burst_index + 1,
            })
            .collect();

        Ok(SimulationReport {
            statistics,
            processes,
        })
    }

    fn tau_of(&self, slot: usize) -> Option<usize> {
        self.policy.smoothing().map(|_| self.pcbs[slot].tau)
    }

    fn emit(&self, collector: &mut dyn Collector, kind: EventKind) {
        self.emit_at(collector, self.state.clock, kind);
    }

    fn emit_at(&self, collector: &mut dyn Collector, time: Timestamp, kind: EventKind) {
        collector.collect(EventRecord {
            time,
            kind,
            queue: self.state.ready_queue.snapshot(),
            cpu: self.state.occupant().map(|cpu| self.pcbs[cpu.slot].id),
        });
    }

    fn enqueue(&mut self, slot: usize, at_front: bool) {
        let key = self.policy.order_key(&self.pcbs[slot]);
        let id = self.pcbs[slot].id;

        if at_front {
            self.state.ready_queue.push_front(slot, id, key);
        } else {
            self.state.ready_queue.push(slot, id, key);
        }
    }

    /// Reports the start of execution once the switch-in is over
    fn announce_start(&mut self, collector: &mut dyn Collector) {
        let now = self.state.clock;
        let slot = match self.state.occupant_mut() {
            Some(cpu) if !cpu.announced && cpu.started_at == now => {
                cpu.announced = true;
                cpu.slot
            }
            _ => return,
        };

        let pcb = &self.pcbs[slot];
        let kind = EventKind::BurstStarted {
            process: pcb.id,
            tau: self.tau_of(slot),
            remaining: pcb.remaining_burst_time,
            burst: pcb.burst_time,
        };
        self.emit(collector, kind);
    }

    fn handle_arrivals(&mut self, collector: &mut dyn Collector) -> Result<(), SimError> {
        let now = self.state.clock;

        for slot in 0..self.pcbs.len() {
            let pcb = &self.pcbs[slot];
            if pcb.state == ProcessState::Pending && pcb.arrival_time == now {
                self.admit(slot, ReadyReason::Arrival, collector)?;
            }
        }

        Ok(())
    }

    fn handle_io_completions(&mut self, collector: &mut dyn Collector) -> Result<(), SimError> {
        let now = self.state.clock;

        for slot in 0..self.pcbs.len() {
            let pcb = &self.pcbs[slot];
            if pcb.state == ProcessState::Blocked && pcb.io_completion_time == Some(now) {
                self.pcbs[slot].io_completion_time = None;
                self.admit(slot, ReadyReason::IoCompletion, collector)?;
            }
        }

        Ok(())
    }

    /// Makes a process ready, letting it take the CPU if the policy says so
    fn admit(
        &mut self,
        slot: usize,
        reason: ReadyReason,
        collector: &mut dyn Collector,
    ) -> Result<(), SimError> {
        self.pcbs[slot].make_ready(self.state.clock);

        let preemption = self.preemption_check(slot);
        self.enqueue(slot, self.policy.admit_at_front());

        let process = self.pcbs[slot].id;
        let tau = self.tau_of(slot);
        let kind = match reason {
            ReadyReason::Arrival => EventKind::Arrived { process, tau },
            ReadyReason::IoCompletion => EventKind::IoCompleted { process, tau },
        };
        self.emit(collector, kind);

        if let Some((cpu, decision)) = preemption {
            self.preempt(cpu, slot, decision, collector)?;
        }

        Ok(())
    }

    fn preemption_check(&self, incoming: usize) -> Option<(CpuSlot, Preemption)> {
        let cpu = *self.state.occupant()?;
        let running = &self.pcbs[cpu.slot];
        let executed = cpu.executed(self.state.clock);

        // a burst ending on this tick is handled by the completion phase
        if running.remaining_burst_time <= executed {
            return None;
        }

        self.policy
            .should_preempt(&self.pcbs[incoming], running, executed)
            .map(|decision| (cpu, decision))
    }

    /// Takes the running process off the CPU in favour of `by`
    fn preempt(
        &mut self,
        cpu: CpuSlot,
        by: usize,
        decision: Preemption,
        collector: &mut dyn Collector,
    ) -> Result<(), SimError> {
        let now = self.state.clock;
        let executed = cpu.executed(now);

        self.state.release(now + self.half_switch)?;
        self.stats.record_busy(executed);
        self.pcbs[cpu.slot].get_interrupted(executed, decision.predicted, now)?;
        self.enqueue(cpu.slot, false);
        self.stats.record_preemption(self.pcbs[by].class);

        let pcb = &self.pcbs[cpu.slot];
        let kind = EventKind::Preempted {
            process: pcb.id,
            by: self.pcbs[by].id,
            remaining: pcb.remaining_burst_time,
            predicted: decision.predicted,
        };
        self.emit(collector, kind);

        Ok(())
    }

    fn handle_cpu_burst_end(&mut self, collector: &mut dyn Collector) -> Result<(), SimError> {
        let now = self.state.clock;
        let cpu = match self.state.occupant() {
            Some(cpu) if cpu.burst_end() == now => *cpu,
            _ => return Ok(()),
        };

        self.pcbs[cpu.slot].execute(cpu.slice)?;
        self.stats.record_busy(cpu.slice);

        if self.pcbs[cpu.slot].remaining_burst_time > 0 {
            self.expire_time_slice(cpu.slot, collector)
        } else {
            self.complete_burst(cpu.slot, collector)
        }
    }

    /// The slice ran out before the burst did
    fn expire_time_slice(
        &mut self,
        slot: usize,
        collector: &mut dyn Collector,
    ) -> Result<(), SimError> {
        let now = self.state.clock;
        let remaining = self.pcbs[slot].remaining_burst_time;
        let process = self.pcbs[slot].id;

        if self.state.ready_queue.is_empty() {
            let slice = self.policy.dispatch_slice(&self.pcbs[slot]);
            self.state.renew_slice(slice)?;
            self.emit(
                collector,
                EventKind::TimeSliceExpired {
                    process,
                    remaining,
                    requeued: false,
                },
            );
            return Ok(());
        }

        self.state.release(now + self.half_switch)?;
        self.emit(
            collector,
            EventKind::TimeSliceExpired {
                process,
                remaining,
                requeued: true,
            },
        );

        self.pcbs[slot].get_interrupted(0, None, now)?;
        self.stats.record_preemption(self.pcbs[slot].class);
        self.enqueue(slot, false);

        Ok(())
    }

    fn complete_burst(
        &mut self,
        slot: usize,
        collector: &mut dyn Collector,
    ) -> Result<(), SimError> {
        let now = self.state.clock;
        let processes = self.processes;
        let process = &processes[slot];

        self.state.release(now + self.half_switch)?;

        let old_tau = self.tau_of(slot);
        let bursts_to_go = self.pcbs[slot].complete_burst()?;
        self.stats.record_burst(self.pcbs[slot].class);
        self.emit(
            collector,
            EventKind::BurstCompleted {
                process: process.id(),
                tau: old_tau,
                bursts_to_go,
            },
        );

        if let Some(alpha) = self.policy.smoothing() {
            let pcb = &mut self.pcbs[slot];
            let old = pcb.tau;
            pcb.tau = next_tau(alpha, old, pcb.burst_time);
            let new = pcb.tau;
            self.emit(
                collector,
                EventKind::TauRecalculated {
                    process: process.id(),
                    old,
                    new,
                },
            );
        }

        if bursts_to_go > 0 {
            let io_time = process
                .burst(self.pcbs[slot].burst_index)
                .and_then(|burst| burst.io_time)
                .ok_or_else(|| {
                    SimError::invariant(format!(
                        "process {} has bursts to go but no I/O after burst #{}",
                        process.id(),
                        self.pcbs[slot].burst_index
                    ))
                })?;
            let io_until = now + self.half_switch + io_time;

            self.pcbs[slot].block_on_io(process, io_until)?;
            self.emit(
                collector,
                EventKind::SwitchedOut {
                    process: process.id(),
                    io_until,
                },
            );
        } else {
            let turnaround = self.pcbs[slot].terminate(now);
            self.stats
                .record_termination(self.pcbs[slot].class, turnaround);
            self.finished += 1;
            self.emit(
                collector,
                EventKind::Terminated {
                    process: process.id(),
                },
            );
        }

        Ok(())
    }

    fn dispatch(&mut self) -> Result<(), SimError> {
        if !self.state.can_dispatch() {
            return Ok(());
        }

        let now = self.state.clock;
        let slot = self.state.ready_queue.pop_front()?;
        let waited = self.pcbs[slot].dispatch(now);
        self.stats.record_dispatch(self.pcbs[slot].class, waited);

        let slice = self.policy.dispatch_slice(&self.pcbs[slot]);
        if slice == 0 {
            return Err(SimError::invariant(format!(
                "process {} dispatched with nothing to run",
                self.pcbs[slot].id
            )));
        }

        self.state.occupy(CpuSlot {
            slot,
            started_at: now + self.half_switch,
            slice,
            announced: false,
        })
    }
}

/// Runs one policy over `processes` and returns its statistics
///
/// * `processes` - the workload
/// * `policy` - the algorithm to simulate
/// * `config` - context switch cost and estimate parameters
/// * `collector` - receives the event stream
pub fn simulate<P: SchedulingPolicy + ?Sized>(
    processes: &[Process],
    policy: &P,
    config: &SimulationConfig,
    collector: &mut dyn Collector,
) -> Result<SimulationReport, SimError> {
    Simulator::new(processes, policy, config)?.run(collector)
}
