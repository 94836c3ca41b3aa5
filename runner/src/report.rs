use std::fmt;

use scheduler_sim::{
    EventKind, EventRecord, Process, ProcessId, RunStatistics, SimulationConfig, WorkloadConfig,
    WorkloadSummary,
};

/// Events at or after this time are only printed for terminations and the end of the run
pub const DISPLAY_CUTOFF: usize = 10000;

fn queue_suffix(queue: &[ProcessId]) -> String {
    if queue.is_empty() {
        return "[Q empty]".to_string();
    }

    let ids: Vec<String> = queue.iter().map(ProcessId::to_string).collect();
    format!("[Q {}]", ids.join(" "))
}

fn tau_suffix(tau: Option<usize>) -> String {
    tau.map_or_else(String::new, |tau| format!(" (tau {}ms)", tau))
}

fn is_always_shown(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Terminated { .. }
            | EventKind::SimulatorStarted { .. }
            | EventKind::SimulatorEnded { .. }
    )
}

/// Renders one event, or nothing for events that have no text form
pub fn render_event(record: &EventRecord) -> Option<String> {
    let text = match &record.kind {
        EventKind::SimulatorStarted { algorithm } => format!("Simulator started for {}", algorithm),
        EventKind::Arrived { process, tau } => format!(
            "Process {}{} arrived; added to ready queue",
            process,
            tau_suffix(*tau)
        ),
        EventKind::IoCompleted { process, tau } => format!(
            "Process {}{} completed I/O; added to ready queue",
            process,
            tau_suffix(*tau)
        ),
        EventKind::BurstStarted {
            process,
            tau,
            remaining,
            burst,
        } => {
            if remaining < burst {
                format!(
                    "Process {}{} started using the CPU for remaining {}ms of {}ms burst",
                    process,
                    tau_suffix(*tau),
                    remaining,
                    burst
                )
            } else {
                format!(
                    "Process {}{} started using the CPU for {}ms burst",
                    process,
                    tau_suffix(*tau),
                    burst
                )
            }
        }
        EventKind::BurstCompleted { bursts_to_go: 0, .. } => return None,
        EventKind::BurstCompleted {
            process,
            tau,
            bursts_to_go,
        } => format!(
            "Process {}{} completed a CPU burst; {} burst{} to go",
            process,
            tau_suffix(*tau),
            bursts_to_go,
            if *bursts_to_go == 1 { "" } else { "s" }
        ),
        EventKind::TauRecalculated { process, old, new } => format!(
            "Recalculated tau for process {}: old tau {}ms ==> new tau {}ms",
            process, old, new
        ),
        EventKind::SwitchedOut { process, io_until } => format!(
            "Process {} switching out of CPU; blocking on I/O until time {}",
            process, io_until
        ),
        EventKind::Preempted {
            process,
            by,
            remaining,
            ..
        } => format!(
            "Process {} preempted by {} with {}ms remaining",
            process, by, remaining
        ),
        EventKind::TimeSliceExpired {
            process,
            remaining,
            requeued: true,
        } => format!(
            "Time slice expired; process {} preempted with {}ms remaining",
            process, remaining
        ),
        EventKind::TimeSliceExpired { .. } => {
            "Time slice expired; no preemption because ready queue is empty".to_string()
        }
        EventKind::Terminated { process } => format!("Process {} terminated", process),
        EventKind::SimulatorEnded { algorithm } => format!("Simulator ended for {}", algorithm),
    };

    Some(format!(
        "time {}: {} {}",
        record.time,
        text,
        queue_suffix(&record.queue)
    ))
}

/// Renders the arrival or I/O completion that caused a preemption as one line
fn render_preempting(ready: &EventRecord, preempted: &EventRecord) -> Option<String> {
    let (process, tau, what) = match ready.kind {
        EventKind::Arrived { process, tau } => (process, tau, "arrived"),
        EventKind::IoCompleted { process, tau } => (process, tau, "completed I/O"),
        _ => return None,
    };

    let (victim, predicted) = match preempted.kind {
        EventKind::Preempted {
            process: victim,
            by,
            predicted,
            ..
        } if by == process && preempted.time == ready.time => (victim, predicted),
        _ => return None,
    };

    let prediction = predicted.map_or_else(String::new, |time| {
        format!(" (predicted remaining time {}ms)", time)
    });

    Some(format!(
        "time {}: Process {}{} {}; preempting {}{} {}",
        ready.time,
        process,
        tau_suffix(tau),
        what,
        victim,
        prediction,
        queue_suffix(&preempted.queue)
    ))
}

/// Renders the event log of one run, one line per printed event
pub fn render_events(events: &[EventRecord]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut records = events.iter().peekable();

    while let Some(record) = records.next() {
        if record.time.get() >= DISPLAY_CUTOFF && !is_always_shown(&record.kind) {
            continue;
        }

        if let Some(next) = records.peek() {
            if let Some(line) = render_preempting(record, next) {
                lines.push(line);
                records.next();
                continue;
            }
        }

        if let Some(line) = render_event(record) {
            lines.push(line);
        }
    }

    lines
}

/// Header describing the generated process set
pub struct ProcessSet<'a> {
    pub workload: &'a WorkloadConfig,
    pub processes: &'a [Process],
}

impl fmt::Display for ProcessSet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let workload = self.workload;

        writeln!(
            f,
            "<<< -- process set (n={}) with {} CPU-bound process{}",
            workload.n_processes,
            workload.n_cpu_bound,
            if workload.n_cpu_bound == 1 { "" } else { "es" }
        )?;
        writeln!(
            f,
            "<<< -- seed={}; lambda={:.6}; bound={}",
            workload.seed, workload.lambda, workload.upper_bound
        )?;

        for process in self.processes {
            writeln!(f)?;
            writeln!(
                f,
                "{} process {}: arrival time {}; {} CPU burst{}:",
                process.class().label(),
                process.id(),
                process.arrival_time(),
                process.num_bursts(),
                if process.num_bursts() == 1 { "" } else { "s" }
            )?;

            for burst in process.bursts() {
                match burst.io_time {
                    Some(io) => writeln!(f, "==> CPU burst {}ms ==> I/O burst {}ms", burst.cpu_time, io)?,
                    None => writeln!(f, "==> CPU burst {}ms", burst.cpu_time)?,
                }
            }
        }

        Ok(())
    }
}

/// Header printed before the simulations
pub fn format_parameters(config: &SimulationConfig) -> String {
    let alpha = match config.alpha.weight() {
        Some(weight) => format!("{:.2}", weight),
        None => "-1".to_string(),
    };

    format!(
        "<<< PROJECT SIMULATIONS\n<<< -- t_cs={}ms; alpha={}; t_slice={}ms\n",
        config.context_switch_time, alpha, config.time_slice
    )
}

/// Statistics file: the workload summary followed by one block per algorithm
pub struct Simout<'a> {
    pub workload: &'a WorkloadConfig,
    pub summary: &'a WorkloadSummary,
    pub runs: &'a [RunStatistics],
}

impl Simout<'_> {
    fn write_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.summary;

        writeln!(f, "-- number of processes: {}", self.workload.n_processes)?;
        writeln!(f, "-- number of CPU-bound processes: {}", summary.cpu_bound.processes)?;
        writeln!(f, "-- number of I/O-bound processes: {}", summary.io_bound.processes)?;

        let classes = [
            ("CPU-bound", &summary.cpu_bound),
            ("I/O-bound", &summary.io_bound),
            ("overall", &summary.overall),
        ];

        for (label, class) in classes {
            writeln!(f, "-- {} average CPU burst time: {:.3} ms", label, class.average_cpu_burst)?;
        }
        for (label, class) in classes {
            writeln!(f, "-- {} average I/O burst time: {:.3} ms", label, class.average_io_burst)?;
        }

        Ok(())
    }

    fn write_run(f: &mut fmt::Formatter<'_>, stats: &RunStatistics) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "Algorithm {}", stats.algorithm)?;
        writeln!(f, "-- CPU utilization: {:.3}%", stats.cpu_utilization)?;

        let classes = [
            ("CPU-bound", &stats.cpu_bound),
            ("I/O-bound", &stats.io_bound),
            ("overall", &stats.overall),
        ];

        for (label, class) in classes {
            writeln!(f, "-- {} average wait time: {:.3} ms", label, class.average_wait_time)?;
        }
        for (label, class) in classes {
            writeln!(
                f,
                "-- {} average turnaround time: {:.3} ms",
                label, class.average_turnaround_time
            )?;
        }
        for (label, class) in classes {
            writeln!(f, "-- {} number of context switches: {}", label, class.context_switches)?;
        }
        for (label, class) in classes {
            writeln!(f, "-- {} number of preemptions: {}", label, class.preemptions)?;
        }

        Ok(())
    }
}

impl fmt::Display for Simout<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_summary(f)?;

        for stats in self.runs {
            Simout::write_run(f, stats)?;
        }

        Ok(())
    }
}
