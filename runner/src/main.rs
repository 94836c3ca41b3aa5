use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;

use clap::Parser;
use serde::Serialize;

use scheduler_sim::{
    simulate, Algorithm, Alpha, Collector, EventRecord, LogCollector, NullCollector, Process,
    RunStatistics, SimError, SimulationConfig, SimulationReport, Tee, WorkloadConfig,
    WorkloadGenerator, WorkloadSummary,
};

mod report;

/// Compare FCFS, SJF, SRT and RR over one synthetic process set.
#[derive(Parser, Debug)]
#[command(name = "schedsim")]
#[command(about = "CPU scheduling simulator")]
struct Cli {
    /// Number of processes to simulate (at most 260).
    n_processes: usize,

    /// How many of them are CPU-bound; the rest are I/O-bound.
    n_cpu_bound: usize,

    /// Seed of the pseudo-random number generator.
    seed: u32,

    /// Rate of the exponential distribution, 1 / average value.
    lambda: f64,

    /// Upper bound for generated values.
    upper_bound: f64,

    /// Context switch time in ms, positive and even.
    context_switch_time: usize,

    /// Estimate smoothing for SJF and SRT, in [0, 1], or -1 to use real burst times.
    #[arg(allow_negative_numbers = true)]
    alpha: f64,

    /// Round-Robin time slice in ms.
    time_slice: usize,

    /// Put newly ready processes at the head of the Round-Robin queue.
    #[arg(long)]
    rr_alt: bool,

    /// Where the statistics are written.
    #[arg(long, default_value = "simout.txt")]
    output: PathBuf,

    /// Print the statistics as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Skip the per-event log.
    #[arg(long)]
    no_events: bool,
}

impl Cli {
    fn workload(&self) -> WorkloadConfig {
        WorkloadConfig {
            n_processes: self.n_processes,
            n_cpu_bound: self.n_cpu_bound,
            seed: self.seed,
            lambda: self.lambda,
            upper_bound: self.upper_bound,
        }
    }

    fn simulation(&self) -> Result<SimulationConfig, SimError> {
        let config = SimulationConfig::default()
            .with_context_switch(self.context_switch_time)
            .with_alpha(Alpha::new(self.alpha)?)
            .with_lambda(self.lambda)
            .with_time_slice(self.time_slice)
            .with_rr_alt(self.rr_alt);

        config.validate()?;
        Ok(config)
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    workload: &'a WorkloadSummary,
    runs: Vec<&'a RunStatistics>,
}

/// Runs one algorithm, keeping its events unless `keep_events` is off
fn run_algorithm(
    algorithm: Algorithm,
    processes: &[Process],
    config: &SimulationConfig,
    keep_events: bool,
) -> Result<(SimulationReport, Vec<EventRecord>), SimError> {
    let policy = algorithm.policy(config)?;
    let mut events = Vec::new();
    let mut logger = LogCollector;

    let report = if keep_events {
        let mut tee = Tee::new(&mut events, &mut logger);
        simulate(processes, policy.as_ref(), config, &mut tee)?
    } else {
        let mut null = NullCollector;
        let collector: &mut dyn Collector = if log::log_enabled!(log::Level::Debug) {
            &mut logger
        } else {
            &mut null
        };
        simulate(processes, policy.as_ref(), config, collector)?
    };

    Ok((report, events))
}

/// Runs the four algorithms side by side and returns them in report order
fn run_all(
    processes: &[Process],
    config: &SimulationConfig,
    keep_events: bool,
) -> Result<Vec<(SimulationReport, Vec<EventRecord>)>, SimError> {
    thread::scope(|scope| {
        let handles: Vec<_> = Algorithm::ALL
            .iter()
            .map(|&algorithm| {
                scope.spawn(move || run_algorithm(algorithm, processes, config, keep_events))
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect()
    })
}

fn run(cli: &Cli) -> Result<(), SimError> {
    let workload = cli.workload();
    let config = cli.simulation()?;

    let processes = WorkloadGenerator::new(workload)?.generate()?;
    let summary = WorkloadSummary::of(&processes);

    if !cli.json {
        let process_set = report::ProcessSet {
            workload: &workload,
            processes: &processes,
        };
        print!("{}", process_set);
        println!();
        print!("{}", report::format_parameters(&config));
    }

    let runs = run_all(&processes, &config, !cli.no_events && !cli.json)?;

    if !cli.json && !cli.no_events {
        for (_, events) in &runs {
            println!();
            for line in report::render_events(events) {
                println!("{}", line);
            }
        }
    }

    let statistics: Vec<RunStatistics> = runs
        .into_iter()
        .map(|(result, _)| result.statistics)
        .collect();

    let simout = report::Simout {
        workload: &workload,
        summary: &summary,
        runs: &statistics,
    };
    fs::write(&cli.output, simout.to_string())?;
    log::info!("statistics written to {}", cli.output.display());

    if cli.json {
        let json = JsonReport {
            workload: &summary,
            runs: statistics.iter().collect(),
        };
        serde_json::to_writer_pretty(io::stdout().lock(), &json).map_err(io::Error::from)?;
        println!();
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            eprintln!("ERROR: {}", err);
            ExitCode::FAILURE
        }
    }
}
