use serde::{Deserialize, Serialize};

use crate::common_funcs::initial_tau;
use crate::common_types::{Alpha, MAX_PROCESSES};
use crate::SimError;

/// Parameters shared by the four algorithm runs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Full cost of a context switch; half is charged on the way out, half on the way in
    pub context_switch_time: usize,
    /// Smoothing factor for SJF and SRT estimates
    pub alpha: Alpha,
    /// Rate of the exponential distribution; seeds the first estimate
    pub lambda: f64,
    /// Round-Robin time quanta
    pub time_slice: usize,
    /// Round-Robin variant: newly ready processes join the head of the queue
    pub rr_alt: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            context_switch_time: 4,
            alpha: Alpha::Smoothed(0.5),
            lambda: 0.01,
            time_slice: 128,
            rr_alt: false,
        }
    }
}

impl SimulationConfig {
    pub fn with_context_switch(mut self, time: usize) -> Self {
        self.context_switch_time = time;
        self
    }

    pub fn with_alpha(mut self, alpha: Alpha) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    pub fn with_time_slice(mut self, time_slice: usize) -> Self {
        self.time_slice = time_slice;
        self
    }

    pub fn with_rr_alt(mut self, rr_alt: bool) -> Self {
        self.rr_alt = rr_alt;
        self
    }

    /// Checks every parameter the engine relies on
    pub fn validate(&self) -> Result<(), SimError> {
        if self.context_switch_time == 0 || self.context_switch_time % 2 != 0 {
            return Err(SimError::Config(format!(
                "context switch time must be a positive even number, got {}",
                self.context_switch_time
            )));
        }

        self.alpha.validate()?;

        if !self.lambda.is_finite() || self.lambda <= 0.0 {
            return Err(SimError::Config(format!(
                "lambda must be positive, got {}",
                self.lambda
            )));
        }

        if self.time_slice == 0 {
            return Err(SimError::Config("time slice must be positive".to_string()));
        }

        Ok(())
    }

    pub fn half_context_switch(&self) -> usize {
        self.context_switch_time / 2
    }

    pub fn initial_tau(&self) -> usize {
        initial_tau(self.lambda)
    }
}

/// Parameters of the synthetic workload
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkloadConfig {
    pub n_processes: usize,
    /// The first `n_cpu_bound` processes are CPU-bound, the rest I/O-bound
    pub n_cpu_bound: usize,
    pub seed: u32,
    pub lambda: f64,
    /// Exponential samples above this bound are redrawn
    pub upper_bound: f64,
}

impl WorkloadConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        if self.n_processes == 0 || self.n_processes > MAX_PROCESSES {
            return Err(SimError::Config(format!(
                "number of processes must be between 1 and {}, got {}",
                MAX_PROCESSES, self.n_processes
            )));
        }

        if self.n_cpu_bound > self.n_processes {
            return Err(SimError::Config(format!(
                "{} CPU-bound processes requested out of {}",
                self.n_cpu_bound, self.n_processes
            )));
        }

        if !self.lambda.is_finite() || self.lambda <= 0.0 {
            return Err(SimError::Config(format!(
                "lambda must be positive, got {}",
                self.lambda
            )));
        }

        if !self.upper_bound.is_finite() || self.upper_bound <= 0.0 {
            return Err(SimError::Config(format!(
                "upper bound must be positive, got {}",
                self.upper_bound
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_odd_or_zero_context_switch() {
        let config = SimulationConfig::default();

        assert!(config.with_context_switch(3).validate().is_err());
        assert!(config.with_context_switch(0).validate().is_err());
    }

    #[test]
    fn rejects_bad_alpha_lambda_and_slice() {
        let config = SimulationConfig::default();

        assert!(config.with_alpha(Alpha::Smoothed(1.5)).validate().is_err());
        assert!(config.with_lambda(0.0).validate().is_err());
        assert!(config.with_lambda(f64::INFINITY).validate().is_err());
        assert!(config.with_time_slice(0).validate().is_err());
    }

    #[test]
    fn workload_limits() {
        let config = WorkloadConfig {
            n_processes: 4,
            n_cpu_bound: 1,
            seed: 2,
            lambda: 0.01,
            upper_bound: 256.0,
        };
        assert!(config.validate().is_ok());

        assert!(WorkloadConfig { n_cpu_bound: 5, ..config }.validate().is_err());
        assert!(WorkloadConfig { n_processes: 0, n_cpu_bound: 0, ..config }.validate().is_err());
        assert!(WorkloadConfig { upper_bound: -1.0, ..config }.validate().is_err());
    }
}
