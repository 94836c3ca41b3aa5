use crate::common_types::Alpha;
use crate::ready_queue::{QueueDiscipline, SortKey};
use crate::schedulers::SchedulingPolicy;
use crate::{ProcessControlBlock, SimError, SimulationConfig};

/// Shortest-Job-First, non-preemptive
///
/// The queue is sorted by the burst estimate, or by the true burst length
/// when estimates are disabled. Equal keys keep their insertion order.
#[derive(Clone, Copy, Debug)]
pub struct Sjf {
    alpha: Alpha,
}

impl Sjf {
    pub fn new(alpha: Alpha) -> Result<Sjf, SimError> {
        alpha.validate()?;
        Ok(Sjf { alpha })
    }
}

impl SchedulingPolicy for Sjf {
    fn name(&self) -> &'static str {
        "SJF"
    }

    fn discipline(&self) -> QueueDiscipline {
        QueueDiscipline::Sorted
    }

    fn order_key(&self, pcb: &ProcessControlBlock) -> SortKey {
        match self.alpha {
            Alpha::Smoothed(_) => SortKey::primary(pcb.tau),
            Alpha::Actual => SortKey::primary(pcb.burst_time),
        }
    }

    fn smoothing(&self) -> Option<f64> {
        self.alpha.weight()
    }

    fn check_config(&self, config: &SimulationConfig) -> Result<(), SimError> {
        if self.alpha != config.alpha {
            return Err(SimError::Config(format!(
                "SJF built with alpha {:?} but the configuration says {:?}",
                self.alpha, config.alpha
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Process;

    #[test]
    fn weight_outside_unit_range_is_rejected() {
        assert!(Sjf::new(Alpha::Smoothed(-3.0)).is_err());
        assert!(Sjf::new(Alpha::Smoothed(1.01)).is_err());
        assert_eq!(Sjf::new(Alpha::Smoothed(0.25)).unwrap().smoothing(), Some(0.25));
        assert_eq!(Sjf::new(Alpha::Actual).unwrap().smoothing(), None);
    }

    #[test]
    fn key_follows_the_alpha_mode() {
        let process = Process::new("A0".parse().unwrap(), 0, false, &[30], &[]).unwrap();
        let pcb = ProcessControlBlock::new(0, &process, 7);

        assert_eq!(Sjf::new(Alpha::Smoothed(0.5)).unwrap().order_key(&pcb).primary, 7);
        assert_eq!(Sjf::new(Alpha::Actual).unwrap().order_key(&pcb).primary, 30);
    }

    #[test]
    fn mismatched_alpha_fails_the_config_check() {
        let sjf = Sjf::new(Alpha::Smoothed(0.5)).unwrap();

        assert!(sjf.check_config(&SimulationConfig::default()).is_ok());
        assert!(sjf
            .check_config(&SimulationConfig::default().with_alpha(Alpha::Actual))
            .is_err());
    }
}
