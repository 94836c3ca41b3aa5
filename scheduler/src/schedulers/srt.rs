use crate::common_types::{Alpha, MIN_TAU};
use crate::ready_queue::{QueueDiscipline, SortKey};
use crate::schedulers::{Preemption, SchedulingPolicy};
use crate::{ProcessControlBlock, SimError, SimulationConfig};

/// What the SRT comparisons are based on
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SrtVariant {
    /// Exponentially averaged estimates, weighted by alpha
    Estimated(f64),
    /// The true time left in each burst
    Exact,
}

/// Shortest-Remaining-Time, preemptive
///
/// A process that becomes ready takes the CPU when its key is strictly
/// smaller than the time the running process still needs. Equal keys never
/// preempt. Queue ties are broken by the estimate and then by process id.
#[derive(Clone, Copy, Debug)]
pub struct Srt {
    alpha: Alpha,
    variant: SrtVariant,
}

impl Srt {
    pub fn new(alpha: Alpha) -> Result<Srt, SimError> {
        alpha.validate()?;

        let variant = match alpha {
            Alpha::Smoothed(weight) => SrtVariant::Estimated(weight),
            Alpha::Actual => SrtVariant::Exact,
        };

        Ok(Srt { alpha, variant })
    }

    pub fn variant(&self) -> SrtVariant {
        self.variant
    }
}

impl SchedulingPolicy for Srt {
    fn name(&self) -> &'static str {
        "SRT"
    }

    fn discipline(&self) -> QueueDiscipline {
        QueueDiscipline::Sorted
    }

    fn order_key(&self, pcb: &ProcessControlBlock) -> SortKey {
        match self.variant {
            SrtVariant::Estimated(_) => {
                let primary = if pcb.was_preempted {
                    pcb.predicted_remaining.unwrap_or(pcb.tau).max(MIN_TAU)
                } else {
                    pcb.tau
                };

                SortKey::primary(primary)
                    .with_secondary(pcb.tau)
                    .with_tiebreak(pcb.id)
            }
            SrtVariant::Exact => {
                SortKey::primary(pcb.remaining_burst_time).with_tiebreak(pcb.id)
            }
        }
    }

    fn should_preempt(
        &self,
        incoming: &ProcessControlBlock,
        running: &ProcessControlBlock,
        executed: usize,
    ) -> Option<Preemption> {
        let incoming_key = self.order_key(incoming).primary;

        match self.variant {
            SrtVariant::Estimated(_) => {
                let elapsed = running.elapsed_in_burst() + executed;
                let predicted = running.tau as i64 - elapsed as i64;

                if (incoming_key as i64) < predicted {
                    return Some(Preemption {
                        predicted: Some(predicted as usize),
                    });
                }

                None
            }
            SrtVariant::Exact => {
                let left = running.remaining_burst_time.saturating_sub(executed);

                if incoming_key < left {
                    return Some(Preemption { predicted: None });
                }

                None
            }
        }
    }

    fn smoothing(&self) -> Option<f64> {
        match self.variant {
            SrtVariant::Estimated(weight) => Some(weight),
            SrtVariant::Exact => None,
        }
    }

    fn check_config(&self, config: &SimulationConfig) -> Result<(), SimError> {
        if self.alpha != config.alpha {
            return Err(SimError::Config(format!(
                "SRT built with alpha {:?} but the configuration says {:?}",
                self.alpha, config.alpha
            )));
        }

        Ok(())
    }
}
