use crate::common_types::MIN_TAU;

/// First burst estimate, `ceil(1 / lambda)`
///
/// * `lambda` - rate of the exponential distribution the bursts are drawn from
pub fn initial_tau(lambda: f64) -> usize {
    clamp_tau((1.0 / lambda).ceil())
}

/// Exponential average of the previous estimate and the burst that just ran
///
/// * `alpha` - weight given to `actual_burst`
/// * `previous_tau` - the estimate used for the burst that just ran
/// * `actual_burst` - the real length of that burst
pub fn next_tau(alpha: f64, previous_tau: usize, actual_burst: usize) -> usize {
    let raw = (alpha * actual_burst as f64 + (1.0 - alpha) * previous_tau as f64).ceil();
    clamp_tau(raw)
}

fn clamp_tau(raw: f64) -> usize {
    if !raw.is_finite() || raw < MIN_TAU as f64 {
        log::warn!("burst estimate {} clamped to {}ms", raw, MIN_TAU);
        return MIN_TAU;
    }

    raw as usize
}

/// Average that reports 0 for an empty population
pub fn ratio(total: f64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }

    total / count as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_tau_rounds_up() {
        assert_eq!(initial_tau(0.01), 100);
        assert_eq!(initial_tau(0.003), 334);
        assert_eq!(initial_tau(5.0), 1);
    }

    #[test]
    fn full_weight_tracks_actual_burst() {
        assert_eq!(next_tau(1.0, 100, 37), 37);
        assert_eq!(next_tau(0.0, 100, 37), 100);
        assert_eq!(next_tau(0.5, 100, 37), 69);
    }

    #[test]
    fn estimate_never_drops_below_one() {
        assert_eq!(next_tau(0.0, 0, 0), MIN_TAU);
    }

    #[test]
    fn ratio_guards_empty_population() {
        assert_eq!(ratio(10.0, 0), 0.0);
        assert_eq!(ratio(10.0, 4), 2.5);
    }
}
