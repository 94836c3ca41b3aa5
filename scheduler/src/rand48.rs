/// The 48-bit linear congruential generator behind `drand48`
///
/// Seeded the way `srand48` does it, so a given seed yields the same stream
/// as the C library.
#[derive(Clone, Debug)]
pub struct Drand48 {
    state: u64,
}

const MULTIPLIER: u64 = 0x5_DEEC_E66D;
const INCREMENT: u64 = 0xB;
const MASK: u64 = (1 << 48) - 1;
const SEED_LOW: u64 = 0x330E;

impl Drand48 {
    pub fn new(seed: u32) -> Drand48 {
        Drand48 {
            state: ((seed as u64) << 16) | SEED_LOW,
        }
    }

    /// Next raw 48-bit value
    pub fn next_u48(&mut self) -> u64 {
        self.state = MULTIPLIER
            .wrapping_mul(self.state)
            .wrapping_add(INCREMENT)
            & MASK;
        self.state
    }

    /// Uniform value in `[0, 1)`
    pub fn next_f64(&mut self) -> f64 {
        self.next_u48() as f64 / (1u64 << 48) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeding_matches_srand48() {
        let rng = Drand48::new(0x1234);
        assert_eq!(rng.state, 0x1234_330E);
    }

    #[test]
    fn first_value_follows_the_recurrence() {
        let mut rng = Drand48::new(0);
        let expected = (0x5_DEEC_E66Du64 * 0x330E + 0xB) & MASK;

        assert_eq!(rng.next_u48(), expected);
    }

    #[test]
    fn values_stay_in_unit_interval_and_repeat_per_seed() {
        let mut first = Drand48::new(2);
        let mut second = Drand48::new(2);

        for _ in 0..1000 {
            let value = first.next_f64();
            assert!((0.0..1.0).contains(&value));
            assert_eq!(value, second.next_f64());
        }
    }
}
