use rand::Rng;

/// The fixed wheel segments, in wheel order.
pub const MULTIPLIERS: [f64; 12] = [
    0.8, 0.9, 1.0, 1.1, 1.15, 1.2, 1.25, 1.3, 1.35, 1.4, 1.45, 1.5,
];

/// Segment used for payout previews before the first spin (×1.0).
pub const DEFAULT_INDEX: usize = 2;

pub const SEGMENT_DEGREES: f64 = 360.0 / MULTIPLIERS.len() as f64;

/// One spin result. `angle_deg` is the display rotation that lands the
/// pointer on the chosen segment after 4–7 full turns; the payout only
/// cares about `index`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinOutcome {
    pub index: usize,
    pub angle_deg: f64,
}

impl SpinOutcome {
    pub fn multiplier(&self) -> f64 {
        MULTIPLIERS[self.index]
    }
}

/// Uniform draw over the twelve segments.
pub fn spin<R: Rng>(rng: &mut R) -> SpinOutcome {
    let index = rng.gen_range(0..MULTIPLIERS.len());
    let turns = rng.gen_range(4..=7) as f64;
    SpinOutcome {
        index,
        angle_deg: turns * 360.0 + (index as f64 + 0.5) * SEGMENT_DEGREES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn spins_stay_on_the_wheel() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let outcome = spin(&mut rng);
            assert!(outcome.index < MULTIPLIERS.len());
            assert!(MULTIPLIERS.contains(&outcome.multiplier()));
        }
    }

    #[test]
    fn angle_lands_mid_segment_after_full_turns() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let outcome = spin(&mut rng);
            let residual = outcome.angle_deg % 360.0;
            let expected = (outcome.index as f64 + 0.5) * SEGMENT_DEGREES;
            assert!((residual - expected).abs() < 1e-9);
            let turns = (outcome.angle_deg - residual) / 360.0;
            assert!((4.0..=7.0).contains(&turns));
        }
    }

    #[test]
    fn placeholder_is_the_neutral_segment() {
        assert_eq!(MULTIPLIERS[DEFAULT_INDEX], 1.0);
    }
}
