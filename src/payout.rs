/// Ceiling before reputation boosts are applied.
pub const BASE_CAP: i64 = 250;
/// Floor below which no job pays out.
pub const MIN_PAYOUT: i64 = 50;

/// Narrative quality toggles. Bonuses are additive: checking all three
/// yields +50%.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NarrativeFlags {
    pub passable: bool,
    pub good: bool,
    pub excellent: bool,
}

impl NarrativeFlags {
    pub fn bonus_rate(self) -> f64 {
        let mut rate = 0.0;
        if self.passable {
            rate += 0.10;
        }
        if self.good {
            rate += 0.15;
        }
        if self.excellent {
            rate += 0.25;
        }
        rate
    }
}

/// Everything the payout pane needs to show for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayoutBreakdown {
    pub roll: i64,
    pub base: f64,
    pub multiplier: f64,
    pub bonus_rate: f64,
    pub raw: f64,
    pub award: i64,
    pub cap: i64,
}

/// Linear map from a d30 roll to base gold in [50, 150]. Out-of-range
/// rolls are clamped first, so callers never see an error.
pub fn base_gold(roll: i64) -> f64 {
    let roll = roll.clamp(1, 30);
    50.0 + (roll - 1) as f64 * 100.0 / 29.0
}

/// Combine base, multiplier and bonus into the capped award. Returns the
/// pre-clamp raw total alongside the final integer payout. The floor is
/// applied after the ceiling so MIN_PAYOUT wins if the cap ever drops
/// below it.
pub fn final_award(base: f64, multiplier: f64, bonus_rate: f64, cap: i64) -> (f64, i64) {
    let raw = base * multiplier * (1.0 + bonus_rate);
    let award = (raw.round() as i64).min(cap).max(MIN_PAYOUT);
    (raw, award)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_gold_spans_fifty_to_one_fifty() {
        assert_eq!(base_gold(1), 50.0);
        assert_eq!(base_gold(30), 150.0);
        let mut prev = 0.0;
        for roll in 1..=30 {
            let base = base_gold(roll);
            assert!((50.0..=150.0).contains(&base));
            assert!(base >= prev);
            prev = base;
        }
    }

    #[test]
    fn base_gold_clamps_out_of_domain_rolls() {
        assert_eq!(base_gold(0), base_gold(1));
        assert_eq!(base_gold(-7), base_gold(1));
        assert_eq!(base_gold(99), base_gold(30));
    }

    #[test]
    fn award_stays_between_floor_and_cap() {
        for roll in 1..=30 {
            let base = base_gold(roll);
            for &mult in &[0.8, 1.0, 1.5] {
                for &bonus in &[0.0, 0.25, 0.50] {
                    let (_, award) = final_award(base, mult, bonus, 250);
                    assert!((MIN_PAYOUT..=250).contains(&award));
                }
            }
        }
    }

    #[test]
    fn mid_roll_example() {
        let base = base_gold(15);
        assert!((base - 98.275_862).abs() < 1e-4);
        let (raw, award) = final_award(base, 1.0, 0.0, 250);
        assert!((raw - base).abs() < 1e-9);
        assert_eq!(award, 98);
    }

    #[test]
    fn weak_result_is_lifted_to_the_floor() {
        let (raw, award) = final_award(base_gold(1), 0.8, 0.0, 250);
        assert_eq!(raw, 40.0);
        assert_eq!(award, MIN_PAYOUT);
    }

    #[test]
    fn strong_result_is_clamped_to_the_cap() {
        let (raw, award) = final_award(base_gold(30), 1.5, 0.25, 250);
        assert_eq!(raw, 281.25);
        assert_eq!(award, 250);
    }

    #[test]
    fn floor_beats_a_pathological_cap() {
        let (_, award) = final_award(100.0, 1.0, 0.0, 10);
        assert_eq!(award, MIN_PAYOUT);
    }

    #[test]
    fn narrative_bonuses_are_additive() {
        let all = NarrativeFlags {
            passable: true,
            good: true,
            excellent: true,
        };
        assert!((all.bonus_rate() - 0.50).abs() < 1e-12);
        assert_eq!(NarrativeFlags::default().bonus_rate(), 0.0);
    }
}
