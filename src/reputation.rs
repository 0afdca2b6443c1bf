use crate::payout::BASE_CAP;

/// Display names for the ten reputation tiers, lowest first.
pub const TIER_NAMES: [&str; 10] = [
    "Dusting Dabbler",
    "Curtain-Cord Wrangler",
    "Tapestry Tender",
    "Chandelier Charmer",
    "Parlour Perfectionist",
    "Gilded Guilder",
    "Salon Savant",
    "Waterdhavian Tastemaker",
    "Noble-House Laureate",
    "Master of Makeovers",
];

/// Tier index for a lifetime job count: one tier per five jobs, capped at 9.
pub fn tier_for(job_count: u64) -> usize {
    ((job_count / 5) as usize).min(9)
}

/// Payout ceiling at a tier: +10% of BASE_CAP per tier.
pub fn cap_for(tier: usize) -> i64 {
    (BASE_CAP as f64 * (1.0 + 0.10 * tier as f64)).round() as i64
}

pub fn tier_name(tier: usize) -> &'static str {
    TIER_NAMES[tier]
}

/// Jobs required before a tier unlocks.
pub fn unlock_threshold(tier: usize) -> u64 {
    tier as u64 * 5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_steps_every_five_jobs() {
        assert_eq!(tier_for(0), 0);
        assert_eq!(tier_for(4), 0);
        assert_eq!(tier_for(5), 1);
        assert_eq!(tier_for(49), 9);
        assert_eq!(tier_for(1000), 9);
    }

    #[test]
    fn tier_never_decreases_with_jobs() {
        let mut prev = 0;
        for jobs in 0..120 {
            let tier = tier_for(jobs);
            assert!(tier >= prev && tier <= 9);
            prev = tier;
        }
    }

    #[test]
    fn caps_grow_ten_percent_per_tier() {
        assert_eq!(cap_for(0), 250);
        assert_eq!(cap_for(1), 275);
        assert_eq!(cap_for(9), 475);
    }

    #[test]
    fn every_tier_has_a_name_and_threshold() {
        for tier in 0..10 {
            assert!(!tier_name(tier).is_empty());
            assert_eq!(unlock_threshold(tier), tier as u64 * 5);
        }
    }
}
