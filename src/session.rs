//! Session orchestration: wheel selection, payout composition and the
//! ledger round-trips. One session, one user, sequential actions.

use chrono::Local;
use rand::Rng;
use thiserror::Error;

use crate::ledger::{LedgerAggregate, LedgerClient, LedgerError, ResultRecord};
use crate::payout::{self, NarrativeFlags, PayoutBreakdown};
use crate::reputation;
use crate::wheel::{self, SpinOutcome};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("must spin before saving")]
    InvalidState,
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Per-session state. The wheel selection starts empty and only a spin
/// fills it; payout previews fall back to the ×1.0 segment until then.
pub struct SessionState {
    ledger: Option<LedgerClient>,
    selected: Option<usize>,
    last_spin: Option<SpinOutcome>,
    aggregate: LedgerAggregate,
    tier: usize,
}

impl SessionState {
    pub fn new(ledger: Option<LedgerClient>) -> Self {
        Self {
            ledger,
            selected: None,
            last_spin: None,
            aggregate: LedgerAggregate::default(),
            tier: 0,
        }
    }

    pub fn has_ledger(&self) -> bool {
        self.ledger.is_some()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn last_spin(&self) -> Option<SpinOutcome> {
        self.last_spin
    }

    pub fn aggregate(&self) -> LedgerAggregate {
        self.aggregate
    }

    pub fn tier(&self) -> usize {
        self.tier
    }

    pub fn cap(&self) -> i64 {
        reputation::cap_for(self.tier)
    }

    /// Draw a fresh wheel outcome, replacing any prior selection.
    pub fn spin<R: Rng>(&mut self, rng: &mut R) -> SpinOutcome {
        let outcome = wheel::spin(rng);
        self.selected = Some(outcome.index);
        self.last_spin = Some(outcome);
        outcome
    }

    fn multiplier(&self) -> f64 {
        wheel::MULTIPLIERS[self.selected.unwrap_or(wheel::DEFAULT_INDEX)]
    }

    /// Pure composition of the payout pipeline. Safe to call at any time
    /// and idempotent for unchanged inputs.
    pub fn compute_payout(&self, roll: i64, flags: NarrativeFlags) -> PayoutBreakdown {
        let roll = roll.clamp(1, 30);
        let base = payout::base_gold(roll);
        let multiplier = self.multiplier();
        let bonus_rate = flags.bonus_rate();
        let cap = self.cap();
        let (raw, award) = payout::final_award(base, multiplier, bonus_rate, cap);
        PayoutBreakdown {
            roll,
            base,
            multiplier,
            bonus_rate,
            raw,
            award,
            cap,
        }
    }

    /// Build the record a save would append. Fails before the first spin.
    pub fn prepare_record(
        &self,
        roll: i64,
        flags: NarrativeFlags,
        note: &str,
    ) -> Result<ResultRecord, SessionError> {
        if self.selected.is_none() {
            return Err(SessionError::InvalidState);
        }
        let breakdown = self.compute_payout(roll, flags);
        Ok(ResultRecord {
            timestamp: Local::now(),
            note: note.trim().to_string(),
            roll: breakdown.roll,
            base_gold: breakdown.base,
            wheel_multiplier: breakdown.multiplier,
            narrative_pct: breakdown.bonus_rate,
            raw_total: breakdown.raw,
            final_award_gp: breakdown.award,
        })
    }

    /// Append the current result and refresh the aggregate once. A failed
    /// append leaves aggregate and tier untouched; a failed refresh after
    /// a successful append keeps the save successful with stale totals.
    pub fn save(
        &mut self,
        roll: i64,
        flags: NarrativeFlags,
        note: &str,
    ) -> Result<ResultRecord, SessionError> {
        let record = self.prepare_record(roll, flags, note)?;
        let Some(ledger) = &self.ledger else {
            return Err(LedgerError::Config("no ledger configured".into()).into());
        };
        ledger.append(&record)?;
        let _ = self.refresh_aggregate();
        Ok(record)
    }

    /// Refetch totals and recompute the tier. On failure the previous
    /// aggregate is retained (stale reads beat a zero reset).
    pub fn refresh_aggregate(&mut self) -> Result<(), SessionError> {
        let Some(ledger) = &self.ledger else {
            return Err(LedgerError::Config("no ledger configured".into()).into());
        };
        let aggregate = ledger.fetch_aggregate()?;
        self.apply_aggregate(aggregate);
        Ok(())
    }

    pub fn apply_aggregate(&mut self, aggregate: LedgerAggregate) {
        self.aggregate = aggregate;
        self.tier = reputation::tier_for(aggregate.job_count);
    }
}
