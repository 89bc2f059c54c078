//! # Swap Settlement Rules
//!
//! Pure decisions the coordinator takes over a pair of leg records.
//! Each leg is read on its own ledger clock.

use crate::domain::{EscrowError, EscrowRecord, EscrowStatus, Timestamp};

/// Snapshot of one leg at a point in its ledger's time.
#[derive(Clone, Copy, Debug)]
pub struct LegView<'a> {
    /// Record as reported by the ledger.
    pub record: &'a EscrowRecord,
    /// Ledger clock when the record was read.
    pub now: Timestamp,
}

impl<'a> LegView<'a> {
    /// Pair a record with its ledger's clock.
    pub fn new(record: &'a EscrowRecord, now: Timestamp) -> Self {
        Self { record, now }
    }

    /// Withdrawal window open on this leg.
    pub fn in_withdrawal(&self) -> bool {
        self.record.stage_at(self.now).is_withdrawal()
    }

    /// Cancellation window open on this leg.
    pub fn in_cancellation(&self) -> bool {
        self.record.stage_at(self.now).is_cancellation()
    }

    /// Leg can still be cancelled now.
    pub fn cancellable(&self) -> bool {
        !self.record.status.is_terminal() && self.in_cancellation()
    }
}

/// Outcome of a funding check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FundingOutcome {
    /// Both legs hold funds.
    BothFunded,
    /// At least one leg is still waiting for its deposit.
    Waiting,
    /// The swap can no longer complete: a leg was cancelled or lapsed
    /// into cancellation without funds.
    Abandoned,
}

/// Classify a pending swap from its two legs.
pub fn funding_outcome(leg_a: LegView<'_>, leg_b: LegView<'_>) -> FundingOutcome {
    let dead = |leg: &LegView<'_>| match leg.record.status {
        EscrowStatus::Cancelled => true,
        EscrowStatus::Pending => leg.in_cancellation(),
        EscrowStatus::Funded | EscrowStatus::Withdrawn => false,
    };
    if dead(&leg_a) || dead(&leg_b) {
        return FundingOutcome::Abandoned;
    }
    if leg_a.record.status == EscrowStatus::Funded && leg_b.record.status == EscrowStatus::Funded {
        FundingOutcome::BothFunded
    } else {
        FundingOutcome::Waiting
    }
}

/// Checks that must hold before the secret leaves custody.
///
/// Both legs still funded and both inside a withdrawal window. Once leg B
/// is withdrawn the secret is public, so leg A must already accept it.
pub fn reveal_precheck(leg_a: LegView<'_>, leg_b: LegView<'_>) -> Result<(), EscrowError> {
    for leg in [&leg_a, &leg_b] {
        leg.record.ensure_transition(EscrowStatus::Withdrawn)?;
    }
    if leg_b.in_cancellation() || leg_a.in_cancellation() {
        return Err(EscrowError::WithdrawalWindowClosed);
    }
    if !leg_b.in_withdrawal() || !leg_a.in_withdrawal() {
        return Err(EscrowError::NotYetWithdrawable);
    }
    Ok(())
}
