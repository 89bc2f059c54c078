//! # Domain Invariants
//!
//! Business rules checked by the engine and coordinator.

use super::entities::{DepositProof, EscrowParams, EscrowRecord};
use super::errors::{Amount, EscrowError, Hash};
use super::timelocks::TimelockSchedule;
use super::value_objects::{AccountId, Stage};

/// Invariant: both amounts strictly positive.
pub fn invariant_positive_amounts(making: Amount, taking: Amount) -> Result<(), EscrowError> {
    if making == 0 || taking == 0 {
        return Err(EscrowError::InvalidAmount);
    }
    Ok(())
}

/// Invariant: maker and taker differ.
pub fn invariant_distinct_parties(maker: &AccountId, taker: &AccountId) -> Result<(), EscrowError> {
    if maker == taker {
        return Err(EscrowError::InvalidParty);
    }
    Ok(())
}

/// All creation-time checks for one leg.
pub fn invariant_valid_params(params: &EscrowParams) -> Result<(), EscrowError> {
    invariant_positive_amounts(params.making_amount, params.taking_amount)?;
    invariant_distinct_parties(&params.maker, &params.taker)?;
    params.schedule.validate()
}

/// Invariant: both legs share one hashlock.
pub fn invariant_hashlock_match(a: &Hash, b: &Hash) -> Result<(), EscrowError> {
    if a != b {
        return Err(EscrowError::CommitmentMismatch);
    }
    Ok(())
}

/// Invariant: source withdrawals outlast destination withdrawals.
///
/// The taker of the source leg learns the secret only when the destination
/// leg is withdrawn, so the source withdrawal window must close at least
/// `margin_secs` later.
///
/// Offset-only: each schedule counts from its own leg's `created_at` on its
/// own ledger clock. Creation delay and clock skew between the ledgers must
/// fit inside `margin_secs`. Finality and private-withdrawal ends are not
/// compared; the coordinator re-checks both legs' stages before reveal.
pub fn invariant_timelock_margin(
    source: &TimelockSchedule,
    destination: &TimelockSchedule,
    margin_secs: u64,
) -> Result<(), EscrowError> {
    let required = destination.public_withdrawal.saturating_add(margin_secs);
    if source.public_withdrawal < required {
        return Err(EscrowError::InvalidSchedule(format!(
            "source withdrawal ends at +{}s, needs at least +{}s",
            source.public_withdrawal, required
        )));
    }
    Ok(())
}

/// Invariant: deposit comes from the maker and covers exactly the locked amount.
pub fn invariant_deposit_matches(
    record: &EscrowRecord,
    proof: &DepositProof,
) -> Result<(), EscrowError> {
    if proof.depositor != record.maker {
        return Err(EscrowError::Unauthorized);
    }
    if proof.asset != record.maker_asset || proof.amount != record.making_amount {
        return Err(EscrowError::InvalidAmount);
    }
    Ok(())
}

/// Invariant: withdrawal window and caller rights.
pub fn invariant_withdrawal_allowed(
    record: &EscrowRecord,
    stage: Stage,
    caller: &AccountId,
) -> Result<(), EscrowError> {
    match stage {
        Stage::Finality => Err(EscrowError::NotYetWithdrawable),
        Stage::PrivateWithdrawal if *caller != record.taker => Err(EscrowError::Unauthorized),
        Stage::PrivateWithdrawal | Stage::PublicWithdrawal => Ok(()),
        Stage::PrivateCancellation | Stage::PublicCancellation => {
            Err(EscrowError::WithdrawalWindowClosed)
        }
    }
}

/// Invariant: cancellation window and caller rights.
pub fn invariant_cancellation_allowed(
    record: &EscrowRecord,
    stage: Stage,
    caller: &AccountId,
) -> Result<(), EscrowError> {
    match stage {
        Stage::Finality | Stage::PrivateWithdrawal | Stage::PublicWithdrawal => {
            Err(EscrowError::NotYetCancellable)
        }
        Stage::PrivateCancellation if *caller != record.maker => Err(EscrowError::Unauthorized),
        Stage::PrivateCancellation | Stage::PublicCancellation => Ok(()),
    }
}
