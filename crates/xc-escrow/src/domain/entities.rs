//! # Domain Entities
//!
//! Escrow records (one per ledger leg) and the swaps that pair them.

use super::errors::{Amount, EscrowError, Hash, Timestamp};
use super::timelocks::TimelockSchedule;
use super::value_objects::{
    AccountId, AssetId, ChainId, EscrowId, EscrowStatus, Stage, SwapId, SwapStatus,
};
use serde::{Deserialize, Serialize};

/// Parameters for creating an escrow on one leg.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowParams {
    /// Party that deposits `making_amount` of `maker_asset`.
    pub maker: AccountId,
    /// Party entitled to withdraw with the secret.
    pub taker: AccountId,
    /// Asset locked by the maker.
    pub maker_asset: AssetId,
    /// Asset the maker expects on the other leg.
    pub taker_asset: AssetId,
    /// Amount of `maker_asset` locked.
    pub making_amount: Amount,
    /// Amount of `taker_asset` expected in exchange.
    pub taking_amount: Amount,
    /// SHA-256 of the swap secret.
    pub commitment_hash: Hash,
    /// Stage offsets.
    pub schedule: TimelockSchedule,
}

/// Evidence that the maker locked funds on the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositProof {
    /// Ledger transaction carrying the deposit.
    pub tx_hash: Hash,
    /// Account that sent the funds.
    pub depositor: AccountId,
    /// Deposited asset.
    pub asset: AssetId,
    /// Deposited amount.
    pub amount: Amount,
}

/// Persisted state of one side of a swap.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowRecord {
    /// Unique identifier.
    pub id: EscrowId,
    /// Ledger holding the funds.
    pub chain: ChainId,
    /// Depositing party.
    pub maker: AccountId,
    /// Withdrawing party.
    pub taker: AccountId,
    /// Locked asset.
    pub maker_asset: AssetId,
    /// Counter asset.
    pub taker_asset: AssetId,
    /// Locked amount.
    pub making_amount: Amount,
    /// Counter amount.
    pub taking_amount: Amount,
    /// Hashlock.
    pub commitment_hash: Hash,
    /// Stage offsets relative to `created_at`.
    pub schedule: TimelockSchedule,
    /// Current state.
    pub status: EscrowStatus,
    /// Creation timestamp.
    pub created_at: Timestamp,
    /// Set when funded.
    pub funded_at: Option<Timestamp>,
    /// Deposit transaction accepted at funding.
    pub deposit_tx: Option<Hash>,
    /// Account that received the funds on withdrawal or cancellation.
    pub settled_to: Option<AccountId>,
    /// Set on withdrawal or cancellation.
    pub settled_at: Option<Timestamp>,
}

impl EscrowRecord {
    /// Create a new pending record.
    pub fn new(id: EscrowId, chain: ChainId, params: EscrowParams, created_at: Timestamp) -> Self {
        Self {
            id,
            chain,
            maker: params.maker,
            taker: params.taker,
            maker_asset: params.maker_asset,
            taker_asset: params.taker_asset,
            making_amount: params.making_amount,
            taking_amount: params.taking_amount,
            commitment_hash: params.commitment_hash,
            schedule: params.schedule,
            status: EscrowStatus::Pending,
            created_at,
            funded_at: None,
            deposit_tx: None,
            settled_to: None,
            settled_at: None,
        }
    }

    /// Stage active at `now`.
    pub fn stage_at(&self, now: Timestamp) -> Stage {
        self.schedule.active_stage(now, self.created_at)
    }

    /// Check the status precondition for a transition.
    pub fn ensure_transition(&self, next: EscrowStatus) -> Result<(), EscrowError> {
        if !self.status.can_transition_to(next) {
            return Err(EscrowError::transition(self.status, next));
        }
        Ok(())
    }

    /// Record funding.
    pub fn mark_funded(&mut self, tx_hash: Hash, now: Timestamp) -> Result<(), EscrowError> {
        self.ensure_transition(EscrowStatus::Funded)?;
        self.status = EscrowStatus::Funded;
        self.funded_at = Some(now);
        self.deposit_tx = Some(tx_hash);
        Ok(())
    }

    /// Record a withdrawal to `receiver`.
    pub fn mark_withdrawn(
        &mut self,
        receiver: AccountId,
        now: Timestamp,
    ) -> Result<(), EscrowError> {
        self.ensure_transition(EscrowStatus::Withdrawn)?;
        self.status = EscrowStatus::Withdrawn;
        self.settled_to = Some(receiver);
        self.settled_at = Some(now);
        Ok(())
    }

    /// Record a cancellation. Funds, if any, go back to the maker.
    pub fn mark_cancelled(&mut self, now: Timestamp) -> Result<(), EscrowError> {
        self.ensure_transition(EscrowStatus::Cancelled)?;
        if self.status == EscrowStatus::Funded {
            self.settled_to = Some(self.maker.clone());
        }
        self.status = EscrowStatus::Cancelled;
        self.settled_at = Some(now);
        Ok(())
    }
}

/// Reference from a swap to one of its legs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegRef {
    /// Ledger of the leg.
    pub chain: ChainId,
    /// Escrow on that ledger.
    pub escrow_id: EscrowId,
}

/// Terms of one leg, as handed to the coordinator.
///
/// The coordinator owns the commitment, so no hash is accepted here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapLegParams {
    /// Depositor on this leg.
    pub maker: AccountId,
    /// Withdrawer on this leg.
    pub taker: AccountId,
    /// Asset locked on this leg.
    pub maker_asset: AssetId,
    /// Asset expected on the other leg.
    pub taker_asset: AssetId,
    /// Amount locked on this leg.
    pub making_amount: Amount,
    /// Amount expected on the other leg.
    pub taking_amount: Amount,
    /// Stage offsets; `None` uses the configured default.
    pub schedule: Option<TimelockSchedule>,
}

impl SwapLegParams {
    /// Bind the terms to a commitment.
    pub fn into_escrow_params(
        self,
        commitment_hash: Hash,
        default_schedule: TimelockSchedule,
    ) -> EscrowParams {
        EscrowParams {
            maker: self.maker,
            taker: self.taker,
            maker_asset: self.maker_asset,
            taker_asset: self.taker_asset,
            making_amount: self.making_amount,
            taking_amount: self.taking_amount,
            commitment_hash,
            schedule: self.schedule.unwrap_or(default_schedule),
        }
    }
}

/// Coordinator-level pairing of a source leg (A) and a destination leg (B).
///
/// Holds references only. The secret is never a field of this type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swap {
    /// Unique identifier.
    pub id: SwapId,
    /// Source leg.
    pub leg_a: LegRef,
    /// Destination leg.
    pub leg_b: LegRef,
    /// Hashlock shared by both legs.
    pub commitment_hash: Hash,
    /// Current state.
    pub status: SwapStatus,
    /// Creation timestamp (source ledger clock).
    pub created_at: Timestamp,
}

impl Swap {
    /// Create a pending swap.
    pub fn new(leg_a: LegRef, leg_b: LegRef, commitment_hash: Hash, created_at: Timestamp) -> Self {
        Self {
            id: SwapId::generate(),
            leg_a,
            leg_b,
            commitment_hash,
            status: SwapStatus::Pending,
            created_at,
        }
    }

    /// Transition to new state.
    pub fn transition_to(&mut self, next: SwapStatus) -> Result<(), EscrowError> {
        if !self.status.can_transition_to(next) {
            return Err(EscrowError::transition(self.status, next));
        }
        self.status = next;
        Ok(())
    }
}
