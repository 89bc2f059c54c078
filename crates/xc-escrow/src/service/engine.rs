//! Escrow Engine - per-ledger state machine
//!
//! Every transition checks state, authorization and time window and then
//! applies the update under one write guard, so two racing withdrawals
//! cannot both succeed. Ledger confirmation is awaited before the guard is
//! taken.

use crate::algorithms::commitment;
use crate::domain::{
    invariant_cancellation_allowed, invariant_deposit_matches, invariant_valid_params,
    invariant_withdrawal_allowed, AccountId, ChainId, DepositProof, EscrowError, EscrowEvent,
    EscrowId, EscrowParams, EscrowRecord, EscrowStatus, SecureSecret, Stage, Timestamp,
};
use crate::ports::inbound::EscrowLedger;
use crate::ports::outbound::{DepositVerifier, EventSink, TimeSource};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Internal state guarded by the engine lock.
#[derive(Default)]
struct EngineState {
    records: HashMap<EscrowId, EscrowRecord>,
    by_maker: HashMap<AccountId, Vec<EscrowId>>,
    by_taker: HashMap<AccountId, Vec<EscrowId>>,
    paused: bool,
}

impl EngineState {
    fn ensure_running(&self) -> Result<(), EscrowError> {
        if self.paused {
            return Err(EscrowError::Paused);
        }
        Ok(())
    }

    fn record(&self, id: EscrowId) -> Result<&EscrowRecord, EscrowError> {
        self.records.get(&id).ok_or(EscrowError::EscrowNotFound(id))
    }

    fn record_mut(&mut self, id: EscrowId) -> Result<&mut EscrowRecord, EscrowError> {
        self.records
            .get_mut(&id)
            .ok_or(EscrowError::EscrowNotFound(id))
    }

    fn collect(&self, ids: Option<&Vec<EscrowId>>) -> Vec<EscrowRecord> {
        ids.into_iter()
            .flatten()
            .filter_map(|id| self.records.get(id).cloned())
            .collect()
    }
}

/// Deposit checks that do not need the ledger.
fn check_fundable(
    record: &EscrowRecord,
    proof: &DepositProof,
    now: Timestamp,
) -> Result<(), EscrowError> {
    record.ensure_transition(EscrowStatus::Funded)?;
    if record.stage_at(now) == Stage::PublicCancellation {
        return Err(EscrowError::ScheduleExpired);
    }
    invariant_deposit_matches(record, proof)
}

/// In-process escrow ledger for one chain.
pub struct EscrowEngine {
    chain: ChainId,
    owner: AccountId,
    state: RwLock<EngineState>,
    clock: Arc<dyn TimeSource>,
    verifier: Arc<dyn DepositVerifier>,
    events: Arc<dyn EventSink>,
}

impl EscrowEngine {
    /// Create an engine for `chain`. `owner` may pause and unpause it.
    pub fn new(
        chain: ChainId,
        owner: AccountId,
        clock: Arc<dyn TimeSource>,
        verifier: Arc<dyn DepositVerifier>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            chain,
            owner,
            state: RwLock::new(EngineState::default()),
            clock,
            verifier,
            events,
        }
    }

    /// Whether mutating operations are currently rejected.
    pub fn is_paused(&self) -> bool {
        self.state.read().paused
    }

    /// Reject every mutating operation until [`unpause`](Self::unpause).
    pub fn pause(&self, caller: &AccountId) -> Result<(), EscrowError> {
        self.set_paused(caller, true)
    }

    /// Resume normal operation.
    pub fn unpause(&self, caller: &AccountId) -> Result<(), EscrowError> {
        self.set_paused(caller, false)
    }

    fn set_paused(&self, caller: &AccountId, paused: bool) -> Result<(), EscrowError> {
        if *caller != self.owner {
            warn!(chain = %self.chain, %caller, "pause toggle rejected");
            return Err(EscrowError::Unauthorized);
        }
        self.state.write().paused = paused;
        self.events.publish(if paused {
            EscrowEvent::Paused { chain: self.chain }
        } else {
            EscrowEvent::Unpaused { chain: self.chain }
        });
        Ok(())
    }

    /// Escrows where `account` is the maker, in creation order.
    pub fn list_by_maker(&self, account: &AccountId) -> Vec<EscrowRecord> {
        let state = self.state.read();
        state.collect(state.by_maker.get(account))
    }

    /// Escrows where `account` is the taker, in creation order.
    pub fn list_by_taker(&self, account: &AccountId) -> Vec<EscrowRecord> {
        let state = self.state.read();
        state.collect(state.by_taker.get(account))
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.state.read().records.len()
    }

    /// True when no record was created yet.
    pub fn is_empty(&self) -> bool {
        self.state.read().records.is_empty()
    }
}

#[async_trait]
impl EscrowLedger for EscrowEngine {
    fn chain(&self) -> ChainId {
        self.chain
    }

    fn now(&self) -> Timestamp {
        self.clock.now()
    }

    async fn create(&self, params: EscrowParams) -> Result<EscrowRecord, EscrowError> {
        invariant_valid_params(&params)?;

        let record = {
            let mut state = self.state.write();
            state.ensure_running()?;
            let record = EscrowRecord::new(EscrowId::generate(), self.chain, params, self.now());
            state
                .by_maker
                .entry(record.maker.clone())
                .or_default()
                .push(record.id);
            state
                .by_taker
                .entry(record.taker.clone())
                .or_default()
                .push(record.id);
            state.records.insert(record.id, record.clone());
            record
        };

        info!(
            chain = %self.chain,
            escrow_id = %record.id,
            created_at = record.created_at,
            "escrow created"
        );
        self.events.publish(EscrowEvent::Created {
            escrow_id: record.id,
            chain: self.chain,
            maker: record.maker.clone(),
            taker: record.taker.clone(),
            maker_asset: record.maker_asset.clone(),
            taker_asset: record.taker_asset.clone(),
            making_amount: record.making_amount,
            taking_amount: record.taking_amount,
        });
        Ok(record)
    }

    async fn fund(&self, id: EscrowId, proof: DepositProof) -> Result<EscrowRecord, EscrowError> {
        {
            let state = self.state.read();
            state.ensure_running()?;
            check_fundable(state.record(id)?, &proof, self.now())?;
        }

        if !self.verifier.confirm_deposit(self.chain, &proof).await? {
            warn!(chain = %self.chain, escrow_id = %id, "deposit not confirmed");
            return Err(EscrowError::DepositNotConfirmed);
        }

        // State may have moved while the ledger was queried.
        let record = {
            let mut state = self.state.write();
            state.ensure_running()?;
            let now = self.now();
            let record = state.record_mut(id)?;
            check_fundable(record, &proof, now)?;
            record.mark_funded(proof.tx_hash, now)?;
            record.clone()
        };

        info!(chain = %self.chain, escrow_id = %id, "escrow funded");
        self.events.publish(EscrowEvent::Funded {
            escrow_id: id,
            maker: record.maker.clone(),
            commitment_hash: record.commitment_hash,
            at: record.funded_at.unwrap_or_default(),
        });
        Ok(record)
    }

    async fn withdraw(
        &self,
        id: EscrowId,
        secret: &SecureSecret,
        caller: &AccountId,
        receiver: Option<AccountId>,
    ) -> Result<EscrowRecord, EscrowError> {
        let record = {
            let mut state = self.state.write();
            state.ensure_running()?;
            let now = self.now();
            let record = state.record_mut(id)?;
            record.ensure_transition(EscrowStatus::Withdrawn)?;
            if !commitment::verify(secret, &record.commitment_hash) {
                warn!(chain = %self.chain, escrow_id = %id, "secret mismatch");
                return Err(EscrowError::InvalidSecret);
            }
            let stage = record.stage_at(now);
            debug!(escrow_id = %id, ?stage, %caller, "withdraw window check");
            invariant_withdrawal_allowed(record, stage, caller)?;
            let receiver = receiver.unwrap_or_else(|| record.taker.clone());
            record.mark_withdrawn(receiver, now)?;
            record.clone()
        };

        let receiver = record.settled_to.clone().unwrap_or_else(|| record.taker.clone());
        info!(chain = %self.chain, escrow_id = %id, %receiver, "escrow withdrawn");
        self.events.publish(EscrowEvent::Withdrawn {
            escrow_id: id,
            receiver,
            secret: secret.clone(),
            at: record.settled_at.unwrap_or_default(),
        });
        Ok(record)
    }

    async fn cancel(&self, id: EscrowId, caller: &AccountId) -> Result<EscrowRecord, EscrowError> {
        let record = {
            let mut state = self.state.write();
            state.ensure_running()?;
            let now = self.now();
            let record = state.record_mut(id)?;
            record.ensure_transition(EscrowStatus::Cancelled)?;
            let stage = record.stage_at(now);
            debug!(escrow_id = %id, ?stage, %caller, "cancel window check");
            invariant_cancellation_allowed(record, stage, caller)?;
            record.mark_cancelled(now)?;
            record.clone()
        };

        info!(
            chain = %self.chain,
            escrow_id = %id,
            refunded = record.settled_to.is_some(),
            "escrow cancelled"
        );
        self.events.publish(EscrowEvent::Cancelled {
            escrow_id: id,
            refunded_to: record.settled_to.clone(),
            at: record.settled_at.unwrap_or_default(),
        });
        Ok(record)
    }

    async fn get(&self, id: EscrowId) -> Option<EscrowRecord> {
        self.state.read().records.get(&id).cloned()
    }
}
