//! Ledger Client Adapters
//!
//! Implement the `DepositVerifier` port.

use crate::domain::{ChainId, DepositProof, EscrowError, Hash};
use crate::ports::outbound::DepositVerifier;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

/// In-memory ledger view for tests and simulations.
///
/// Deposits are "on chain" once submitted; a proof is confirmed only if it
/// matches a submitted transaction field for field.
#[derive(Debug, Default)]
pub struct InMemoryLedgerClient {
    /// Submitted deposits: (chain, tx_hash) -> proof.
    deposits: RwLock<HashMap<(ChainId, Hash), DepositProof>>,
    /// Simulates an unreachable ledger.
    unreachable: AtomicBool,
}

impl InMemoryLedgerClient {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a deposit transaction on `chain`.
    pub fn submit_deposit(&self, chain: ChainId, proof: DepositProof) {
        debug!(%chain, tx = %hex::encode(proof.tx_hash), "deposit submitted");
        self.deposits.write().insert((chain, proof.tx_hash), proof);
    }

    /// Make every confirmation fail with a ledger error.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Number of submitted deposits.
    pub fn deposit_count(&self) -> usize {
        self.deposits.read().len()
    }
}

#[async_trait]
impl DepositVerifier for InMemoryLedgerClient {
    async fn confirm_deposit(
        &self,
        chain: ChainId,
        proof: &DepositProof,
    ) -> Result<bool, EscrowError> {
        if self.unreachable.load(Ordering::SeqCst) {
            warn!(%chain, "ledger unreachable");
            return Err(EscrowError::Ledger(format!("{} ledger unreachable", chain)));
        }
        let confirmed = self
            .deposits
            .read()
            .get(&(chain, proof.tx_hash))
            .map_or(false, |submitted| submitted == proof);
        debug!(%chain, tx = %hex::encode(proof.tx_hash), confirmed, "deposit lookup");
        Ok(confirmed)
    }
}

/// Confirms every deposit. Wiring tests only.
#[derive(Clone, Copy, Debug, Default)]
pub struct AcceptAllDeposits;

#[async_trait]
impl DepositVerifier for AcceptAllDeposits {
    async fn confirm_deposit(
        &self,
        _chain: ChainId,
        _proof: &DepositProof,
    ) -> Result<bool, EscrowError> {
        Ok(true)
    }
}
