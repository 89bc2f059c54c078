//! # Outbound Ports
//!
//! Traits for external dependencies (clock, ledger confirmation, events).

use crate::domain::{ChainId, DepositProof, EscrowError, EscrowEvent, Timestamp};
use async_trait::async_trait;

/// Time source - outbound port.
pub trait TimeSource: Send + Sync {
    /// Current unix time in seconds.
    fn now(&self) -> Timestamp;
}

/// Ledger deposit confirmation - outbound port.
#[async_trait]
pub trait DepositVerifier: Send + Sync {
    /// Whether the deposit in `proof` is confirmed on `chain`.
    ///
    /// `Err` means the ledger could not be asked; `Ok(false)` means it
    /// answered and the deposit is unknown.
    async fn confirm_deposit(
        &self,
        chain: ChainId,
        proof: &DepositProof,
    ) -> Result<bool, EscrowError>;
}

/// Event publication - outbound port.
pub trait EventSink: Send + Sync {
    /// Publish one event. Must not block.
    fn publish(&self, event: EscrowEvent);
}
