//! # Inbound Ports
//!
//! What a ledger leg and the swap coordinator can do.

use crate::domain::{
    AccountId, ChainId, DepositProof, EscrowError, EscrowId, EscrowParams, EscrowRecord,
    SecureSecret, Swap, SwapId, SwapLegParams, Timestamp,
};
use async_trait::async_trait;

/// One escrow ledger (one chain) - inbound port.
///
/// [`EscrowEngine`](crate::service::EscrowEngine) is the in-process
/// implementation; a remote chain gets its own adapter.
#[async_trait]
pub trait EscrowLedger: Send + Sync {
    /// Chain this ledger settles on.
    fn chain(&self) -> ChainId;

    /// Current time on this ledger's clock.
    fn now(&self) -> Timestamp;

    /// Create a pending escrow.
    async fn create(&self, params: EscrowParams) -> Result<EscrowRecord, EscrowError>;

    /// Accept the maker's deposit.
    async fn fund(&self, id: EscrowId, proof: DepositProof) -> Result<EscrowRecord, EscrowError>;

    /// Release funds against the secret. Funds go to `receiver`, or the taker.
    async fn withdraw(
        &self,
        id: EscrowId,
        secret: &SecureSecret,
        caller: &AccountId,
        receiver: Option<AccountId>,
    ) -> Result<EscrowRecord, EscrowError>;

    /// Return funds (if any) to the maker.
    async fn cancel(&self, id: EscrowId, caller: &AccountId) -> Result<EscrowRecord, EscrowError>;

    /// Read a record.
    async fn get(&self, id: EscrowId) -> Option<EscrowRecord>;
}

/// Two-leg swap orchestration - inbound port.
#[async_trait]
pub trait SwapCoordinatorApi: Send + Sync {
    /// Create both legs under one fresh commitment.
    async fn initiate(&self, leg_a: SwapLegParams, leg_b: SwapLegParams)
        -> Result<Swap, EscrowError>;

    /// Re-read both legs and advance the swap if funding changed.
    async fn confirm_funding(&self, swap_id: SwapId) -> Result<Swap, EscrowError>;

    /// Disclose the secret: withdraw leg B, then leg A.
    async fn reveal_and_withdraw(
        &self,
        swap_id: SwapId,
        receiver: Option<AccountId>,
    ) -> Result<Swap, EscrowError>;

    /// Cancel every leg whose cancellation window is open.
    async fn cancel(&self, swap_id: SwapId) -> Result<Swap, EscrowError>;

    /// Read a swap.
    async fn get_swap(&self, swap_id: SwapId) -> Option<Swap>;
}
