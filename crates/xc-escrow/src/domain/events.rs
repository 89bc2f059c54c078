//! # Escrow Events
//!
//! Lifecycle notifications published by the engine through an
//! [`EventSink`](crate::ports::outbound::EventSink).

use super::errors::{Amount, Hash, Timestamp};
use super::secure_secret::SecureSecret;
use super::value_objects::{AccountId, AssetId, ChainId, EscrowId};
use serde::{Deserialize, Serialize};

/// Escrow lifecycle event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EscrowEvent {
    /// Escrow created.
    Created {
        /// Escrow id.
        escrow_id: EscrowId,
        /// Ledger.
        chain: ChainId,
        /// Depositor.
        maker: AccountId,
        /// Withdrawer.
        taker: AccountId,
        /// Locked asset.
        maker_asset: AssetId,
        /// Counter asset.
        taker_asset: AssetId,
        /// Locked amount.
        making_amount: Amount,
        /// Counter amount.
        taking_amount: Amount,
    },
    /// Maker deposit accepted.
    Funded {
        /// Escrow id.
        escrow_id: EscrowId,
        /// Depositor.
        maker: AccountId,
        /// Hashlock now guarding the funds.
        commitment_hash: Hash,
        /// Funding time.
        at: Timestamp,
    },
    /// Funds released with the secret. The secret is public from here on.
    Withdrawn {
        /// Escrow id.
        escrow_id: EscrowId,
        /// Recipient.
        receiver: AccountId,
        /// Revealed preimage.
        secret: SecureSecret,
        /// Withdrawal time.
        at: Timestamp,
    },
    /// Escrow cancelled.
    Cancelled {
        /// Escrow id.
        escrow_id: EscrowId,
        /// Refund recipient, if the escrow was funded.
        refunded_to: Option<AccountId>,
        /// Cancellation time.
        at: Timestamp,
    },
    /// Engine paused by its owner.
    Paused {
        /// Ledger.
        chain: ChainId,
    },
    /// Engine resumed by its owner.
    Unpaused {
        /// Ledger.
        chain: ChainId,
    },
}

impl EscrowEvent {
    /// Short name, used as the log message.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Created { .. } => "escrow_created",
            Self::Funded { .. } => "escrow_funded",
            Self::Withdrawn { .. } => "escrow_withdrawn",
            Self::Cancelled { .. } => "escrow_cancelled",
            Self::Paused { .. } => "engine_paused",
            Self::Unpaused { .. } => "engine_unpaused",
        }
    }
}
