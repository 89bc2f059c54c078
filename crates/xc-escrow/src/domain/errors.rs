//! # Domain Errors
//!
//! Error types for the escrow engine and swap coordinator.

use super::value_objects::{EscrowId, SwapId};
use thiserror::Error;

/// Hash type (32-byte SHA-256).
pub type Hash = [u8; 32];

/// Unix timestamp in seconds, as reported by a leg's ledger clock.
pub type Timestamp = u64;

/// Token amount in the asset's smallest unit.
pub type Amount = u128;

/// Escrow and swap error types.
///
/// Every variant is a local validation failure surfaced to the caller;
/// nothing here is retried inside the crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EscrowError {
    /// Secret is empty, too short, or does not match the hashlock.
    #[error("Invalid secret")]
    InvalidSecret,

    /// Timelock offsets violate the stage ordering.
    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    /// Making or taking amount is zero, or a deposit does not match it.
    #[error("Invalid amount")]
    InvalidAmount,

    /// Maker and taker are the same account.
    #[error("Invalid party: maker and taker must differ")]
    InvalidParty,

    /// Transition attempted from a state that does not allow it.
    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition {
        /// Current state
        from: String,
        /// Attempted state
        to: String,
    },

    /// Withdrawal attempted before the finality stage ended.
    #[error("Not yet withdrawable")]
    NotYetWithdrawable,

    /// Withdrawal attempted after the withdrawal windows closed.
    #[error("Withdrawal window closed")]
    WithdrawalWindowClosed,

    /// Cancellation attempted before the cancellation windows opened.
    #[error("Not yet cancellable")]
    NotYetCancellable,

    /// Caller is not allowed to act in the current stage.
    #[error("Unauthorized")]
    Unauthorized,

    /// The two legs of a swap are bound to different hashlocks.
    #[error("Commitment mismatch between swap legs")]
    CommitmentMismatch,

    /// Funding attempted after the schedule reached its terminal stage.
    #[error("Schedule expired")]
    ScheduleExpired,

    /// Escrow not found.
    #[error("Escrow not found: {0}")]
    EscrowNotFound(EscrowId),

    /// Swap not found.
    #[error("Swap not found: {0}")]
    SwapNotFound(SwapId),

    /// The ledger did not confirm the deposit transaction.
    #[error("Deposit not confirmed")]
    DepositNotConfirmed,

    /// Engine is paused by its owner.
    #[error("Escrow engine is paused")]
    Paused,

    /// Failure reported by the ledger client.
    #[error("Ledger error: {0}")]
    Ledger(String),
}

impl EscrowError {
    /// Shorthand for an [`EscrowError::InvalidStateTransition`].
    pub fn transition(from: impl std::fmt::Debug, to: impl std::fmt::Debug) -> Self {
        Self::InvalidStateTransition {
            from: format!("{:?}", from),
            to: format!("{:?}", to),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::EscrowStatus;

    #[test]
    fn test_invalid_secret_error() {
        let err = EscrowError::InvalidSecret;
        assert!(err.to_string().contains("Invalid secret"));
    }

    #[test]
    fn test_transition_error_names_states() {
        let err = EscrowError::transition(EscrowStatus::Withdrawn, EscrowStatus::Withdrawn);
        assert_eq!(
            err.to_string(),
            "Invalid state transition: Withdrawn -> Withdrawn"
        );
    }

    #[test]
    fn test_schedule_error_carries_reason() {
        let err = EscrowError::InvalidSchedule("finality > private_withdrawal".into());
        assert!(err.to_string().contains("finality"));
    }
}
