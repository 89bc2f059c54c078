//! # XC-Escrow
//!
//! Hashlock/timelock escrow for trust-minimized two-chain swaps.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Lock a maker's funds on each ledger under one SHA-256 hashlock and a
//! staged timelock schedule:
//! - the taker withdraws by revealing the secret preimage,
//! - the maker recovers the funds once cancellation opens,
//! - third parties (relayers) may act during the public windows.
//!
//! ## Stages
//!
//! | Stage | Withdraw | Cancel |
//! |-------|----------|--------|
//! | Finality | - | - |
//! | PrivateWithdrawal | taker | - |
//! | PublicWithdrawal | anyone | - |
//! | PrivateCancellation | - | maker |
//! | PublicCancellation | - | anyone |
//!
//! ## Module Structure
//!
//! ```text
//! xc-escrow/
//! ├── domain/          # EscrowRecord, Swap, TimelockSchedule, SecureSecret, errors
//! ├── algorithms/      # Secret commitment, settlement rules
//! ├── ports/           # EscrowLedger, SwapCoordinatorApi, TimeSource, DepositVerifier
//! ├── adapters/        # Clocks, ledger clients, event sinks
//! ├── service/         # EscrowEngine, SwapCoordinator
//! └── config.rs        # EscrowConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{
    AcceptAllDeposits, InMemoryLedgerClient, ManualClock, RecordingEventSink, SystemTimeSource,
    TracingEventSink,
};
pub use algorithms::{hash_secret, verify, SecretCommitment};
pub use config::EscrowConfig;
pub use domain::{
    AccountId, Amount, AssetId, ChainId, DepositProof, EscrowError, EscrowEvent, EscrowId,
    EscrowParams, EscrowRecord, EscrowStatus, Hash, LegRef, SecureSecret, Stage, Swap, SwapId,
    SwapLegParams, SwapStatus, TimelockSchedule, Timestamp,
};
pub use ports::{
    DepositVerifier, EscrowLedger, EventSink, SwapCoordinatorApi, TimeSource,
};
pub use service::{EscrowEngine, SwapCoordinator};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    #[allow(clippy::const_is_empty)]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
