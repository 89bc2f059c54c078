//! Escrow Services - core business logic
//!
//! - [`EscrowEngine`]: one ledger's escrow state machine.
//! - [`SwapCoordinator`]: pairs two ledgers under one hashlock.

mod coordinator;
mod engine;

pub use coordinator::SwapCoordinator;
pub use engine::EscrowEngine;
