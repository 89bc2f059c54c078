//! # Algorithms Module
//!
//! Secret commitments and swap settlement rules.

pub mod commitment;
pub mod settlement;

pub use commitment::{hash_secret, verify, SecretCommitment};
pub use settlement::{funding_outcome, reveal_precheck, FundingOutcome, LegView};
