//! # Domain Module
//!
//! Core domain types for the hashlock/timelock escrow.

pub mod entities;
pub mod errors;
pub mod events;
pub mod invariants;
pub mod secure_secret;
pub mod timelocks;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use events::EscrowEvent;
pub use invariants::*;
pub use secure_secret::{SecureSecret, DEFAULT_SECRET_LEN, MIN_SECRET_LEN};
pub use timelocks::TimelockSchedule;
pub use value_objects::*;
