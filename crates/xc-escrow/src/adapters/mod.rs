//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implementations of the outbound ports.

mod clock;
mod event_sink;
mod ledger_client;

pub use clock::{ManualClock, SystemTimeSource};
pub use event_sink::{RecordingEventSink, TracingEventSink};
pub use ledger_client::{AcceptAllDeposits, InMemoryLedgerClient};
