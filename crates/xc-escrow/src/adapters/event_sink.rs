//! Event Sink Adapters

use crate::domain::EscrowEvent;
use crate::ports::outbound::EventSink;
use parking_lot::Mutex;
use tracing::info;

/// Publishes events as structured log lines.
///
/// The secret carried by `Withdrawn` is not logged.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn publish(&self, event: EscrowEvent) {
        match &event {
            EscrowEvent::Created {
                escrow_id,
                chain,
                maker,
                taker,
                making_amount,
                ..
            } => info!(%escrow_id, %chain, %maker, %taker, making_amount, "{}", event.name()),
            EscrowEvent::Funded { escrow_id, at, .. } => {
                info!(%escrow_id, at, "{}", event.name())
            }
            EscrowEvent::Withdrawn {
                escrow_id,
                receiver,
                at,
                ..
            } => info!(%escrow_id, %receiver, at, "{}", event.name()),
            EscrowEvent::Cancelled {
                escrow_id,
                refunded_to,
                at,
            } => info!(%escrow_id, refunded_to = ?refunded_to, at, "{}", event.name()),
            EscrowEvent::Paused { chain } | EscrowEvent::Unpaused { chain } => {
                info!(%chain, "{}", event.name())
            }
        }
    }
}

/// Keeps every published event in memory.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<EscrowEvent>>,
}

impl RecordingEventSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything published so far.
    pub fn events(&self) -> Vec<EscrowEvent> {
        self.events.lock().clone()
    }

    /// Number of events published so far.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// True when nothing was published.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventSink for RecordingEventSink {
    fn publish(&self, event: EscrowEvent) {
        self.events.lock().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ChainId;

    #[test]
    fn test_recording_sink_keeps_order() {
        let sink = RecordingEventSink::new();
        assert!(sink.is_empty());
        sink.publish(EscrowEvent::Paused {
            chain: ChainId::Near,
        });
        sink.publish(EscrowEvent::Unpaused {
            chain: ChainId::Near,
        });
        let events = sink.events();
        assert_eq!(sink.len(), 2);
        assert!(matches!(events[0], EscrowEvent::Paused { .. }));
        assert!(matches!(events[1], EscrowEvent::Unpaused { .. }));
    }

    #[test]
    fn test_tracing_sink_accepts_all_events() {
        TracingEventSink.publish(EscrowEvent::Paused {
            chain: ChainId::Ethereum,
        });
    }
}
