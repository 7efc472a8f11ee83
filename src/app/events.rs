//! Outbound bridge events.
//!
//! The [`BridgeService`](super::service::BridgeService) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (serial log, test recorder, ...).

use crate::protocol::decoder::{StopReason, UnknownOpcode};

use super::service::TransactionState;

/// Structured events emitted by the bridge core.
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeEvent {
    /// The service is up (carries the boot epoch).
    Started { epoch_secs: u32 },

    /// An inbound packet was decoded and its response is ready.
    PacketProcessed(PacketSummary),

    /// An opcode missing from the command table was skipped.
    UnknownOpcode(UnknownOpcode),

    /// The scan stopped on a bounds check rather than the stream's end.
    ScanAborted(StopReason),

    /// The host set the clock.
    ClockSet { epoch_secs: u32 },

    /// The transaction state machine moved.
    StateChanged {
        from: TransactionState,
        to: TransactionState,
    },

    /// A ready response is waiting for the transmit side to free up.
    ResponseDeferred,
}

/// Per-packet numbers suitable for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketSummary {
    pub dispatched: usize,
    pub unknown: usize,
    pub response_len: usize,
    pub stop: StopReason,
}
