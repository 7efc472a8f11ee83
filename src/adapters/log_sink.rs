//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured bridge events to the
//! ESP-IDF logger (UART console in production).
//! Deferred responses are counted and reported once the stall ends, so a
//! busy host link does not flood the console.

use log::{debug, info, warn};

use crate::app::events::BridgeEvent;
use crate::app::ports::EventSink;
use crate::app::service::TransactionState;

/// Adapter that logs every [`BridgeEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink {
    deferred: u32,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deferrals seen since the last completed send.
    pub fn pending_deferrals(&self) -> u32 {
        self.deferred
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &BridgeEvent) {
        match event {
            BridgeEvent::Started { epoch_secs } => {
                info!("START | epoch={}s", epoch_secs);
            }
            BridgeEvent::PacketProcessed(s) => {
                info!(
                    "PACKET | dispatched={} unknown={} | response={}B | stop={:?}",
                    s.dispatched, s.unknown, s.response_len, s.stop,
                );
            }
            BridgeEvent::UnknownOpcode(u) => {
                warn!("UNKNOWN | opcode=0x{:02x} @{}", u.opcode, u.offset);
            }
            BridgeEvent::ScanAborted(reason) => {
                warn!("ABORT | {:?}", reason);
            }
            BridgeEvent::ClockSet { epoch_secs } => {
                info!("CLOCK | set epoch={}s", epoch_secs);
            }
            BridgeEvent::StateChanged { from, to } => {
                if *from == TransactionState::Sending && self.deferred > 0 {
                    info!("TX | sent after {} deferrals", self.deferred);
                    self.deferred = 0;
                }
                debug!("STATE | {:?} -> {:?}", from, to);
            }
            BridgeEvent::ResponseDeferred => {
                if self.deferred == 0 {
                    info!("TX | busy, response deferred");
                }
                self.deferred = self.deferred.saturating_add(1);
            }
        }
    }
}
