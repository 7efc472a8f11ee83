//! Bridge service: the per-tick transaction state machine.
//!
//! [`BridgeService`] owns both packets, the decoder and the clock.  The main
//! loop calls [`tick`](BridgeService::tick) repeatedly; each call performs at
//! most one receive → decode → respond → send cycle, driven entirely by
//! polling the transport.
//!
//! ```text
//!   Idle ──rx ready──▶ Received ──▶ Dispatching ──▶ ResponseReady
//!    ▲                                                  │ tx free
//!    └────────── re-armed ◀────────── Sending ◀─────────┘
//! ```
//!
//! While the transmit side is busy the service parks in `ResponseReady`
//! and keeps the receive side disarmed, so a second inbound packet can
//! never overwrite the one whose response has not gone out yet.

use log::{debug, info, warn};

use crate::clock::ClockService;
use crate::config::BridgeConfig;
use crate::error::{Result, TransportFault};
use crate::protocol::Packet;
use crate::protocol::decoder::{DecodeReport, PacketDecoder};

use super::events::{BridgeEvent, PacketSummary};
use super::ports::{EventSink, PeripheralPort, TickSource, TransportPort};

// ───────────────────────────────────────────────────────────────
// States and outcomes
// ───────────────────────────────────────────────────────────────

/// Where the current transaction stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionState {
    Idle,
    Received,
    Dispatching,
    ResponseReady,
    Sending,
}

/// What one call to [`BridgeService::tick`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing arrived.
    Idle,
    /// A packet was decoded this tick; `sent` is false when the response
    /// is parked behind a busy transmitter.
    Processed { report: DecodeReport, sent: bool },
    /// A parked response went out this tick.
    Flushed,
    /// A parked response is still waiting.
    Waiting,
}

impl TickOutcome {
    /// Whether a packet was received and processed this tick.
    pub fn processed(&self) -> bool {
        matches!(self, Self::Processed { .. })
    }
}

// ───────────────────────────────────────────────────────────────
// BridgeService
// ───────────────────────────────────────────────────────────────

pub struct BridgeService<T: TickSource> {
    inbound: Packet,
    outbound: Packet,
    decoder: PacketDecoder,
    clock: ClockService<T>,
    state: TransactionState,
    packets: u64,
}

impl<T: TickSource> BridgeService<T> {
    /// Validate `config` and build the service around `ticks`.
    ///
    /// Does **not** arm the transport; call [`start`](Self::start) next.
    pub fn new(config: &BridgeConfig, ticks: T) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            inbound: Packet::new(),
            outbound: Packet::new(),
            decoder: PacketDecoder::new(config),
            clock: ClockService::new(ticks, config),
            state: TransactionState::Idle,
            packets: 0,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Arm the receive side for the first packet.
    pub fn start(
        &mut self,
        transport: &mut impl TransportPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        transport.arm_receive().map_err(|e| {
            warn!("bridge: initial arm failed: {:?}", e);
            TransportFault::Rearm
        })?;
        let epoch_secs = self.clock.epoch_seconds();
        sink.emit(&BridgeEvent::Started { epoch_secs });
        info!("bridge: started, epoch={} s", epoch_secs);
        Ok(())
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run at most one receive → decode → respond → send cycle.
    ///
    /// Transport failures leave the state machine where it was, so the
    /// failed step is retried on the next tick.
    pub fn tick(
        &mut self,
        transport: &mut impl TransportPort,
        hw: &mut impl PeripheralPort,
        sink: &mut impl EventSink,
    ) -> Result<TickOutcome> {
        let mut report = None;

        loop {
            match self.state {
                TransactionState::Idle => {
                    let ready = transport.poll_receive(&mut self.inbound).map_err(|e| {
                        warn!("bridge: receive failed: {:?}", e);
                        TransportFault::Receive
                    })?;
                    if !ready {
                        return Ok(TickOutcome::Idle);
                    }
                    debug!("bridge: rx {:?}", self.inbound);
                    self.transition(TransactionState::Received, sink);
                }
                TransactionState::Received | TransactionState::Dispatching => {
                    self.transition(TransactionState::Dispatching, sink);
                    let r = self.decoder.decode(
                        &self.inbound,
                        &mut self.outbound,
                        &mut self.clock,
                        hw,
                    );
                    self.packets += 1;
                    emit_report(&r, sink);
                    report = Some(r);
                    self.transition(TransactionState::ResponseReady, sink);
                }
                TransactionState::ResponseReady => {
                    if transport.tx_busy() {
                        debug!("bridge: tx busy, response parked");
                        sink.emit(&BridgeEvent::ResponseDeferred);
                        return Ok(outcome(report, false));
                    }
                    transport.submit(&self.outbound).map_err(|e| {
                        warn!("bridge: send failed: {:?}", e);
                        TransportFault::Send
                    })?;
                    debug!("bridge: tx {:?}", self.outbound);
                    self.transition(TransactionState::Sending, sink);
                }
                TransactionState::Sending => {
                    transport.arm_receive().map_err(|e| {
                        warn!("bridge: re-arm failed: {:?}", e);
                        TransportFault::Rearm
                    })?;
                    self.transition(TransactionState::Idle, sink);
                    return Ok(outcome(report, true));
                }
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Packets decoded since startup.
    pub fn packets_processed(&self) -> u64 {
        self.packets
    }

    /// The most recent response, as last built by the decoder.
    pub fn outbound(&self) -> &Packet {
        &self.outbound
    }

    pub fn clock(&self) -> &ClockService<T> {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut ClockService<T> {
        &mut self.clock
    }

    // ── Internal ──────────────────────────────────────────────

    fn transition(&mut self, to: TransactionState, sink: &mut impl EventSink) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        sink.emit(&BridgeEvent::StateChanged { from, to });
    }
}

fn outcome(report: Option<DecodeReport>, sent: bool) -> TickOutcome {
    match (report, sent) {
        (Some(report), sent) => TickOutcome::Processed { report, sent },
        (None, true) => TickOutcome::Flushed,
        (None, false) => TickOutcome::Waiting,
    }
}

fn emit_report(report: &DecodeReport, sink: &mut impl EventSink) {
    for unknown in &report.unknown {
        sink.emit(&BridgeEvent::UnknownOpcode(*unknown));
    }
    if let Some(epoch_secs) = report.clock_set {
        sink.emit(&BridgeEvent::ClockSet { epoch_secs });
    }
    if !report.stop.is_clean() {
        sink.emit(&BridgeEvent::ScanAborted(report.stop));
    }
    sink.emit(&BridgeEvent::PacketProcessed(PacketSummary {
        dispatched: report.dispatched,
        unknown: report.unknown_count,
        response_len: report.response_len,
        stop: report.stop,
    }));
}
