//! Packet decoder: scans an inbound packet and dispatches every command.
//!
//! The scan walks the packet from offset 0:
//!
//! 1. `0x00` ends the stream.
//! 2. An opcode missing from the [`table`](super::table) sounds a long beep
//!    and the scan resumes at the very next byte.  Operands of an unknown
//!    command cannot be skipped because their length is unknown, so any
//!    operand bytes that follow are read as opcodes.
//! 3. A known opcode takes exactly its declared operand bytes, runs its
//!    handler and appends its response segment.
//!
//! Two conditions end the scan early instead of reading or writing out of
//! bounds: operands that run past the packet end, and a response segment
//! that no longer fits in the outbound packet.  In the second case the
//! command is rejected before its side effect runs.

use log::{debug, warn};

use crate::app::ports::{PeripheralPort, TickSource};
use crate::clock::ClockService;
use crate::config::BridgeConfig;
use crate::error::EncodeError;

use super::encoder::ResponseEncoder;
use super::table::{self, ClockOp, CommandDescriptor, DiagnosticOp, Handler, Operands, PeripheralOp};
use super::{BUF_SIZE, Packet, SENTINEL};

/// Unknown opcodes kept in a [`DecodeReport`] (the count is always exact).
pub const MAX_REPORTED_UNKNOWN: usize = 8;

/// Angle codes cover one full turn: code `n` is `n * 360 / 65535` degrees.
const ANGLE_CODE_SPAN: f32 = 65_535.0;

/// Convert a 16-bit gimbal angle code to degrees in `[0, 360]`.
pub fn angle_from_code(raw: u16) -> f32 {
    f32::from(raw) * 360.0 / ANGLE_CODE_SPAN
}

/// Reassemble a big-endian operand field, most significant byte first.
fn be_value(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0, |acc, &b| (acc << 8) | u32::from(b))
}

// ───────────────────────────────────────────────────────────────
// Report
// ───────────────────────────────────────────────────────────────

/// Why the scan stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Hit the `0x00` sentinel at `offset`.
    Sentinel { offset: usize },
    /// Consumed the whole packet.
    EndOfBuffer,
    /// `opcode` at `offset` declares more operand bytes than remain.
    TruncatedOperands { opcode: u8, offset: usize },
    /// The response segment for `opcode` at `offset` did not fit.
    ResponseFull { opcode: u8, offset: usize },
}

impl StopReason {
    /// The scan ended on the stream's own terms rather than a bounds check.
    pub fn is_clean(self) -> bool {
        matches!(self, Self::Sentinel { .. } | Self::EndOfBuffer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownOpcode {
    pub opcode: u8,
    pub offset: usize,
}

/// Outcome of decoding one packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeReport {
    /// Known commands executed.
    pub dispatched: usize,
    /// Unknown opcodes seen.
    pub unknown_count: usize,
    /// The first [`MAX_REPORTED_UNKNOWN`] unknown opcodes.
    pub unknown: heapless::Vec<UnknownOpcode, MAX_REPORTED_UNKNOWN>,
    /// Bytes written to the outbound packet.
    pub response_len: usize,
    /// Last epoch value applied by SET_TIME, if any.
    pub clock_set: Option<u32>,
    pub stop: StopReason,
}

impl DecodeReport {
    fn new() -> Self {
        Self {
            dispatched: 0,
            unknown_count: 0,
            unknown: heapless::Vec::new(),
            response_len: 0,
            clock_set: None,
            stop: StopReason::EndOfBuffer,
        }
    }

    fn note_unknown(&mut self, opcode: u8, offset: usize) {
        self.unknown_count += 1;
        // Full list: the count above stays exact.
        let _ = self.unknown.push(UnknownOpcode { opcode, offset });
    }
}

// ───────────────────────────────────────────────────────────────
// Decoder
// ───────────────────────────────────────────────────────────────

/// Table-driven command dispatcher.
pub struct PacketDecoder {
    /// Level LASER_TOGGLE restores when switching the laser back on.
    laser_restore: u8,
}

impl PacketDecoder {
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            laser_restore: config.laser_default_power,
        }
    }

    /// Decode `inbound`, run each command and rebuild `outbound` from scratch.
    pub fn decode<T: TickSource>(
        &mut self,
        inbound: &Packet,
        outbound: &mut Packet,
        clock: &mut ClockService<T>,
        hw: &mut impl PeripheralPort,
    ) -> DecodeReport {
        let bytes = inbound.as_bytes();
        let mut out = ResponseEncoder::new(outbound);
        let mut report = DecodeReport::new();
        let mut offset = 0;

        while offset < BUF_SIZE {
            let opcode = bytes[offset];
            if opcode == SENTINEL {
                report.stop = StopReason::Sentinel { offset };
                break;
            }

            let Some(desc) = table::lookup(opcode) else {
                warn!("decoder: unknown opcode 0x{:02x} at {}", opcode, offset);
                report.note_unknown(opcode, offset);
                hw.beep_long();
                offset += 1;
                continue;
            };

            let start = offset + 1;
            let available = BUF_SIZE - start;
            let operand_len = match desc.operands {
                Operands::Fixed(n) if usize::from(n) > available => {
                    warn!(
                        "decoder: {} at {} needs {} operand bytes, {} left",
                        desc.name, offset, n, available
                    );
                    report.stop = StopReason::TruncatedOperands { opcode, offset };
                    break;
                }
                Operands::Fixed(n) => usize::from(n),
                Operands::Optional(n) => usize::from(n).min(available),
            };

            if out.remaining() < desc.segment_len() {
                warn!(
                    "decoder: response full, rejecting {} at {} ({} bytes, {} left)",
                    desc.name,
                    offset,
                    desc.segment_len(),
                    out.remaining()
                );
                report.stop = StopReason::ResponseFull { opcode, offset };
                break;
            }

            let operands = &bytes[start..start + operand_len];
            debug!("decoder: {} {:02x?}", desc.name, operands);

            let before = out.position();
            if let Err(EncodeError::Overflow { .. }) =
                self.execute(desc, operands, &mut out, clock, hw, &mut report)
            {
                report.stop = StopReason::ResponseFull { opcode, offset };
                break;
            }
            debug_assert_eq!(out.position() - before, desc.segment_len(), "{}", desc.name);

            report.dispatched += 1;
            offset = start + operand_len;
        }

        report.response_len = out.position();
        report
    }

    fn execute<T: TickSource>(
        &mut self,
        desc: &CommandDescriptor,
        operands: &[u8],
        out: &mut ResponseEncoder<'_>,
        clock: &mut ClockService<T>,
        hw: &mut impl PeripheralPort,
        report: &mut DecodeReport,
    ) -> Result<(), EncodeError> {
        out.put_u8(desc.opcode)?;
        let value = be_value(operands);

        match desc.handler {
            Handler::Peripheral(op) => self.run_peripheral(op, value, out, clock, hw),
            Handler::Clock(ClockOp::SetTime) => {
                clock.set_time(value);
                report.clock_set = Some(value);
                Ok(())
            }
            Handler::Clock(ClockOp::GetTime) => out.put_timestamp(clock.timestamp()),
            Handler::Diagnostic(op) => run_diagnostic(op, value, out, hw),
        }
    }

    fn run_peripheral<T: TickSource>(
        &mut self,
        op: PeripheralOp,
        value: u32,
        out: &mut ResponseEncoder<'_>,
        clock: &mut ClockService<T>,
        hw: &mut impl PeripheralPort,
    ) -> Result<(), EncodeError> {
        match op {
            PeripheralOp::ReadObjectTemp1 => {
                out.put_u16(hw.object_temperature())?;
                out.put_u16(0)?; // reserved
                out.put_timestamp(clock.timestamp())
            }
            PeripheralOp::ReadObjectTemp2 => {
                out.put_u16(hw.object_temperature_2())?;
                out.put_u16(0)?; // reserved
                out.put_timestamp(clock.timestamp())
            }
            PeripheralOp::ReadAmbientTemp => {
                out.put_u16(hw.ambient_temperature())?;
                out.put_timestamp(clock.timestamp())
            }
            PeripheralOp::SetPan => {
                hw.set_pan(angle_from_code(value as u16));
                Ok(())
            }
            PeripheralOp::SetTilt => {
                hw.set_tilt(angle_from_code(value as u16));
                Ok(())
            }
            PeripheralOp::LaserToggle => {
                let current = hw.power();
                if current > 0 {
                    self.laser_restore = current;
                    hw.set_power(0);
                } else {
                    hw.set_power(self.laser_restore);
                }
                out.put_u8(hw.power())
            }
            PeripheralOp::LaserSet => {
                hw.set_power(value as u8);
                Ok(())
            }
        }
    }
}

fn run_diagnostic(
    op: DiagnosticOp,
    value: u32,
    out: &mut ResponseEncoder<'_>,
    hw: &mut impl PeripheralPort,
) -> Result<(), EncodeError> {
    match op {
        DiagnosticOp::Beep => match value {
            0 => hw.beep(),
            n => hw.beep_multi(n as u8),
        },
        DiagnosticOp::BeepLong => match value {
            0 => hw.beep_long(),
            n => hw.beep_long_multi(n as u8),
        },
        DiagnosticOp::BeepByte => hw.beep_byte(value as u8),
        DiagnosticOp::LedToggle => {
            hw.toggle();
            return out.put_u8(u8::from(hw.is_on()));
        }
        DiagnosticOp::LedSet => {
            hw.set(value != 0);
            return out.put_u8(u8::from(hw.is_on()));
        }
        DiagnosticOp::DelayUs => hw.delay_us(value),
        DiagnosticOp::DelayMs => hw.delay_ms(value),
        DiagnosticOp::GoFlag => debug!("decoder: macro flag"),
    }
    Ok(())
}
