//! Command table: the single source of truth for the wire protocol.
//!
//! Each row declares an opcode, how many operand bytes follow it in the
//! inbound packet, how many data bytes follow the echoed opcode in the
//! response, and which [`Handler`] runs it.  The decoder consumes operands
//! and selects handlers from the same row, so the declared wire shape and
//! the dispatch logic cannot drift apart.
//!
//! | Range  | Group                        |
//! |--------|------------------------------|
//! | `0x1*` | buzzer / indicator (debug)   |
//! | `0x3*` | IR thermometer               |
//! | `0x4*` | clock                        |
//! | `0x6*` | gimbal servos                |
//! | `0x7*` | laser                        |
//! | `0x8*` | blocking delays              |
//! | `0x9*` | macro flags                  |

use super::SENTINEL;

// ---------------------------------------------------------------------------
// Opcodes
// ---------------------------------------------------------------------------

pub const BEEP: u8 = 0x10;
pub const BEEP_LONG: u8 = 0x11;
pub const BEEP_BYTE: u8 = 0x12;
pub const LED_TOGGLE: u8 = 0x15;
pub const LED_SET: u8 = 0x16;
pub const GET_OBJECT_TEMP_1: u8 = 0x30;
pub const GET_OBJECT_TEMP_2: u8 = 0x31;
pub const GET_AMBIENT_TEMP: u8 = 0x32;
pub const SET_TIME: u8 = 0x40;
pub const GET_TIME: u8 = 0x41;
pub const SET_PAN: u8 = 0x60;
pub const SET_TILT: u8 = 0x61;
pub const LASER_TOGGLE: u8 = 0x70;
pub const LASER_SET: u8 = 0x71;
pub const DELAY_US: u8 = 0x80;
pub const DELAY_MS: u8 = 0x81;
pub const GO_FLAG: u8 = 0x90;

/// Bytes of the shared timestamp field (`u32` seconds + `u16` millis).
pub const TIMESTAMP_BYTES: u8 = 4 + 2;

// ---------------------------------------------------------------------------
// Handler sum type
// ---------------------------------------------------------------------------

/// Which capability a command is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    Peripheral(PeripheralOp),
    Clock(ClockOp),
    Diagnostic(DiagnosticOp),
}

/// Commands served by the laser, gimbal and thermometer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeripheralOp {
    ReadObjectTemp1,
    ReadObjectTemp2,
    ReadAmbientTemp,
    SetPan,
    SetTilt,
    LaserToggle,
    LaserSet,
}

/// Commands served by the [`ClockService`](crate::clock::ClockService).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockOp {
    SetTime,
    GetTime,
}

/// Operator feedback, debug indicator, pacing and macro markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticOp {
    Beep,
    BeepLong,
    BeepByte,
    LedToggle,
    LedSet,
    DelayUs,
    DelayMs,
    GoFlag,
}

// ---------------------------------------------------------------------------
// Descriptor
// ---------------------------------------------------------------------------

/// How many operand bytes follow an opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operands {
    /// Exactly `n` bytes; a packet that ends early is malformed.
    Fixed(u8),
    /// Up to `n` bytes; fewer only when the packet ends first.
    Optional(u8),
}

impl Operands {
    pub const fn max_bytes(self) -> u8 {
        match self {
            Self::Fixed(n) | Self::Optional(n) => n,
        }
    }
}

/// One row of the command table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub opcode: u8,
    pub name: &'static str,
    pub operands: Operands,
    /// Data bytes appended after the echoed opcode.
    pub response_bytes: u8,
    pub handler: Handler,
}

impl CommandDescriptor {
    /// Total bytes this command appends to the outbound packet.
    pub const fn segment_len(&self) -> usize {
        1 + self.response_bytes as usize
    }
}

const fn row(
    opcode: u8,
    name: &'static str,
    operands: Operands,
    response_bytes: u8,
    handler: Handler,
) -> CommandDescriptor {
    CommandDescriptor {
        opcode,
        name,
        operands,
        response_bytes,
        handler,
    }
}

use Handler::{Clock, Diagnostic, Peripheral};
use Operands::{Fixed, Optional};

/// Every opcode the firmware understands.
pub static COMMAND_TABLE: [CommandDescriptor; 17] = [
    // 0x1* buzzer / indicator
    row(BEEP, "BEEP", Optional(1), 0, Diagnostic(DiagnosticOp::Beep)),
    row(BEEP_LONG, "BEEP_LONG", Fixed(1), 0, Diagnostic(DiagnosticOp::BeepLong)),
    row(BEEP_BYTE, "BEEP_BYTE", Fixed(1), 0, Diagnostic(DiagnosticOp::BeepByte)),
    row(LED_TOGGLE, "LED_TOGGLE", Fixed(0), 1, Diagnostic(DiagnosticOp::LedToggle)),
    row(LED_SET, "LED_SET", Fixed(1), 1, Diagnostic(DiagnosticOp::LedSet)),
    // 0x3* thermometer: temp + reserved + timestamp
    row(
        GET_OBJECT_TEMP_1,
        "GET_OBJECT_TEMP_1",
        Fixed(0),
        2 + 2 + TIMESTAMP_BYTES,
        Peripheral(PeripheralOp::ReadObjectTemp1),
    ),
    row(
        GET_OBJECT_TEMP_2,
        "GET_OBJECT_TEMP_2",
        Fixed(0),
        2 + 2 + TIMESTAMP_BYTES,
        Peripheral(PeripheralOp::ReadObjectTemp2),
    ),
    row(
        GET_AMBIENT_TEMP,
        "GET_AMBIENT_TEMP",
        Fixed(0),
        2 + TIMESTAMP_BYTES,
        Peripheral(PeripheralOp::ReadAmbientTemp),
    ),
    // 0x4* clock
    row(SET_TIME, "SET_TIME", Fixed(4), 0, Clock(ClockOp::SetTime)),
    row(GET_TIME, "GET_TIME", Fixed(0), TIMESTAMP_BYTES, Clock(ClockOp::GetTime)),
    // 0x6* gimbal, 16-bit angle code
    row(SET_PAN, "SET_PAN", Fixed(2), 0, Peripheral(PeripheralOp::SetPan)),
    row(SET_TILT, "SET_TILT", Fixed(2), 0, Peripheral(PeripheralOp::SetTilt)),
    // 0x7* laser
    row(LASER_TOGGLE, "LASER_TOGGLE", Fixed(0), 1, Peripheral(PeripheralOp::LaserToggle)),
    row(LASER_SET, "LASER_SET", Fixed(1), 0, Peripheral(PeripheralOp::LaserSet)),
    // 0x8* delays
    row(DELAY_US, "DELAY_US", Fixed(2), 0, Diagnostic(DiagnosticOp::DelayUs)),
    row(DELAY_MS, "DELAY_MS", Fixed(2), 0, Diagnostic(DiagnosticOp::DelayMs)),
    // 0x9* macro marker
    row(GO_FLAG, "GO_FLAG", Fixed(0), 0, Diagnostic(DiagnosticOp::GoFlag)),
];

/// Find the descriptor for `opcode`.  The sentinel never matches.
pub fn lookup(opcode: u8) -> Option<&'static CommandDescriptor> {
    if opcode == SENTINEL {
        return None;
    }
    COMMAND_TABLE.iter().find(|d| d.opcode == opcode)
}
