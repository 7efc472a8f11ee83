//! Port traits: the hexagonal boundary between the command core and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ PacketDecoder / BridgeService (domain)
//! ```
//!
//! Peripheral drivers, the packet transport, the hardware tick counter and
//! the event sink implement these traits.  The core consumes them via
//! generics, so it never touches registers directly.

use embedded_hal::delay::DelayNs;

use crate::protocol::Packet;

// ───────────────────────────────────────────────────────────────
// Peripheral capability ports (domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Laser diode power stage.
pub trait LaserControl {
    /// Set output power (0 = off, 255 = full).
    fn set_power(&mut self, level: u8);

    /// Last commanded power level.
    fn power(&self) -> u8;
}

/// Pan/tilt gimbal.  Angles are degrees in `[0, 360]`.
pub trait GimbalControl {
    fn set_pan(&mut self, degrees: f32);
    fn set_tilt(&mut self, degrees: f32);
}

/// Piezo buzzer.  Every call blocks for the duration of the pattern.
pub trait AudioSignal {
    /// One short beep.
    fn beep(&mut self);

    /// `count` short beeps.
    fn beep_multi(&mut self, count: u8);

    /// One long beep.  Also the decoder's "unknown opcode" signal.
    fn beep_long(&mut self);

    /// `count` long beeps.
    fn beep_long_multi(&mut self, count: u8);

    /// Play `pattern` MSB first: 1 = beep slot, 0 = silent slot.
    fn beep_byte(&mut self, pattern: u8);
}

/// Non-contact IR thermometer.
///
/// Readings are the sensor's raw 16-bit fixed-point format, forwarded to
/// the host untouched.
pub trait TemperatureSensor {
    fn object_temperature(&mut self) -> u16;
    fn object_temperature_2(&mut self) -> u16;
    fn ambient_temperature(&mut self) -> u16;
}

/// Single debug/status LED with a readable output latch.
pub trait StatusIndicator {
    fn toggle(&mut self);
    fn set(&mut self, on: bool);
    /// Read back the output latch.
    fn is_on(&mut self) -> bool;
}

/// Everything the decoder can reach.  Blanket-implemented, so a single
/// `&mut` hardware bundle satisfies it without double borrows.
pub trait PeripheralPort:
    LaserControl + GimbalControl + AudioSignal + TemperatureSensor + StatusIndicator + DelayNs
{
}

impl<T> PeripheralPort for T where
    T: LaserControl + GimbalControl + AudioSignal + TemperatureSensor + StatusIndicator + DelayNs
{
}

// ───────────────────────────────────────────────────────────────
// Tick source (hardware → clock)
// ───────────────────────────────────────────────────────────────

/// Free-running hardware timer.
///
/// The physical counter is 16 bits wide and wraps silently; sources extend
/// it so that long blocking commands cannot swallow whole wrap periods.
pub trait TickSource {
    /// Ticks since the last [`reset`](Self::reset).  Never wraps.
    fn elapsed_ticks(&self) -> u64;

    /// The raw counter view: [`elapsed_ticks`](Self::elapsed_ticks)
    /// truncated to 16 bits.
    fn ticks(&self) -> u16 {
        self.elapsed_ticks() as u16
    }

    /// Zero the counter.
    fn reset(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Packet transport (host ↔ domain)
// ───────────────────────────────────────────────────────────────

/// Fixed-size packet endpoint pair, observed by polling only.
///
/// The receive side is armed for exactly one packet at a time: once
/// [`poll_receive`](Self::poll_receive) has delivered a packet, nothing more
/// arrives until [`arm_receive`](Self::arm_receive) is called.
pub trait TransportPort {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Copy a completed inbound packet into `packet`.
    /// Returns `Ok(false)` when nothing has arrived yet (non-blocking).
    fn poll_receive(&mut self, packet: &mut Packet) -> Result<bool, Self::Error>;

    /// Whether the previous outbound packet is still in flight.
    fn tx_busy(&self) -> bool;

    /// Hand `packet` to the transmit side.  Only valid when not busy.
    fn submit(&mut self, packet: &Packet) -> Result<(), Self::Error>;

    /// Ready the receive side for the next inbound packet.
    fn arm_receive(&mut self) -> Result<(), Self::Error>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The core emits structured [`BridgeEvent`](super::events::BridgeEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::BridgeEvent);
}
