//! Fixed-size packet command protocol.
//!
//! Every transfer in either direction is exactly [`BUF_SIZE`] bytes.  The
//! inbound packet carries back-to-back command records, each an opcode
//! followed by its operand bytes, terminated by the [`SENTINEL`] or the end
//! of the buffer:
//!
//! ```text
//! ┌────────┬──────────┬────────┬──────────┬─────┬──────┬─────────┐
//! │ opcode │ operands │ opcode │ operands │ ... │ 0x00 │ padding │
//! └────────┴──────────┴────────┴──────────┴─────┴──────┴─────────┘
//! ```
//!
//! The outbound packet carries one response segment per dispatched command,
//! in arrival order.  Each segment starts with the echoed opcode and its
//! length is fixed by the [`table`], so the host needs no length prefix.

pub mod decoder;
pub mod encoder;
pub mod table;

/// Size of every packet exchanged with the host.
pub const BUF_SIZE: usize = 64;

/// Opcode value marking the end of the command stream.
pub const SENTINEL: u8 = 0x00;

/// One fixed-capacity transfer buffer.
///
/// Inbound and outbound packets are separate owned values.  The decoder and
/// encoder only ever borrow them, which keeps a single transaction in flight.
#[derive(Clone, PartialEq, Eq)]
pub struct Packet {
    bytes: [u8; BUF_SIZE],
}

impl Packet {
    /// An all-zero packet (an empty command stream).
    pub const fn new() -> Self {
        Self {
            bytes: [0; BUF_SIZE],
        }
    }

    /// Build a packet from `data`, zero-padding the tail.
    ///
    /// Bytes past [`BUF_SIZE`] are dropped.
    pub fn from_slice(data: &[u8]) -> Self {
        let mut packet = Self::new();
        let n = data.len().min(BUF_SIZE);
        packet.bytes[..n].copy_from_slice(&data[..n]);
        packet
    }

    pub fn as_bytes(&self) -> &[u8; BUF_SIZE] {
        &self.bytes
    }

    pub fn as_mut_bytes(&mut self) -> &mut [u8; BUF_SIZE] {
        &mut self.bytes
    }

    /// Zero the whole buffer.
    pub fn clear(&mut self) {
        self.bytes = [0; BUF_SIZE];
    }
}

impl Default for Packet {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Packet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // Trailing zero padding is noise in logs.
        let used = self
            .bytes
            .iter()
            .rposition(|&b| b != 0)
            .map_or(0, |i| i + 1);
        write!(f, "Packet({:02x?}", &self.bytes[..used])?;
        if used < BUF_SIZE {
            write!(f, " +{} zero", BUF_SIZE - used)?;
        }
        write!(f, ")")
    }
}
