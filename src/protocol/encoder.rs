//! Response encoder: append-only big-endian writer over the outbound packet.
//!
//! Constructing an encoder zeroes the packet and puts the cursor at 0, so
//! there is exactly one reset per service tick.  Every write is checked
//! against the remaining space and either lands completely or not at all.

use crate::clock::Timestamp;
use crate::error::EncodeError;

use super::{BUF_SIZE, Packet};

/// Write cursor over a borrowed outbound [`Packet`].
pub struct ResponseEncoder<'a> {
    packet: &'a mut Packet,
    cursor: usize,
}

impl<'a> ResponseEncoder<'a> {
    /// Zero `packet` and start writing at offset 0.
    pub fn new(packet: &'a mut Packet) -> Self {
        packet.clear();
        Self { packet, cursor: 0 }
    }

    /// Bytes written so far.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Bytes still available before the packet is full.
    pub fn remaining(&self) -> usize {
        BUF_SIZE - self.cursor
    }

    pub fn put_u8(&mut self, value: u8) -> Result<(), EncodeError> {
        self.put(&[value])
    }

    pub fn put_u16(&mut self, value: u16) -> Result<(), EncodeError> {
        self.put(&value.to_be_bytes())
    }

    pub fn put_u32(&mut self, value: u32) -> Result<(), EncodeError> {
        self.put(&value.to_be_bytes())
    }

    /// Append the 6-byte timestamp shared by every time-reporting command.
    pub fn put_timestamp(&mut self, ts: Timestamp) -> Result<(), EncodeError> {
        self.reserve(6)?;
        self.put_u32(ts.seconds)?;
        self.put_u16(ts.millis)
    }

    fn reserve(&self, needed: usize) -> Result<(), EncodeError> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(EncodeError::Overflow { needed, remaining });
        }
        Ok(())
    }

    fn put(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        self.reserve(bytes.len())?;
        let end = self.cursor + bytes.len();
        self.packet.as_mut_bytes()[self.cursor..end].copy_from_slice(bytes);
        self.cursor = end;
        Ok(())
    }
}
