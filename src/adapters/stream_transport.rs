//! Packet transport over any byte-oriented channel.
//!
//! Concrete channels:
//! - UART (USB-UART bridge to the host) on ESP-IDF, see
//!   [`uart_channel`](super::uart_channel)
//! - in-memory channels in tests
//!
//! The host always sends whole [`BUF_SIZE`] packets, so framing is just
//! counting bytes.  Reading only happens while the receive side is armed;
//! between delivery and re-arm the bytes wait in the channel's own buffer.

use log::{debug, warn};

use crate::app::ports::TransportPort;
use crate::protocol::{BUF_SIZE, Packet};

/// Zero-progress writes tolerated before a submit gives up.
const MAX_STALLED_WRITES: u8 = 8;

/// Byte-oriented channel.
pub trait ByteChannel {
    /// Error type for this channel.
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes into `buf`.
    /// Returns the number of bytes actually read.
    /// Returns 0 if no data is available (non-blocking).
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write `data` to the channel.
    /// Returns the number of bytes actually accepted.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Whether earlier writes are still draining.
    fn tx_pending(&self) -> bool;
}

/// A null channel that discards all writes and never reads.
/// Useful as a default when no host is attached.
pub struct NullChannel;

impl ByteChannel for NullChannel {
    type Error = ();

    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, ()> {
        Ok(0)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }

    fn tx_pending(&self) -> bool {
        false
    }
}

#[derive(Debug)]
pub enum StreamError<E> {
    Channel(E),
    /// The channel stopped accepting bytes mid-packet.
    WriteStalled { written: usize },
}

/// Assembles fixed-size packets from a [`ByteChannel`].
pub struct StreamPacketTransport<C> {
    channel: C,
    staging: Packet,
    filled: usize,
    armed: bool,
}

impl<C: ByteChannel> StreamPacketTransport<C> {
    /// Wrap `channel`.  The receive side starts disarmed.
    pub fn new(channel: C) -> Self {
        Self {
            channel,
            staging: Packet::new(),
            filled: 0,
            armed: false,
        }
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }
}

impl<C: ByteChannel> TransportPort for StreamPacketTransport<C> {
    type Error = StreamError<C::Error>;

    fn poll_receive(&mut self, packet: &mut Packet) -> Result<bool, Self::Error> {
        if !self.armed {
            return Ok(false);
        }
        let n = self
            .channel
            .read(&mut self.staging.as_mut_bytes()[self.filled..])
            .map_err(StreamError::Channel)?;
        self.filled += n;
        if self.filled < BUF_SIZE {
            return Ok(false);
        }
        *packet = self.staging.clone();
        self.armed = false;
        self.filled = 0;
        Ok(true)
    }

    fn tx_busy(&self) -> bool {
        self.channel.tx_pending()
    }

    fn submit(&mut self, packet: &Packet) -> Result<(), Self::Error> {
        let bytes = packet.as_bytes();
        let mut written = 0;
        let mut stalls = 0;
        while written < BUF_SIZE {
            let n = self
                .channel
                .write(&bytes[written..])
                .map_err(StreamError::Channel)?;
            if n == 0 {
                stalls += 1;
                if stalls >= MAX_STALLED_WRITES {
                    warn!("stream: write stalled after {} bytes", written);
                    return Err(StreamError::WriteStalled { written });
                }
                continue;
            }
            written += n;
        }
        self.channel.flush().map_err(StreamError::Channel)
    }

    fn arm_receive(&mut self) -> Result<(), Self::Error> {
        if self.filled > 0 {
            debug!("stream: discarding {} staged bytes on re-arm", self.filled);
        }
        self.staging.clear();
        self.filled = 0;
        self.armed = true;
        Ok(())
    }
}
