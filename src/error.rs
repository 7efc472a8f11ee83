//! Unified error types for the bridge firmware.
//!
//! Command-level problems (unknown opcodes, truncated operands, a full
//! response packet) never leave the decoder; they end up in the
//! [`DecodeReport`](crate::protocol::decoder::DecodeReport).  An encoder
//! overflow is one of those: the decoder turns it into
//! `StopReason::ResponseFull`.  What does propagate is small and `Copy`:
//! transport faults and configuration validation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation outside the decoder funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The packet transport failed.
    Transport(TransportFault),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Encoder errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// The write needs more bytes than the packet has left.
    Overflow { needed: usize, remaining: usize },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overflow { needed, remaining } => {
                write!(f, "response overflow ({needed} bytes, {remaining} left)")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Transport faults
// ---------------------------------------------------------------------------

/// Which transport step failed.  The adapter's own error is logged at the
/// failure site; only the step travels upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFault {
    Receive,
    Send,
    Rearm,
}

impl fmt::Display for TransportFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Receive => write!(f, "receive failed"),
            Self::Send => write!(f, "send failed"),
            Self::Rearm => write!(f, "re-arm failed"),
        }
    }
}

impl From<TransportFault> for Error {
    fn from(e: TransportFault) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
