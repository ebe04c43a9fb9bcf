//! MLLP transport for HL7 v2 messages.
//!
//! The Minimal Lower Layer Protocol wraps each HL7 message in a fixed byte envelope:
//! `0x0B <message> 0x1C 0x0D`. This crate provides:
//! - segment separator normalisation and framing ([`normalize`], [`frame`], [`deframe`])
//! - a single-shot sender that delivers one framed message over TCP and returns the first
//!   chunk the receiver writes back ([`send`], [`MllpClient`])
//!
//! Notes:
//! - The acknowledgment is treated opaquely. No MSA code is inspected and the ACK envelope is
//!   not stripped by [`send`]; use [`Ack::unframe`] if the caller wants the bare message.
//! - Nothing here retries. Retry and backoff belong to the caller, which can branch on
//!   [`MllpError::kind`].

mod client;
mod frame;

pub use client::{send, Ack, MllpClient, MllpConfig};
pub use frame::{deframe, frame, normalize, preview};

use std::time::Duration;

/// Start-of-block byte (vertical tab).
pub const START_BLOCK: u8 = 0x0B;

/// End-of-block byte pair (file separator, carriage return).
pub const END_BLOCK: [u8; 2] = [0x1C, 0x0D];

/// Default receiver host used by the sample sender.
pub const DEFAULT_HOST: &str = "localhost";

/// Default receiver port (the integration engine's LLP listener).
pub const DEFAULT_PORT: u16 = 19002;

/// Default bound on a single exchange.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Coarse classification of transport failures, for callers deciding on retry policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    ConnectFailed,
    AckTimeout,
    StreamError,
}

/// Errors returned by the MLLP transport.
#[derive(Debug, thiserror::Error)]
pub enum MllpError {
    #[error("failed to connect to {addr}: {source}")]
    ConnectFailed {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no acknowledgment from {addr} within {timeout:?}")]
    AckTimeout { addr: String, timeout: Duration },

    #[error("stream error: {0}")]
    StreamError(#[source] std::io::Error),
}

impl MllpError {
    pub fn kind(&self) -> TransportErrorKind {
        match self {
            MllpError::ConnectFailed { .. } => TransportErrorKind::ConnectFailed,
            MllpError::AckTimeout { .. } => TransportErrorKind::AckTimeout,
            MllpError::StreamError(_) => TransportErrorKind::StreamError,
        }
    }
}

/// Type alias for Results that can fail with an [`MllpError`].
pub type MllpResult<T> = Result<T, MllpError>;
