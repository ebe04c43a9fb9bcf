//! Single-shot MLLP sender.
//!
//! Each call owns exactly one TCP connection for its whole lifetime:
//! `Connecting -> Sending -> AwaitingAck -> {Acked | TimedOut | Errored} -> Closed`.
//! The stream is scoped to [`send`], so it is released once on every exit path (success,
//! error, or timeout) when it drops.

use crate::{
    frame, MllpError, MllpResult, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TIMEOUT, END_BLOCK,
    START_BLOCK,
};
use std::fmt;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{timeout_at, Instant};

const READ_BUFFER_SIZE: usize = 8 * 1024;

/// Stand-in deadline for timeouts too large to add to the current instant.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

// ============================================================================
// Acknowledgment
// ============================================================================

/// Raw bytes returned by the receiver.
///
/// This is the first data chunk read after the message was written. It is not validated
/// as an HL7 ACK; any non-empty chunk counts as an acknowledgment.
#[derive(Clone, PartialEq, Eq)]
pub struct Ack(Vec<u8>);

impl Ack {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }

    /// The acknowledgment with any MLLP envelope bytes trimmed.
    ///
    /// Unlike [`crate::deframe`], this is lenient: a missing start byte or end pair is
    /// tolerated, since receivers differ in what they echo back.
    pub fn unframe(&self) -> &[u8] {
        let body = self.0.strip_prefix(&[START_BLOCK]).unwrap_or(&self.0[..]);
        body.strip_suffix(&END_BLOCK).unwrap_or(body)
    }
}

impl fmt::Debug for Ack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Ack").field(&self.to_string_lossy()).finish()
    }
}

impl fmt::Display for Ack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.unframe()))
    }
}

// ============================================================================
// Configuration and client
// ============================================================================

/// Where and how long to talk to an MLLP receiver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MllpConfig {
    pub host: String,
    pub port: u16,
    /// Bound on the whole exchange: connect, write and the wait for the acknowledgment.
    pub timeout: Duration,
}

impl Default for MllpConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Sender bound to one receiver configuration.
///
/// Holds no connection state between calls; concurrent sends open independent connections.
#[derive(Clone, Debug, Default)]
pub struct MllpClient {
    config: MllpConfig,
}

impl MllpClient {
    pub fn new(config: MllpConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MllpConfig {
        &self.config
    }

    /// Send one message to the configured receiver. See [`send`].
    pub async fn send(&self, message: &str) -> MllpResult<Ack> {
        send(
            message,
            &self.config.host,
            self.config.port,
            self.config.timeout,
        )
        .await
    }
}

// ============================================================================
// Send
// ============================================================================

/// Deliver one HL7 message to `(host, port)` and return the receiver's acknowledgment.
///
/// The message is normalised and framed, written once, and the first chunk read back is
/// returned as the acknowledgment. The connection is closed before returning.
///
/// # Errors
///
/// - [`MllpError::ConnectFailed`] if the connection is refused, the host does not resolve,
///   or connecting does not finish within `timeout`.
/// - [`MllpError::AckTimeout`] if `timeout` expires after connecting and before any
///   acknowledgment bytes arrive.
/// - [`MllpError::StreamError`] if the write or read fails, or the peer closes without
///   sending anything.
pub async fn send(message: &str, host: &str, port: u16, timeout: Duration) -> MllpResult<Ack> {
    let addr = format!("{host}:{port}");
    let deadline = deadline_after(timeout);

    tracing::info!("Connecting to MLLP receiver at {}", addr);
    let mut stream = match timeout_at(deadline, TcpStream::connect(&addr)).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(source)) => {
            tracing::warn!("Connect to {} failed: {}", addr, source);
            return Err(MllpError::ConnectFailed { addr, source });
        }
        Err(_) => {
            tracing::warn!("Connect to {} timed out after {:?}", addr, timeout);
            return Err(MllpError::ConnectFailed {
                addr,
                source: std::io::Error::new(std::io::ErrorKind::TimedOut, "connect timed out"),
            });
        }
    };

    let result = exchange(&mut stream, message, deadline).await;
    drop(stream);
    tracing::debug!("Connection to {} closed", addr);

    match result {
        Ok(ack) => {
            tracing::info!("Received {} byte acknowledgment from {}", ack.0.len(), addr);
            Ok(ack)
        }
        Err(Exchange::TimedOut) => {
            tracing::warn!("No acknowledgment from {} within {:?}", addr, timeout);
            Err(MllpError::AckTimeout { addr, timeout })
        }
        Err(Exchange::Io(source)) => {
            tracing::warn!("Stream error talking to {}: {}", addr, source);
            Err(MllpError::StreamError(source))
        }
    }
}

fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout).unwrap_or(now + FAR_FUTURE)
}

/// Failure inside an open connection, before it is attributed to a peer address.
enum Exchange {
    TimedOut,
    Io(std::io::Error),
}

async fn exchange(
    stream: &mut TcpStream,
    message: &str,
    deadline: Instant,
) -> Result<Ack, Exchange> {
    let framed = frame(message);
    tracing::debug!("Writing {} framed bytes", framed.len());

    timeout_at(deadline, stream.write_all(&framed))
        .await
        .map_err(|_| Exchange::TimedOut)?
        .map_err(Exchange::Io)?;

    let mut buf = vec![0u8; READ_BUFFER_SIZE];
    let n = timeout_at(deadline, stream.read(&mut buf))
        .await
        .map_err(|_| Exchange::TimedOut)?
        .map_err(Exchange::Io)?;

    if n == 0 {
        return Err(Exchange::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "peer closed the connection without acknowledging",
        )));
    }

    buf.truncate(n);
    Ok(Ack(buf))
}
