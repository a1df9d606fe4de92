//! Transfer orchestration - the connect → name → size → body sequence.
//!
//! Thin sequencer over the wire layer, one role per function. Any step
//! failure aborts the transfer in place; there is no reconnect-and-resume,
//! because a partially exchanged header cannot be safely resumed mid-frame.
//! Retry, where wanted, wraps the whole sequence at the caller (see
//! [`crate::retry::RetryPolicy`]).

use std::time::Duration;

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::error::{Phase, TransferError};
use crate::wire::framing::{parse_size, read_line, write_line, LineOutcome};
use crate::wire::{receive_body, send_body, DEFAULT_CHUNK_SIZE};

/// Knobs for one transfer.
#[derive(Debug, Clone, Copy)]
pub struct TransferOptions {
    /// Upper bound on each body read/write.
    pub chunk_size: usize,
    /// Per-phase read deadline: bounds each header-line read and each body
    /// chunk read. `None` blocks indefinitely, relying on peer cooperation.
    pub read_timeout: Option<Duration>,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            read_timeout: None,
        }
    }
}

/// A completed inbound transfer.
///
/// `body.len()` always equals `size`. An empty `name` is surfaced as-is:
/// the codec distinguishes it from a closed stream, and what to do with a
/// nameless file is the caller's policy.
#[derive(Debug, Clone)]
pub struct ReceivedFile {
    pub name: String,
    pub size: u64,
    pub body: Bytes,
}

/// Sender role: name line, size line, body bytes.
pub async fn send_file<S>(
    stream: &mut S,
    name: &str,
    body: &[u8],
    opts: &TransferOptions,
) -> Result<(), TransferError>
where
    S: AsyncWrite + Unpin,
{
    write_line(stream, name).await?;
    write_line(stream, &body.len().to_string()).await?;
    send_body(stream, body, opts.chunk_size).await?;
    stream.flush().await?;
    tracing::info!(name, size = body.len(), "file sent");
    Ok(())
}

/// Receiver role: name line, size line, then exactly `size` body bytes.
pub async fn receive_file<S>(
    stream: &mut S,
    opts: &TransferOptions,
) -> Result<ReceivedFile, TransferError>
where
    S: AsyncRead + Unpin,
{
    let name = match header_line(stream, Phase::Name, opts.read_timeout).await? {
        LineOutcome::Line(name) => name,
        LineOutcome::Closed => {
            return Err(TransferError::ClosedBeforeDelimiter { phase: Phase::Name })
        }
    };

    let size = match header_line(stream, Phase::Size, opts.read_timeout).await? {
        LineOutcome::Line(text) => parse_size(&text)?,
        LineOutcome::Closed => {
            return Err(TransferError::ClosedBeforeDelimiter { phase: Phase::Size })
        }
    };

    let body = receive_body(stream, opts.chunk_size, size, opts.read_timeout).await?;
    tracing::info!(name, size, "file received");
    Ok(ReceivedFile { name, size, body })
}

/// Read one header line under the phase's deadline, if any.
async fn header_line<R>(
    reader: &mut R,
    phase: Phase,
    read_timeout: Option<Duration>,
) -> Result<LineOutcome, TransferError>
where
    R: AsyncRead + Unpin,
{
    match read_timeout {
        Some(timeout) => tokio::time::timeout(timeout, read_line(reader))
            .await
            .map_err(|_| TransferError::ReadTimeout { phase, timeout })?,
        None => read_line(reader).await,
    }
}
