//! Failure taxonomy for the courier protocol.
//!
//! Every error is local to one session and propagates synchronously to the
//! caller; nothing below the orchestrator retries.

use std::fmt;
use std::io;
use std::time::Duration;

/// Protocol phase in which a failure occurred.
///
/// The transfer sequence is name line, size line, then body bytes; errors
/// carry the phase so callers can tell a broken header from a truncated body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Reading or writing the file-name line.
    Name,
    /// Reading or writing the file-size line.
    Size,
    /// Transferring the raw body bytes.
    Body,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Name => write!(f, "name header"),
            Phase::Size => write!(f, "size header"),
            Phase::Body => write!(f, "body transfer"),
        }
    }
}

/// Errors produced by the framing codec, the body engine, the session layer,
/// and the orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// The TCP connect did not complete within the configured deadline.
    #[error("connect to {addr} timed out after {timeout:?}")]
    ConnectTimeout { addr: String, timeout: Duration },

    /// The TCP connect failed outright (refused, unreachable, resolution).
    #[error("failed to connect to {addr}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// The size line was not the decimal text of a non-negative integer.
    /// A corrupted header cannot self-correct, so this is never retried.
    #[error("malformed size header: {line:?}")]
    MalformedHeader { line: String },

    /// A header line ran past the framing limit without a newline.
    #[error("header line exceeds {limit} bytes without a terminator")]
    HeaderTooLong { limit: usize },

    /// A header line contained bytes that are not valid UTF-8.
    #[error("header line is not valid UTF-8")]
    InvalidUtf8(#[source] std::string::FromUtf8Error),

    /// `write_line` was handed text with an embedded newline, which would
    /// corrupt the framing for every later field.
    #[error("file name contains an embedded newline")]
    NameContainsNewline,

    /// The peer closed the stream before a header line was terminated.
    /// Distinct from an empty line, which is a legitimate (empty) field.
    #[error("peer closed the connection during the {phase}")]
    ClosedBeforeDelimiter { phase: Phase },

    /// Zero-byte read while the body was still short of the declared size.
    #[error("connection lost after {received} of {declared} body bytes")]
    ConnectionLost { received: u64, declared: u64 },

    /// A configured per-phase read deadline expired with no data.
    #[error("no data within {timeout:?} during the {phase}")]
    ReadTimeout { phase: Phase, timeout: Duration },

    /// Any other stream-level I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_display() {
        assert_eq!(Phase::Name.to_string(), "name header");
        assert_eq!(Phase::Body.to_string(), "body transfer");
    }

    #[test]
    fn connection_lost_reports_counts() {
        let err = TransferError::ConnectionLost {
            received: 40,
            declared: 100,
        };
        assert_eq!(
            err.to_string(),
            "connection lost after 40 of 100 body bytes"
        );
    }

    #[test]
    fn io_errors_convert() {
        let err: TransferError = io::Error::new(io::ErrorKind::BrokenPipe, "pipe").into();
        assert!(matches!(err, TransferError::Io(_)));
    }
}
