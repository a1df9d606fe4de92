//! Newline-framed header lines.
//!
//! Header fields (file name, file size) are UTF-8 text terminated by a
//! single `0x0A`. No carriage return is ever emitted or accepted as part of
//! the framing. The reader consumes one byte at a time so it never reads
//! past the delimiter into the body that follows.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::TransferError;

/// Upper bound on a header line, terminator excluded. A cooperative peer
/// stays far below this; the limit keeps a garbage stream from growing the
/// accumulator without bound.
pub const MAX_LINE_LEN: usize = 4096;

/// Result of reading one header line.
///
/// An empty line and a stream closed before the delimiter are distinct
/// outcomes; how to treat an empty *name* is the caller's decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// A complete line, delimiter excluded. May be empty.
    Line(String),
    /// The peer closed the stream before any newline arrived.
    Closed,
}

/// Write `text` followed by exactly one newline.
///
/// Text containing an embedded newline is refused: it would terminate the
/// frame early and desynchronize every later field.
pub async fn write_line<W>(writer: &mut W, text: &str) -> Result<(), TransferError>
where
    W: AsyncWrite + Unpin,
{
    if text.contains('\n') {
        return Err(TransferError::NameContainsNewline);
    }
    let mut frame = Vec::with_capacity(text.len() + 1);
    frame.extend_from_slice(text.as_bytes());
    frame.push(b'\n');
    writer.write_all(&frame).await?;
    Ok(())
}

/// Read bytes until a newline, one byte at a time.
///
/// Returns [`LineOutcome::Line`] with the accumulated text (newline
/// excluded), or [`LineOutcome::Closed`] if the stream ends first. Bytes
/// after the newline are left unread for the next phase.
pub async fn read_line<R>(reader: &mut R) -> Result<LineOutcome, TransferError>
where
    R: AsyncRead + Unpin,
{
    let mut acc = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        let n = reader.read(&mut byte).await?;
        if n == 0 {
            return Ok(LineOutcome::Closed);
        }
        if byte[0] == b'\n' {
            break;
        }
        if acc.len() == MAX_LINE_LEN {
            return Err(TransferError::HeaderTooLong {
                limit: MAX_LINE_LEN,
            });
        }
        acc.push(byte[0]);
    }
    let text = String::from_utf8(acc).map_err(TransferError::InvalidUtf8)?;
    Ok(LineOutcome::Line(text))
}

/// Parse a size line as the decimal text of a non-negative integer.
///
/// Only ASCII digits are accepted: no sign, no whitespace, no empty line.
/// Anything else is a malformed header, surfaced immediately and never
/// retried.
pub fn parse_size(line: &str) -> Result<u64, TransferError> {
    let malformed = || TransferError::MalformedHeader {
        line: line.to_string(),
    };
    if line.is_empty() || !line.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    line.parse::<u64>().map_err(|_| malformed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn write_line_appends_single_newline() {
        let mut buf = Vec::new();
        write_line(&mut buf, "report.txt").await.unwrap();
        assert_eq!(buf, b"report.txt\n");
    }

    #[tokio::test]
    async fn write_line_rejects_embedded_newline() {
        let mut buf = Vec::new();
        let err = write_line(&mut buf, "bad\nname").await.unwrap_err();
        assert!(matches!(err, TransferError::NameContainsNewline));
        assert!(buf.is_empty());
    }

    #[tokio::test]
    async fn read_line_stops_at_delimiter() {
        let (mut client, mut server) = tokio::io::duplex(64);
        client.write_all(b"report.txt\nrest").await.unwrap();
        drop(client);

        let line = read_line(&mut server).await.unwrap();
        assert_eq!(line, LineOutcome::Line("report.txt".to_string()));

        // The codec must not have consumed anything past the newline.
        let mut rest = Vec::new();
        server.read_to_end(&mut rest).await.unwrap();
        assert_eq!(rest, b"rest");
    }

    #[tokio::test]
    async fn read_line_empty_field() {
        let (mut client, mut server) = tokio::io::duplex(64);
        client.write_all(b"\n").await.unwrap();
        drop(client);

        let line = read_line(&mut server).await.unwrap();
        assert_eq!(line, LineOutcome::Line(String::new()));
    }

    #[tokio::test]
    async fn read_line_closed_before_delimiter() {
        let (mut client, mut server) = tokio::io::duplex(64);
        client.write_all(b"partial").await.unwrap();
        drop(client);

        let line = read_line(&mut server).await.unwrap();
        assert_eq!(line, LineOutcome::Closed);
    }

    #[tokio::test]
    async fn read_line_enforces_length_limit() {
        let (mut client, mut server) = tokio::io::duplex(8192);
        let long = vec![b'a'; MAX_LINE_LEN + 1];
        client.write_all(&long).await.unwrap();

        let err = read_line(&mut server).await.unwrap_err();
        assert!(matches!(err, TransferError::HeaderTooLong { .. }));
    }

    #[tokio::test]
    async fn read_line_rejects_invalid_utf8() {
        let (mut client, mut server) = tokio::io::duplex(64);
        client.write_all(&[0xFF, 0xFE, b'\n']).await.unwrap();
        drop(client);

        let err = read_line(&mut server).await.unwrap_err();
        assert!(matches!(err, TransferError::InvalidUtf8(_)));
    }

    #[test]
    fn parse_size_accepts_plain_decimal() {
        assert_eq!(parse_size("0").unwrap(), 0);
        assert_eq!(parse_size("4096").unwrap(), 4096);
        assert_eq!(
            parse_size("18446744073709551615").unwrap(),
            u64::MAX
        );
    }

    #[test]
    fn parse_size_rejects_garbage() {
        for line in ["abc", "", "-1", "+5", " 5", "5 ", "4.0", "18446744073709551616"] {
            let err = parse_size(line).unwrap_err();
            assert!(
                matches!(err, TransferError::MalformedHeader { .. }),
                "expected malformed header for {line:?}"
            );
        }
    }
}
