//! Chunked body transfer engine.
//!
//! Moves exactly the declared byte count, one bounded chunk at a time.
//! Partial reads are expected and folded into the running total; a zero-byte
//! read before the total is satisfied means the peer is gone.

use std::time::Duration;

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{Phase, TransferError};

/// Default chunk size for body reads and writes.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Receive exactly `declared` body bytes in chunks of at most `chunk_size`.
///
/// Each read requests `min(chunk_size, declared - received)` bytes, so the
/// engine never consumes stream data past the declared size. When
/// `read_timeout` is set it bounds every individual read; `None` blocks
/// until the peer delivers data or closes.
///
/// Errors:
/// - [`TransferError::ConnectionLost`] on a zero-byte read while short of
///   the declared size, with the exact byte count received so far.
/// - [`TransferError::ReadTimeout`] when a configured deadline expires.
pub async fn receive_body<R>(
    reader: &mut R,
    chunk_size: usize,
    declared: u64,
    read_timeout: Option<Duration>,
) -> Result<Bytes, TransferError>
where
    R: AsyncRead + Unpin,
{
    assert!(chunk_size > 0, "chunk size must be non-zero");

    let mut body = BytesMut::with_capacity(declared as usize);
    let mut buf = vec![0u8; chunk_size.min(declared as usize).max(1)];
    let mut received: u64 = 0;

    while received < declared {
        let want = (chunk_size as u64).min(declared - received) as usize;
        let read = reader.read(&mut buf[..want]);
        let n = match read_timeout {
            Some(timeout) => tokio::time::timeout(timeout, read)
                .await
                .map_err(|_| TransferError::ReadTimeout {
                    phase: Phase::Body,
                    timeout,
                })??,
            None => read.await?,
        };
        if n == 0 {
            return Err(TransferError::ConnectionLost { received, declared });
        }
        body.extend_from_slice(&buf[..n]);
        received += n as u64;
        debug_assert!(received <= declared);
    }

    tracing::debug!(bytes = received, "body received");
    Ok(body.freeze())
}

/// Write the full body in `chunk_size` slices.
///
/// A single bulk write would satisfy the protocol; chunking keeps the send
/// path uniform with the receive path for arbitrarily large payloads.
pub async fn send_body<W>(
    writer: &mut W,
    body: &[u8],
    chunk_size: usize,
) -> Result<(), TransferError>
where
    W: AsyncWrite + Unpin,
{
    assert!(chunk_size > 0, "chunk size must be non-zero");

    for chunk in body.chunks(chunk_size) {
        writer.write_all(chunk).await?;
    }
    tracing::debug!(bytes = body.len(), "body sent");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::{AsyncWriteExt, ReadBuf};

    /// Wrapper that serves at most `limit` bytes per read, regardless of how
    /// many were requested. Exercises the partial-read path.
    struct Trickle<R> {
        inner: R,
        limit: usize,
    }

    impl<R: AsyncRead + Unpin> AsyncRead for Trickle<R> {
        fn poll_read(
            mut self: Pin<&mut Self>,
            cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<std::io::Result<()>> {
            let limit = self.limit.min(buf.remaining());
            let mut small = vec![0u8; limit];
            let mut small_buf = ReadBuf::new(&mut small);
            match Pin::new(&mut self.inner).poll_read(cx, &mut small_buf) {
                Poll::Ready(Ok(())) => {
                    buf.put_slice(small_buf.filled());
                    Poll::Ready(Ok(()))
                }
                other => other,
            }
        }
    }

    #[tokio::test]
    async fn receives_exactly_declared_size() {
        let payload = b"hello world payload".to_vec();
        let mut reader: &[u8] = &payload;
        let body = receive_body(&mut reader, 4, payload.len() as u64, None)
            .await
            .unwrap();
        assert_eq!(body.as_ref(), payload.as_slice());
    }

    #[tokio::test]
    async fn leaves_trailing_bytes_unread() {
        let mut reader: &[u8] = b"hellothere";
        let body = receive_body(&mut reader, 64, 5, None).await.unwrap();
        assert_eq!(body.as_ref(), b"hello");
        assert_eq!(reader, b"there");
    }

    #[tokio::test]
    async fn zero_declared_size_reads_nothing() {
        let mut reader: &[u8] = b"";
        let body = receive_body(&mut reader, 8, 0, None).await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn partial_reads_accumulate() {
        let payload: Vec<u8> = (0u8..=255).cycle().take(1000).collect();
        let mut reader = Trickle {
            inner: payload.as_slice(),
            limit: 3,
        };
        let body = receive_body(&mut reader, 256, 1000, None).await.unwrap();
        assert_eq!(body.as_ref(), payload.as_slice());
    }

    #[tokio::test]
    async fn premature_close_reports_byte_count() {
        let mut reader: &[u8] = &[7u8; 40];
        let err = receive_body(&mut reader, 16, 100, None).await.unwrap_err();
        match err {
            TransferError::ConnectionLost { received, declared } => {
                assert_eq!(received, 40);
                assert_eq!(declared, 100);
            }
            other => panic!("expected ConnectionLost, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn stalled_peer_trips_read_deadline() {
        let (_client, mut server) = tokio::io::duplex(64);
        let err = receive_body(&mut server, 16, 10, Some(Duration::from_millis(50)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TransferError::ReadTimeout {
                phase: Phase::Body,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn send_body_chunks_cover_payload() {
        let payload: Vec<u8> = (0u8..200).collect();
        let mut wire = Vec::new();
        send_body(&mut wire, &payload, 7).await.unwrap();
        assert_eq!(wire, payload);
    }

    #[tokio::test]
    async fn send_and_receive_agree_over_duplex() {
        let payload = vec![0xABu8; 10_000];
        let (mut client, mut server) = tokio::io::duplex(1024);

        let expected = payload.clone();
        let send = tokio::spawn(async move {
            send_body(&mut client, &payload, 512).await.unwrap();
            client.shutdown().await.unwrap();
        });

        let body = receive_body(&mut server, 300, expected.len() as u64, None)
            .await
            .unwrap();
        send.await.unwrap();
        assert_eq!(body.as_ref(), expected.as_slice());
    }
}
