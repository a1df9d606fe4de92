//! Session management - one established socket per file transfer.
//!
//! The connect phase is the only one with a built-in deadline. Once the
//! session is up, reads and writes block until data moves or the peer
//! closes; callers that want steady-state deadlines configure a per-phase
//! read timeout on the transfer itself.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::{TcpListener, TcpStream};

use crate::error::TransferError;
use crate::transfer::{self, ReceivedFile, TransferOptions};

/// Deadline applied to the TCP connect attempt.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Options for establishing a session.
#[derive(Debug, Clone, Copy)]
pub struct ConnectOptions {
    /// How long the connect attempt may take before it is abandoned.
    pub timeout: Duration,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

/// One established connection carrying a single file transfer.
///
/// The session owns the socket for the protocol's duration; dropping it is
/// the only way to tear the connection down. There is no reconnect here -
/// retry around the whole connect-and-transfer sequence is caller policy.
#[derive(Debug)]
pub struct Session {
    stream: TcpStream,
    peer: SocketAddr,
}

impl Session {
    /// Connect to `host:port` within the configured deadline.
    ///
    /// On timeout or connection error no session exists; the caller decides
    /// whether to retry or abort.
    pub async fn connect(
        host: &str,
        port: u16,
        opts: &ConnectOptions,
    ) -> Result<Self, TransferError> {
        let addr = format!("{host}:{port}");
        let connect = TcpStream::connect(&addr);
        let stream = match tokio::time::timeout(opts.timeout, connect).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => {
                tracing::warn!(%addr, error = %source, "connection failed");
                return Err(TransferError::Connect { addr, source });
            }
            Err(_) => {
                tracing::warn!(%addr, timeout = ?opts.timeout, "connection timed out");
                return Err(TransferError::ConnectTimeout {
                    addr,
                    timeout: opts.timeout,
                });
            }
        };
        let peer = stream.peer_addr()?;
        tracing::info!(%peer, "connected");
        Ok(Self { stream, peer })
    }

    /// Address of the peer this session is bound to.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Send one file over this session.
    pub async fn send_file(
        &mut self,
        name: &str,
        body: &[u8],
        opts: &TransferOptions,
    ) -> Result<(), TransferError> {
        transfer::send_file(&mut self.stream, name, body, opts).await
    }

    /// Receive one file over this session.
    pub async fn receive_file(
        &mut self,
        opts: &TransferOptions,
    ) -> Result<ReceivedFile, TransferError> {
        transfer::receive_file(&mut self.stream, opts).await
    }

    /// Access the raw stream, for callers driving the wire layer directly.
    pub fn stream_mut(&mut self) -> &mut TcpStream {
        &mut self.stream
    }

    /// Give up ownership of the underlying stream.
    pub fn into_stream(self) -> TcpStream {
        self.stream
    }
}

/// Accepting side of a session.
pub struct Listener {
    inner: TcpListener,
}

impl Listener {
    /// Bind to `addr` (e.g. `"0.0.0.0:7878"` or `"127.0.0.1:0"`).
    pub async fn bind(addr: &str) -> Result<Self, TransferError> {
        let inner = TcpListener::bind(addr).await?;
        tracing::info!(addr = %inner.local_addr()?, "listening");
        Ok(Self { inner })
    }

    /// The locally bound address, useful when binding to port 0.
    pub fn local_addr(&self) -> Result<SocketAddr, TransferError> {
        Ok(self.inner.local_addr()?)
    }

    /// Accept one inbound connection as a session.
    pub async fn accept(&self) -> Result<Session, TransferError> {
        let (stream, peer) = self.inner.accept().await?;
        tracing::info!(%peer, "accepted");
        Ok(Session { stream, peer })
    }
}
