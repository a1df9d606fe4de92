//! labferry - file courier for lab instruments.
//!
//! Moves one file per connection over a plain TCP stream. The header is two
//! newline-terminated ASCII lines (file name, then decimal byte count); the
//! body is the raw bytes, read in bounded chunks until the declared count
//! is satisfied.
//!
//! # Architecture
//!
//! ```text
//! Sender                                Receiver
//! +------------------+                  +------------------+
//! | connect          | --- TCP -------> | accept           |
//! | name line        | ---------------> | name line        |
//! | size line        | ---------------> | size line        |
//! | body chunks      | ---------------> | body chunks      |
//! +------------------+                  +------------------+
//! ```
//!
//! The sequence never rewinds: any failure aborts the transfer in place,
//! and retry (when wanted) wraps the whole connect-and-transfer sequence
//! through [`retry::RetryPolicy`].

pub mod config;
pub mod error;
pub mod logging;
pub mod retry;
pub mod transfer;
pub mod transport;
pub mod wire;

pub use config::Config;
pub use error::{Phase, TransferError};
pub use retry::RetryPolicy;
pub use transfer::{receive_file, send_file, ReceivedFile, TransferOptions};
pub use transport::{ConnectOptions, Listener, Session, DEFAULT_CONNECT_TIMEOUT};
pub use wire::{LineOutcome, DEFAULT_CHUNK_SIZE, MAX_LINE_LEN};
