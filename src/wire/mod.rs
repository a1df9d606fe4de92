//! Wire-level pieces of the courier protocol.
//!
//! Two layers: newline-framed header lines ([`framing`]) and the chunked
//! body engine ([`body`]). Both are generic over any async byte stream so
//! they run identically over TCP and over in-memory loopback pairs.
//!
//! Per-transfer wire format:
//!
//! ```text
//! <file-name-utf8-bytes> 0x0A
//! <decimal-ascii-file-size> 0x0A
//! <file-size bytes of raw binary payload>
//! ```

pub mod body;
pub mod framing;

pub use body::{receive_body, send_body, DEFAULT_CHUNK_SIZE};
pub use framing::{parse_size, read_line, write_line, LineOutcome, MAX_LINE_LEN};
