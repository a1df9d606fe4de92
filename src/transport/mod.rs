//! Connection establishment and session ownership.

pub mod session;

pub use session::{ConnectOptions, Listener, Session, DEFAULT_CONNECT_TIMEOUT};
