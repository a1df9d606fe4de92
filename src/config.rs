//! TOML configuration for the courier.
//!
//! Every field has a default, so an absent file or an empty table both
//! yield a working configuration.
//!
//! ```toml
//! chunk_size = 65536
//! connect_timeout_secs = 10
//! read_timeout_secs = 30
//!
//! [retry]
//! max_attempts = 3
//! delay_secs = 5
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::retry::RetryPolicy;
use crate::transfer::TransferOptions;
use crate::transport::{ConnectOptions, DEFAULT_CONNECT_TIMEOUT};
use crate::wire::DEFAULT_CHUNK_SIZE;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Upper bound on each body read/write.
    pub chunk_size: usize,
    /// Deadline on the TCP connect attempt.
    pub connect_timeout_secs: u64,
    /// Optional per-phase read deadline; absent means blocking reads.
    pub read_timeout_secs: Option<u64>,
    /// Retry shape applied around the whole connect-and-transfer sequence.
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub delay_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT.as_secs(),
            read_timeout_secs: None,
            retry: RetryConfig::default(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            delay_secs: policy.delay.as_secs(),
        }
    }
}

impl Config {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// Load from a TOML file if one was given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn transfer_options(&self) -> TransferOptions {
        TransferOptions {
            chunk_size: self.chunk_size,
            read_timeout: self.read_timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn connect_options(&self) -> ConnectOptions {
        ConnectOptions {
            timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry.max_attempts,
            Duration::from_secs(self.retry.delay_secs),
        )
    }
}
