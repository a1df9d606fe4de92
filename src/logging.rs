//! Logging bootstrap.
//!
//! Stdout logging filtered by `RUST_LOG` (default `info`), with an optional
//! file sink named `<hostname>_<username>_<name>_<timestamp>.log` under
//! `~/Logs`, so logs from many machines can be collected into one place and
//! still be told apart.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. Returns the log file path when a file
/// sink was requested.
///
/// Call once per process; a second call fails because the global
/// subscriber is already set.
pub fn init(name: &str, to_file: bool) -> Result<Option<PathBuf>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer();

    if !to_file {
        tracing_subscriber::registry()
            .with(filter)
            .with(stdout_layer)
            .try_init()?;
        return Ok(None);
    }

    let path = log_file_path(name)?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    }
    let file = File::create(&path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let file_layer = fmt::layer().with_ansi(false).with_writer(Arc::new(file));

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()?;
    Ok(Some(path))
}

fn log_file_path(name: &str) -> Result<PathBuf> {
    let home = dirs::home_dir().context("could not determine the home directory")?;
    let hostname =
        whoami::fallible::hostname().unwrap_or_else(|_| "unknown-host".to_string());
    let timestamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
    Ok(home
        .join("Logs")
        .join(log_file_name(&hostname, &whoami::username(), name, &timestamp.to_string())))
}

fn log_file_name(hostname: &str, username: &str, name: &str, timestamp: &str) -> String {
    format!("{hostname}_{username}_{name}_{timestamp}.log")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_carries_host_user_and_timestamp() {
        let name = log_file_name("bench-pi", "operator", "labferry", "2026-08-06_12-00-00");
        assert_eq!(name, "bench-pi_operator_labferry_2026-08-06_12-00-00.log");
    }

    #[test]
    fn path_lands_under_home_logs() {
        if dirs::home_dir().is_none() {
            return;
        }
        let path = log_file_path("labferry").unwrap();
        assert!(path.parent().unwrap().ends_with("Logs"));
        assert_eq!(path.extension().unwrap(), "log");
    }
}
