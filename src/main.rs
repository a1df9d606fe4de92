//! labferry CLI - send or receive one file over the courier protocol.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use labferry::config::Config;
use labferry::logging;
use labferry::transport::{Listener, Session};

#[derive(Parser)]
#[command(name = "labferry", version, about = "File courier for lab instruments")]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also write logs to a timestamped file under ~/Logs.
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Send one file to a receiving peer.
    Send {
        /// Host name or address of the receiver.
        host: String,

        /// File to send.
        file: PathBuf,

        #[arg(long, default_value_t = 7878)]
        port: u16,

        /// Name announced to the peer; defaults to the file's base name.
        #[arg(long)]
        name: Option<String>,
    },

    /// Accept one connection and receive one file.
    Recv {
        #[arg(long, default_value = "0.0.0.0:7878")]
        bind: String,

        /// Directory the received file is written into.
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Some(path) = logging::init("labferry", cli.log_file)? {
        tracing::info!(log = %path.display(), "logging to file");
    }
    let config = Config::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Command::Send {
            host,
            file,
            port,
            name,
        } => send(&config, &host, port, &file, name).await,
        Command::Recv { bind, output_dir } => recv(&config, &bind, &output_dir).await,
    }
}

async fn send(
    config: &Config,
    host: &str,
    port: u16,
    file: &Path,
    name: Option<String>,
) -> Result<()> {
    let body = tokio::fs::read(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;
    let name = match name {
        Some(name) => name,
        None => file
            .file_name()
            .with_context(|| format!("{} has no file name", file.display()))?
            .to_string_lossy()
            .into_owned(),
    };

    let connect = config.connect_options();
    let transfer = config.transfer_options();
    let name_ref = name.as_str();
    let body_ref = body.as_slice();

    // Retry wraps the whole connect-and-send sequence; a fresh session per
    // attempt, never a resumed one.
    config
        .retry_policy()
        .run(|| {
            let (name, body, connect, transfer) = (name_ref, body_ref, connect, transfer);
            async move {
                let mut session = Session::connect(host, port, &connect).await?;
                session.send_file(name, body, &transfer).await
            }
        })
        .await?;

    println!("sent {} ({} bytes)", name, body.len());
    Ok(())
}

async fn recv(config: &Config, bind: &str, output_dir: &Path) -> Result<()> {
    let listener = Listener::bind(bind).await?;
    let mut session = listener.accept().await?;
    let file = session.receive_file(&config.transfer_options()).await?;

    let name = sanitize_name(&file.name);
    tokio::fs::create_dir_all(output_dir)
        .await
        .with_context(|| format!("failed to create {}", output_dir.display()))?;
    let path = output_dir.join(&name);
    tokio::fs::write(&path, &file.body)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;

    println!("received {} ({} bytes)", path.display(), file.size);
    Ok(())
}

/// Reduce a peer-supplied name to a single safe path component.
///
/// The protocol allows an empty name (it is distinct from a closed stream);
/// this side's policy is to fall back to a fixed name rather than refuse
/// the transfer.
fn sanitize_name(name: &str) -> String {
    Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "received.bin".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_plain_names() {
        assert_eq!(sanitize_name("report.txt"), "report.txt");
    }

    #[test]
    fn sanitize_strips_directories() {
        assert_eq!(sanitize_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_name("a/b/c.bin"), "c.bin");
    }

    #[test]
    fn sanitize_falls_back_on_empty_or_bare_paths() {
        assert_eq!(sanitize_name(""), "received.bin");
        assert_eq!(sanitize_name(".."), "received.bin");
        assert_eq!(sanitize_name("/"), "received.bin");
    }
}
