use anyhow::Context;
use clap::Parser;
use mllp::{MllpClient, MllpConfig};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Sample message sent when no file is given.
const DEFAULT_SAMPLE: &str = "samples/sample_adt.hl7";

/// Segments shown before sending.
const PREVIEW_SEGMENTS: usize = 5;

#[derive(Parser)]
#[command(name = "hl7-send")]
#[command(about = "Send an HL7 v2 message file to an MLLP receiver and print its acknowledgment")]
struct Cli {
    /// HL7 message file (default: samples/sample_adt.hl7)
    file: Option<PathBuf>,

    /// Receiver host
    #[arg(long, env = "MLLP_HOST", default_value = mllp::DEFAULT_HOST)]
    host: String,

    /// Receiver port
    #[arg(long, env = "MLLP_PORT", default_value_t = mllp::DEFAULT_PORT)]
    port: u16,

    /// Seconds to wait for the whole exchange
    #[arg(long, env = "MLLP_TIMEOUT_SECS", default_value_t = mllp::DEFAULT_TIMEOUT.as_secs())]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hl7_send=info".parse()?)
                .add_directive("mllp=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if cli.file.is_none() {
        println!("No file specified. Using default: {DEFAULT_SAMPLE}");
    }
    let path = resolve_message_file(cli.file)?;
    let message = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    println!("Message Preview:");
    println!("{}", "-".repeat(60));
    for segment in mllp::preview(&message, PREVIEW_SEGMENTS) {
        println!("{segment}");
    }
    println!("{}", "-".repeat(60));

    let client = MllpClient::new(MllpConfig {
        host: cli.host,
        port: cli.port,
        timeout: Duration::from_secs(cli.timeout_secs),
    });

    let ack = client.send(&message).await.map_err(|e| {
        tracing::error!("Send failed ({:?}): {}", e.kind(), e);
        e
    })?;

    println!("Received acknowledgment:");
    println!("{}", mllp::normalize(&ack.to_string()).replace('\r', "\n"));
    println!("Message sent successfully.");

    Ok(())
}

/// Pick the message file to send.
///
/// An explicit path must exist. Without one, the default sample is looked up relative to the
/// current working directory and then by walking up from this crate's manifest directory.
fn resolve_message_file(file: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(path) = file {
        if path.is_file() {
            return Ok(path);
        }
        anyhow::bail!("File not found: {}", path.display());
    }

    let cwd_relative = PathBuf::from(DEFAULT_SAMPLE);
    if cwd_relative.is_file() {
        return Ok(cwd_relative);
    }

    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    for ancestor in manifest_dir.ancestors() {
        let candidate = ancestor.join(DEFAULT_SAMPLE);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    anyhow::bail!("File not found: {DEFAULT_SAMPLE}")
}
