use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;
use talkpipe_core::{ProtocolLine, ProtocolWriter};
use talkpipe_remote::{SessionConfig, TranscriptionSession, WyomingClient};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "wyoming-bridge",
    about = "Streams raw PCM from stdin to a Wyoming ASR server and prints the transcript"
)]
struct Cli {
    /// Wyoming server host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Wyoming server port
    #[arg(long, default_value_t = 10301)]
    port: u16,

    /// Audio sample rate in Hz
    #[arg(long, default_value_t = 16000)]
    rate: u32,

    /// Samples per audio chunk sent to the server (64ms at the defaults)
    #[arg(long, default_value_t = 1024)]
    chunk_samples: usize,

    /// Seconds to wait for a transcript after the last chunk
    #[arg(long, default_value_t = 30)]
    result_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Diagnostics go to stderr; stdout belongs to the host protocol.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let mut out = ProtocolWriter::new(std::io::stdout());

    let mut client = match WyomingClient::connect(&cli.host, cli.port).await {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("could not reach {}:{}: {e}", cli.host, cli.port);
            out.emit(&ProtocolLine::Error(format!("connection failed - {e}")))?;
            std::process::exit(1);
        }
    };

    let config = SessionConfig {
        sample_rate: cli.rate,
        chunk_samples: cli.chunk_samples,
        result_timeout: Duration::from_secs(cli.result_timeout_secs),
    };
    let mut session = TranscriptionSession::new(config);
    let mut audio = tokio::io::stdin();

    session
        .run(&mut client, &mut audio, &mut out)
        .await
        .context("transcription session failed")?;
    Ok(())
}
