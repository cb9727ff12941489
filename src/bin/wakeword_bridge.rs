use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use talkpipe_audio::FrameReader;
use talkpipe_core::{ConfigError, ProtocolWriter};
use talkpipe_engine::{SpottingSession, VoskRecognizer};
use tracing_subscriber::EnvFilter;

/// Bytes of PCM per recognizer feed (125ms at 16kHz mono 16-bit).
const CHUNK_BYTES: usize = 4000;

#[derive(Parser)]
#[command(
    name = "wakeword-bridge",
    about = "Listens for a keyword in raw PCM from stdin using an offline model"
)]
struct Cli {
    /// Path to the acoustic model directory
    model_path: PathBuf,

    /// Keyword to detect (case-insensitive substring of recognized text)
    keyword: String,

    /// Audio sample rate in Hz
    #[arg(default_value_t = 16000)]
    sample_rate: u32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Diagnostics go to stderr; stdout belongs to the host protocol.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    if !cli.model_path.exists() {
        return Err(ConfigError::ModelNotFound(cli.model_path).into());
    }

    let mut recognizer = VoskRecognizer::new(&cli.model_path, cli.sample_rate)
        .context("failed to initialize recognizer")?;
    let mut session = SpottingSession::new(&cli.keyword)?;

    tracing::info!(
        "spotting '{}' at {}Hz with model {:?}",
        session.keyword(),
        cli.sample_rate,
        cli.model_path,
    );

    let stdin = std::io::stdin();
    let frames = FrameReader::new(stdin.lock(), CHUNK_BYTES);
    let mut out = ProtocolWriter::new(std::io::stdout());

    session
        .run(frames, &mut recognizer, &mut out)
        .context("spotting session failed")?;
    Ok(())
}
