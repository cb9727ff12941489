use crate::transport::AsrTransport;
use std::io::{self, Write};
use std::time::Duration;
use talkpipe_core::{ProtocolLine, ProtocolWriter, TransportError};
use thiserror::Error;
use tokio::io::AsyncRead;
use tokio::time::{timeout_at, Instant};

/// Where the session currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Connecting,
    Negotiating,
    Streaming,
    Draining,
    AwaitingResult,
    Completed,
    Failed,
}

/// Session tunables. The chunk size and result timeout have recognized
/// effects on server behavior; see the CLI options that set them.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub sample_rate: u32,
    pub chunk_samples: usize,
    pub result_timeout: Duration,
}

impl SessionConfig {
    /// Bytes of PCM per chunk (16-bit samples).
    pub fn chunk_bytes(&self) -> usize {
        self.chunk_samples * 2
    }

    /// Duration one chunk represents at the configured rate.
    pub fn chunk_duration_ms(&self) -> f64 {
        self.chunk_samples as f64 / self.sample_rate as f64 * 1000.0
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            chunk_samples: 1024,
            result_timeout: Duration::from_secs(30),
        }
    }
}

/// Conditions under which the session cannot hand the host a well-formed
/// result and must exit non-zero. Failures after the last chunk (timeout,
/// peer close) are *not* errors here: the host still receives an empty
/// transcript line and the process exits zero.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("audio input failed: {0}")]
    Input(io::Error),

    #[error("protocol output failed: {0}")]
    Output(io::Error),
}

/// Drives one transcription: handshake, stream stdin audio as timestamped
/// chunks, then wait (bounded) for the transcript.
pub struct TranscriptionSession {
    config: SessionConfig,
    phase: SessionPhase,
    chunks_sent: u64,
}

impl TranscriptionSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            phase: SessionPhase::Connecting,
            chunks_sent: 0,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn chunks_sent(&self) -> u64 {
        self.chunks_sent
    }

    /// Run the session over an already-connected transport. Emits the
    /// stdout protocol lines as it goes; the transport is torn down
    /// (best-effort) on every terminal transition.
    pub async fn run<T, R, W>(
        &mut self,
        transport: &mut T,
        audio: &mut R,
        out: &mut ProtocolWriter<W>,
    ) -> Result<(), SessionError>
    where
        T: AsrTransport,
        R: AsyncRead + Unpin,
        W: Write,
    {
        self.phase = SessionPhase::Negotiating;
        match transport.handshake().await {
            Ok(kind) => {
                self.emit(out, ProtocolLine::Connected(kind))?;
                self.emit(out, ProtocolLine::Ready)?;
            }
            Err(e) => {
                self.phase = SessionPhase::Failed;
                transport.close().await;
                self.emit(out, ProtocolLine::Error(format!("handshake failed - {e}")))?;
                return Err(e.into());
            }
        }

        self.phase = SessionPhase::Streaming;
        if let Err(e) = self.stream_audio(transport, audio).await {
            // Streaming began, so the host is owed a transcript line even
            // though the session is aborting.
            self.phase = SessionPhase::Failed;
            transport.close().await;
            self.emit(out, ProtocolLine::Error(format!("streaming failed - {e}")))?;
            self.emit(out, ProtocolLine::Transcript(String::new()))?;
            return Err(e);
        }

        let result = self.await_transcript(transport).await;
        transport.close().await;
        match result {
            Ok(text) => {
                self.phase = SessionPhase::Completed;
                self.emit(out, ProtocolLine::Transcript(text))?;
            }
            Err(e) => {
                self.phase = SessionPhase::Failed;
                self.emit(out, ProtocolLine::Error(format!("transcription failed - {e}")))?;
                self.emit(out, ProtocolLine::Transcript(String::new()))?;
            }
        }
        Ok(())
    }

    /// Audio-start, every stdin chunk in order, audio-stop. An empty
    /// stream is valid: start and stop are sent even with zero chunks.
    async fn stream_audio<T, R>(
        &mut self,
        transport: &mut T,
        audio: &mut R,
    ) -> Result<(), SessionError>
    where
        T: AsrTransport,
        R: AsyncRead + Unpin,
    {
        transport.send_audio_start(self.config.sample_rate).await?;

        let chunk_ms = self.config.chunk_duration_ms();
        let chunk_bytes = self.config.chunk_bytes();
        loop {
            let chunk = talkpipe_audio::read_frame(audio, chunk_bytes)
                .await
                .map_err(SessionError::Input)?;
            let Some(chunk) = chunk else { break };
            let timestamp_ms = (self.chunks_sent as f64 * chunk_ms) as u64;
            transport.send_chunk(chunk.bytes, timestamp_ms).await?;
            self.chunks_sent += 1;
        }
        tracing::debug!("sent {} chunks", self.chunks_sent);

        self.phase = SessionPhase::Draining;
        transport.send_audio_stop().await?;

        self.phase = SessionPhase::AwaitingResult;
        Ok(())
    }

    /// Wait for a transcript event, discarding everything else. The
    /// deadline is fixed at state entry; discarded events do not extend it.
    async fn await_transcript<T: AsrTransport>(
        &mut self,
        transport: &mut T,
    ) -> Result<String, TransportError> {
        let deadline = Instant::now() + self.config.result_timeout;
        loop {
            match timeout_at(deadline, transport.next_event()).await {
                Err(_) => return Err(TransportError::Timeout(self.config.result_timeout)),
                Ok(Ok(Some(event))) if event.is_transcript() => {
                    let text = event.transcript_text().unwrap_or_default().trim();
                    return Ok(text.to_string());
                }
                Ok(Ok(Some(event))) => {
                    tracing::debug!("ignoring {} event", event.event_type);
                }
                Ok(Ok(None)) => return Err(TransportError::PeerClosed),
                Ok(Err(TransportError::Event(e))) => {
                    // One malformed event is not fatal; keep waiting.
                    tracing::warn!("skipping malformed event: {e}");
                }
                Ok(Err(e)) => return Err(e),
            }
        }
    }

    fn emit<W: Write>(
        &self,
        out: &mut ProtocolWriter<W>,
        line: ProtocolLine,
    ) -> Result<(), SessionError> {
        out.emit(&line).map_err(SessionError::Output)
    }
}
