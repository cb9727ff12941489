use crate::event::{self, Event};
use crate::transport::AsrTransport;
use async_trait::async_trait;
use talkpipe_core::TransportError;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

/// TCP client for a Wyoming-style ASR server. Owns the socket for the
/// session's lifetime.
pub struct WyomingClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    rate: u32,
}

impl WyomingClient {
    pub async fn connect(host: &str, port: u16) -> Result<Self, TransportError> {
        let stream = TcpStream::connect((host, port))
            .await
            .map_err(|e| TransportError::Connect(format!("{host}:{port}: {e}")))?;
        tracing::debug!("connected to {host}:{port}");
        let (read_half, write_half) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(read_half),
            writer: write_half,
            rate: 16000,
        })
    }
}

#[async_trait]
impl AsrTransport for WyomingClient {
    async fn handshake(&mut self) -> Result<String, TransportError> {
        event::write_event(&mut self.writer, &Event::describe()).await?;
        match event::read_event(&mut self.reader).await? {
            Some(response) => Ok(response.event_type),
            None => Err(TransportError::Handshake(
                "server closed before answering describe".to_string(),
            )),
        }
    }

    async fn send_audio_start(&mut self, rate: u32) -> Result<(), TransportError> {
        self.rate = rate;
        event::write_event(&mut self.writer, &Event::audio_start(rate)).await
    }

    async fn send_chunk(
        &mut self,
        audio: Vec<u8>,
        timestamp_ms: u64,
    ) -> Result<(), TransportError> {
        let chunk = Event::audio_chunk(self.rate, audio, timestamp_ms);
        event::write_event(&mut self.writer, &chunk).await
    }

    async fn send_audio_stop(&mut self) -> Result<(), TransportError> {
        event::write_event(&mut self.writer, &Event::audio_stop()).await
    }

    async fn next_event(&mut self) -> Result<Option<Event>, TransportError> {
        event::read_event(&mut self.reader).await
    }

    async fn close(&mut self) {
        let _ = self.writer.shutdown().await;
    }
}
