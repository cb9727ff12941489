use crate::event::Event;
use async_trait::async_trait;
use talkpipe_core::TransportError;

/// Remote recognizer capability: one handshake, one audio stream, events
/// back. [`TranscriptionSession`](crate::TranscriptionSession) drives any
/// implementation the same way, so a backend swap never touches session
/// logic.
#[async_trait]
pub trait AsrTransport: Send {
    /// Send a describe request and wait for the server's first event. Any
    /// response counts as handshake success; returns the event's kind.
    async fn handshake(&mut self) -> Result<String, TransportError>;

    async fn send_audio_start(&mut self, rate: u32) -> Result<(), TransportError>;

    async fn send_chunk(&mut self, audio: Vec<u8>, timestamp_ms: u64)
        -> Result<(), TransportError>;

    async fn send_audio_stop(&mut self) -> Result<(), TransportError>;

    /// Next event from the server; `Ok(None)` means the peer closed.
    async fn next_event(&mut self) -> Result<Option<Event>, TransportError>;

    /// Best-effort teardown; failures are swallowed.
    async fn close(&mut self);
}
