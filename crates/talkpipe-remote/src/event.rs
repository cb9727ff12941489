use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use talkpipe_core::TransportError;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

// Event kinds of the framed protocol.
pub const DESCRIBE: &str = "describe";
pub const AUDIO_START: &str = "audio-start";
pub const AUDIO_CHUNK: &str = "audio-chunk";
pub const AUDIO_STOP: &str = "audio-stop";
pub const TRANSCRIPT: &str = "transcript";

/// Fixed audio format descriptors: 16-bit samples, mono.
const SAMPLE_WIDTH: u32 = 2;
const CHANNELS: u32 = 1;

/// Wire header: one JSON object per line. `data` is carried inline when
/// small; servers may instead declare `data_length` and send the data as
/// trailing bytes. `payload_length` declares a raw binary payload after
/// the data.
#[derive(Debug, Serialize, Deserialize)]
struct EventHeader {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payload_length: Option<usize>,
}

/// One message of the framed event protocol: a kind, structured data, and
/// an optional binary payload (PCM for audio chunks).
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub event_type: String,
    pub data: Value,
    pub payload: Vec<u8>,
}

impl Event {
    pub fn new(event_type: &str, data: Value) -> Self {
        Self {
            event_type: event_type.to_string(),
            data,
            payload: Vec::new(),
        }
    }

    pub fn describe() -> Self {
        Self::new(DESCRIBE, Value::Null)
    }

    pub fn audio_start(rate: u32) -> Self {
        Self::new(
            AUDIO_START,
            json!({ "rate": rate, "width": SAMPLE_WIDTH, "channels": CHANNELS }),
        )
    }

    /// An audio chunk carrying `timestamp_ms` derived from cumulative chunk
    /// count, never wall-clock time.
    pub fn audio_chunk(rate: u32, audio: Vec<u8>, timestamp_ms: u64) -> Self {
        let mut event = Self::new(
            AUDIO_CHUNK,
            json!({
                "rate": rate,
                "width": SAMPLE_WIDTH,
                "channels": CHANNELS,
                "timestamp": timestamp_ms,
            }),
        );
        event.payload = audio;
        event
    }

    pub fn audio_stop() -> Self {
        Self::new(AUDIO_STOP, Value::Null)
    }

    pub fn transcript(text: &str) -> Self {
        Self::new(TRANSCRIPT, json!({ "text": text }))
    }

    pub fn is_transcript(&self) -> bool {
        self.event_type == TRANSCRIPT
    }

    /// Transcript text, if this is a transcript event carrying one.
    pub fn transcript_text(&self) -> Option<&str> {
        if !self.is_transcript() {
            return None;
        }
        self.data.get("text").and_then(Value::as_str)
    }
}

/// Write one event: header line, then the payload bytes if any.
pub async fn write_event<W: AsyncWrite + Unpin>(
    sink: &mut W,
    event: &Event,
) -> Result<(), TransportError> {
    let header = EventHeader {
        event_type: event.event_type.clone(),
        data: if event.data.is_null() {
            None
        } else {
            Some(event.data.clone())
        },
        data_length: None,
        payload_length: if event.payload.is_empty() {
            None
        } else {
            Some(event.payload.len())
        },
    };
    let mut line = serde_json::to_vec(&header)?;
    line.push(b'\n');
    sink.write_all(&line).await?;
    if !event.payload.is_empty() {
        sink.write_all(&event.payload).await?;
    }
    sink.flush().await?;
    Ok(())
}

/// Read one event. `Ok(None)` means the peer closed the connection. All
/// bytes the header declares are consumed even when the caller discards
/// the event, so the stream stays in sync.
pub async fn read_event<R: AsyncBufRead + Unpin>(
    source: &mut R,
) -> Result<Option<Event>, TransportError> {
    let mut line = String::new();
    if source.read_line(&mut line).await? == 0 {
        return Ok(None);
    }
    let header: EventHeader = serde_json::from_str(line.trim_end())?;

    let mut data = header.data.unwrap_or(Value::Null);
    if let Some(len) = header.data_length {
        let mut buf = vec![0u8; len];
        source.read_exact(&mut buf).await?;
        data = serde_json::from_slice(&buf)?;
    }

    let mut payload = Vec::new();
    if let Some(len) = header.payload_length {
        payload = vec![0u8; len];
        source.read_exact(&mut payload).await?;
    }

    Ok(Some(Event {
        event_type: header.event_type,
        data,
        payload,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    async fn round_trip(event: &Event) -> Event {
        let mut wire = Vec::new();
        write_event(&mut wire, event).await.unwrap();
        let mut reader = BufReader::new(&wire[..]);
        read_event(&mut reader).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_describe_round_trip() {
        let event = round_trip(&Event::describe()).await;
        assert_eq!(event.event_type, DESCRIBE);
        assert!(event.data.is_null());
        assert!(event.payload.is_empty());
    }

    #[tokio::test]
    async fn test_audio_chunk_carries_payload_and_timestamp() {
        let pcm = vec![0u8; 2048];
        let event = round_trip(&Event::audio_chunk(16000, pcm.clone(), 128)).await;
        assert_eq!(event.event_type, AUDIO_CHUNK);
        assert_eq!(event.payload, pcm);
        assert_eq!(event.data["timestamp"], 128);
        assert_eq!(event.data["rate"], 16000);
        assert_eq!(event.data["width"], 2);
        assert_eq!(event.data["channels"], 1);
    }

    #[tokio::test]
    async fn test_header_is_a_single_json_line() {
        let mut wire = Vec::new();
        write_event(&mut wire, &Event::audio_start(16000)).await.unwrap();
        let newline = wire.iter().position(|&b| b == b'\n').unwrap();
        assert_eq!(newline, wire.len() - 1);
        assert!(serde_json::from_slice::<Value>(&wire[..newline]).is_ok());
    }

    #[tokio::test]
    async fn test_read_split_framing() {
        // Servers may ship the data object as trailing bytes after the
        // header instead of inline.
        let data = br#"{"text": "hello"}"#;
        let mut wire = format!(
            "{{\"type\": \"transcript\", \"data_length\": {}}}\n",
            data.len()
        )
        .into_bytes();
        wire.extend_from_slice(data);

        let mut reader = BufReader::new(&wire[..]);
        let event = read_event(&mut reader).await.unwrap().unwrap();
        assert_eq!(event.transcript_text(), Some("hello"));
    }

    #[tokio::test]
    async fn test_read_consumes_declared_payload() {
        let mut wire = Vec::new();
        write_event(&mut wire, &Event::audio_chunk(16000, vec![1; 64], 0))
            .await
            .unwrap();
        write_event(&mut wire, &Event::audio_stop()).await.unwrap();

        let mut reader = BufReader::new(&wire[..]);
        let first = read_event(&mut reader).await.unwrap().unwrap();
        assert_eq!(first.event_type, AUDIO_CHUNK);
        // The payload was fully consumed, so the next event parses cleanly.
        let second = read_event(&mut reader).await.unwrap().unwrap();
        assert_eq!(second.event_type, AUDIO_STOP);
        assert!(read_event(&mut reader).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_closed_stream_reads_none() {
        let mut reader = BufReader::new(&[][..]);
        assert!(read_event(&mut reader).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_header_is_an_event_error() {
        let mut reader = BufReader::new(&b"not json\n"[..]);
        assert!(matches!(
            read_event(&mut reader).await,
            Err(TransportError::Event(_))
        ));
    }

    #[test]
    fn test_transcript_text_on_other_kinds_is_none() {
        assert_eq!(Event::audio_stop().transcript_text(), None);
        assert_eq!(Event::transcript("  test ").transcript_text(), Some("  test "));
    }
}
