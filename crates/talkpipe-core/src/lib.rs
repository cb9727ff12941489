pub mod error;
pub mod protocol;
pub mod types;

pub use error::{ConfigError, EngineError, TransportError};
pub use protocol::{ProtocolLine, ProtocolWriter};
pub use types::{AudioChunk, RecognitionResult};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_chunk_creation() {
        let chunk = AudioChunk::new(vec![0x00, 0x01, 0xff, 0x7f]);
        assert_eq!(chunk.bytes.len(), 4);
        assert_eq!(chunk.samples(), 2);
    }

    #[test]
    fn test_audio_chunk_odd_byte_count_rounds_down() {
        // A truncated trailing byte is not a sample.
        let chunk = AudioChunk::new(vec![0x00, 0x01, 0xff]);
        assert_eq!(chunk.samples(), 1);
    }

    #[test]
    fn test_recognition_result_fields() {
        let result = RecognitionResult {
            text: "hello world".to_string(),
            is_final: true,
        };
        assert_eq!(result.text, "hello world");
        assert!(result.is_final);
    }
}
