/// One block of raw 16-bit little-endian mono PCM read from the host.
///
/// Chunks arrive strictly in stream order; every chunk is the configured
/// size except possibly the last one of a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioChunk {
    pub bytes: Vec<u8>,
}

impl AudioChunk {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Number of whole 16-bit samples in this chunk.
    pub fn samples(&self) -> usize {
        self.bytes.len() / 2
    }
}

/// Text produced by a recognizer for one span of audio.
///
/// A partial result (`is_final == false`) is the decoder's current best
/// guess and may be revised; a final result closes the utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionResult {
    pub text: String,
    pub is_final: bool,
}
