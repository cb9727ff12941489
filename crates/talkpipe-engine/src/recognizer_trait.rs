use talkpipe_core::{AudioChunk, EngineError};

/// What the decoder reported after consuming one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoding {
    /// The chunk completed an utterance; a final result is available.
    Finalized,
    /// The utterance is still in progress; a partial result is available.
    Running,
}

/// Offline recognizer capability: accepts one waveform chunk at a time and
/// exposes the decoder's partial/final text.
///
/// The capability is synchronous by contract — at most one chunk is ever in
/// flight, and the session never overlaps two calls.
pub trait Recognizer {
    fn name(&self) -> &str;

    /// Feed one chunk of PCM; reports whether it completed an utterance.
    fn feed(&mut self, chunk: &AudioChunk) -> Result<Decoding, EngineError>;

    /// Final text of the utterance just completed. Empty text is valid
    /// output, not an error.
    fn final_result(&mut self) -> String;

    /// Current best guess for the in-progress utterance. May be revised or
    /// withdrawn as more audio arrives.
    fn partial_result(&mut self) -> String;

    /// Drop all decoder state for the current utterance. Decoding after a
    /// reset is a genuinely new utterance.
    fn reset(&mut self);
}
