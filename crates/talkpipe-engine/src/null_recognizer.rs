use crate::recognizer_trait::{Decoding, Recognizer};
use talkpipe_core::{AudioChunk, EngineError};

/// A recognizer that consumes audio and never recognizes anything. Useful
/// for exercising the pipeline without an acoustic model.
pub struct NullRecognizer {
    feed_count: usize,
    reset_count: usize,
}

impl NullRecognizer {
    pub fn new() -> Self {
        Self {
            feed_count: 0,
            reset_count: 0,
        }
    }

    pub fn feed_count(&self) -> usize {
        self.feed_count
    }

    pub fn reset_count(&self) -> usize {
        self.reset_count
    }
}

impl Default for NullRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Recognizer for NullRecognizer {
    fn name(&self) -> &str {
        "null"
    }

    fn feed(&mut self, chunk: &AudioChunk) -> Result<Decoding, EngineError> {
        self.feed_count += 1;
        tracing::trace!(
            "NullRecognizer fed chunk #{}, {} samples",
            self.feed_count,
            chunk.samples()
        );
        Ok(Decoding::Running)
    }

    fn final_result(&mut self) -> String {
        String::new()
    }

    fn partial_result(&mut self) -> String {
        String::new()
    }

    fn reset(&mut self) {
        self.reset_count += 1;
    }
}
