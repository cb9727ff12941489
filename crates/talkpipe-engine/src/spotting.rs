use crate::recognizer_trait::{Decoding, Recognizer};
use std::io::{self, Write};
use talkpipe_core::{AudioChunk, ConfigError, EngineError, ProtocolLine, ProtocolWriter};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpottingError {
    #[error("audio input failed: {0}")]
    Input(#[from] io::Error),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Detects a keyword anywhere in partial or final recognizer output,
/// emitting at most one `DETECTED` line per utterance.
///
/// A hit in a partial result also resets the decoder, so the same growing
/// partial cannot fire twice. The trade-off: audio between the reset and
/// the decoder's natural re-synchronization goes undetected. Decoding after
/// the reset counts as a new utterance and may legitimately re-detect.
pub struct SpottingSession {
    keyword: String,
    frames_consumed: u64,
}

impl SpottingSession {
    pub fn new(keyword: &str) -> Result<Self, ConfigError> {
        // An empty keyword is a substring of everything.
        if keyword.trim().is_empty() {
            return Err(ConfigError::EmptyKeyword);
        }
        Ok(Self {
            keyword: keyword.to_lowercase(),
            frames_consumed: 0,
        })
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn frames_consumed(&self) -> u64 {
        self.frames_consumed
    }

    /// Run the session to end-of-stream. No summary line is emitted; the
    /// host learns of the end by observing process exit.
    pub fn run<W: Write>(
        &mut self,
        frames: impl Iterator<Item = io::Result<AudioChunk>>,
        recognizer: &mut dyn Recognizer,
        out: &mut ProtocolWriter<W>,
    ) -> Result<(), SpottingError> {
        for frame in frames {
            let chunk = match frame {
                Ok(chunk) => chunk,
                Err(e) => {
                    out.emit(&ProtocolLine::Error(format!("audio input failed: {e}")))?;
                    return Err(SpottingError::Input(e));
                }
            };
            self.frames_consumed += 1;

            match recognizer.feed(&chunk)? {
                Decoding::Finalized => {
                    let text = recognizer.final_result().to_lowercase();
                    if !text.is_empty() {
                        tracing::debug!("recognized: {text:?}");
                        if text.contains(&self.keyword) {
                            out.emit(&ProtocolLine::Detected)?;
                        }
                    }
                }
                Decoding::Running => {
                    let partial = recognizer.partial_result().to_lowercase();
                    if !partial.is_empty() && partial.contains(&self.keyword) {
                        out.emit(&ProtocolLine::Detected)?;
                        recognizer.reset();
                    }
                }
            }
        }
        tracing::debug!("end of stream after {} frames", self.frames_consumed);
        Ok(())
    }
}
