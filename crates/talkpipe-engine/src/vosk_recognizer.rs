use crate::recognizer_trait::{Decoding, Recognizer};
use std::path::Path;
use talkpipe_core::{AudioChunk, EngineError};
use vosk::{DecodingState, Model};

/// Offline Kaldi-based recognizer backed by libvosk.
pub struct VoskRecognizer {
    inner: vosk::Recognizer,
    // libvosk keeps a reference to the model; keep it alive alongside.
    _model: Model,
}

impl VoskRecognizer {
    pub fn new(model_path: &Path, sample_rate: u32) -> Result<Self, EngineError> {
        let model = Model::new(model_path.to_string_lossy()).ok_or_else(|| {
            EngineError::InitializationFailed(format!(
                "failed to load model from {}",
                model_path.display()
            ))
        })?;
        let inner = vosk::Recognizer::new(&model, sample_rate as f32).ok_or_else(|| {
            EngineError::InitializationFailed(format!(
                "failed to create recognizer at {sample_rate}Hz"
            ))
        })?;
        Ok(Self {
            inner,
            _model: model,
        })
    }

    fn to_samples(bytes: &[u8]) -> Vec<i16> {
        bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect()
    }
}

impl Recognizer for VoskRecognizer {
    fn name(&self) -> &str {
        "vosk"
    }

    fn feed(&mut self, chunk: &AudioChunk) -> Result<Decoding, EngineError> {
        let samples = Self::to_samples(&chunk.bytes);
        match self.inner.accept_waveform(&samples) {
            DecodingState::Finalized => Ok(Decoding::Finalized),
            DecodingState::Running => Ok(Decoding::Running),
            DecodingState::Failed => Err(EngineError::ProcessingFailed(
                "decoder rejected waveform".to_string(),
            )),
        }
    }

    fn final_result(&mut self) -> String {
        self.inner
            .result()
            .single()
            .map(|alt| alt.text.to_string())
            .unwrap_or_default()
    }

    fn partial_result(&mut self) -> String {
        self.inner.partial_result().partial.to_string()
    }

    fn reset(&mut self) {
        self.inner.reset();
    }
}
