pub mod null_recognizer;
pub mod recognizer_trait;
pub mod spotting;
#[cfg(feature = "vosk")]
pub mod vosk_recognizer;

pub use null_recognizer::NullRecognizer;
pub use recognizer_trait::{Decoding, Recognizer};
pub use spotting::{SpottingError, SpottingSession};
#[cfg(feature = "vosk")]
pub use vosk_recognizer::VoskRecognizer;
