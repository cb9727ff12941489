use std::fmt;
use std::io::{self, Write};

/// One line of the stdout contract consumed by the host process.
///
/// The host reads these incrementally, so every line must be flushed the
/// moment it is written — see [`ProtocolWriter::emit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolLine {
    /// Keyword found in the current utterance (spotting mode).
    Detected,
    /// Handshake succeeded; carries the kind of the server's first event.
    Connected(String),
    /// Bridge is about to start streaming audio.
    Ready,
    /// Final result for the session; the text may be empty.
    Transcript(String),
    /// Fatal condition for the current session.
    Error(String),
}

impl fmt::Display for ProtocolLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolLine::Detected => write!(f, "DETECTED"),
            ProtocolLine::Connected(kind) => write!(f, "CONNECTED: {kind}"),
            ProtocolLine::Ready => write!(f, "READY"),
            // No trailing space on an empty transcript.
            ProtocolLine::Transcript(text) if text.is_empty() => write!(f, "TRANSCRIPT:"),
            ProtocolLine::Transcript(text) => write!(f, "TRANSCRIPT: {text}"),
            ProtocolLine::Error(msg) => write!(f, "ERROR: {msg}"),
        }
    }
}

/// Writes protocol lines to the host, one event per line, flushed eagerly.
pub struct ProtocolWriter<W: Write> {
    sink: W,
}

impl<W: Write> ProtocolWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn emit(&mut self, line: &ProtocolLine) -> io::Result<()> {
        writeln!(self.sink, "{line}")?;
        self.sink.flush()
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}
