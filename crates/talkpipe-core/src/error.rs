use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("model not found at {0}")]
    ModelNotFound(std::path::PathBuf),

    #[error("keyword must not be empty")]
    EmptyKeyword,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("recognizer initialization failed: {0}")]
    InitializationFailed(String),

    #[error("recognizer processing failed: {0}")]
    ProcessingFailed(String),
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("handshake failed: {0}")]
    Handshake(String),

    #[error("socket I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed event: {0}")]
    Event(#[from] serde_json::Error),

    #[error("server closed the connection")]
    PeerClosed,

    #[error("no transcript within {}s", .0.as_secs())]
    Timeout(std::time::Duration),
}
