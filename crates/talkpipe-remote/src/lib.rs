pub mod client;
pub mod event;
pub mod session;
pub mod transport;

pub use client::WyomingClient;
pub use event::Event;
pub use session::{SessionConfig, SessionError, SessionPhase, TranscriptionSession};
pub use transport::AsrTransport;
