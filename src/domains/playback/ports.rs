use super::messages::PlaybackMessage;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConnectionError {
    #[error("client disconnected")]
    Disconnected,

    #[error("transport error: {0}")]
    Transport(String),
}

/// Port for a persistent, client-facing playback connection (WebSocket, test double, ...).
#[async_trait]
pub trait PlaybackConnection: Send {
    async fn send(&mut self, message: &PlaybackMessage) -> Result<(), ConnectionError>;

    /// Resolves once the client has closed its side. Must be cancel-safe:
    /// the streamer races it against the pacing delay.
    async fn closed(&mut self);

    /// Close from the server side. Never fails; errors are swallowed by the adapter.
    async fn close(&mut self);
}
