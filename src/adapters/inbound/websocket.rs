use crate::domains::playback::{ConnectionError, PlaybackConnection, PlaybackMessage};
use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};

/// Playback connection over an upgraded axum WebSocket.
///
/// Frames are JSON text. Inbound frames other than close are ignored; the
/// read half is only watched to notice the client going away.
pub struct WebSocketConnection {
    sender: SplitSink<WebSocket, Message>,
    receiver: SplitStream<WebSocket>,
    client_closed: bool,
}

impl WebSocketConnection {
    pub fn new(socket: WebSocket) -> Self {
        let (sender, receiver) = socket.split();
        Self {
            sender,
            receiver,
            client_closed: false,
        }
    }
}

#[async_trait]
impl PlaybackConnection for WebSocketConnection {
    async fn send(&mut self, message: &PlaybackMessage) -> Result<(), ConnectionError> {
        if self.client_closed {
            return Err(ConnectionError::Disconnected);
        }
        let text = serde_json::to_string(message)
            .map_err(|e| ConnectionError::Transport(format!("failed to encode frame: {}", e)))?;
        self.sender.send(Message::Text(text)).await.map_err(|_| {
            self.client_closed = true;
            ConnectionError::Disconnected
        })
    }

    async fn closed(&mut self) {
        while !self.client_closed {
            match self.receiver.next().await {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => self.client_closed = true,
                Some(Ok(_)) => {}
            }
        }
    }

    async fn close(&mut self) {
        // Closing the sink sends the close frame; a peer that already left is fine.
        let _ = self.sender.close().await;
    }
}
