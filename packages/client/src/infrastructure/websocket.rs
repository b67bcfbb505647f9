//! WebSocket channels to the backend.
//!
//! - [`PushChannel`]: room subscription delivering [`RoomUpdate`]s
//! - [`ImportProgressStream`]: per-game progress of a streamed collection import

use std::pin::Pin;

use futures_util::{SinkExt, Stream, StreamExt, stream};
use tokio::{net::TcpStream, sync::mpsc, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

use crate::{
    domain::{ImportProgress, RoomId, RoomUpdate},
    infrastructure::{
        dto::websocket::{AddGamesMessage, SubscriptionMessage, register_message},
        error::ChannelError,
    },
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Event delivered by the push channel to the room event loop
#[derive(Debug)]
pub enum PushEvent {
    Update(RoomUpdate),
    /// The channel is gone; no further events follow
    Failed(ChannelError),
}

/// Decode one text frame into a value, or `None` for frames that carry no payload
fn decode_frame<T: serde::de::DeserializeOwned>(
    message: Message,
) -> Option<Result<T, ChannelError>> {
    let result = match message {
        Message::Text(text) => serde_json::from_str(text.as_str()),
        Message::Binary(bytes) => serde_json::from_slice(&bytes),
        _ => return None,
    };
    Some(result.map_err(|e| ChannelError::InvalidMessage(e.to_string())))
}

/// Room subscription on `/api/echo`
pub struct PushChannel {
    reader: JoinHandle<()>,
}

impl PushChannel {
    /// Connect, register for `room_id`, and forward every update to `events`.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError` if the connection or the register frame fails.
    /// Failures after that are delivered as [`PushEvent::Failed`].
    pub async fn connect(
        ws_base: &str,
        room_id: &RoomId,
        events: mpsc::UnboundedSender<PushEvent>,
    ) -> Result<Self, ChannelError> {
        let url = format!("{}/api/echo", ws_base.trim_end_matches('/'));
        let (mut stream, _) = connect_async(url.as_str())
            .await
            .map_err(|e| ChannelError::Connect(Box::new(e)))?;

        stream
            .send(Message::Text(register_message(room_id.as_str()).into()))
            .await
            .map_err(|e| ChannelError::Send(Box::new(e)))?;
        tracing::info!("Registered for updates of room '{}'", room_id);

        let reader = tokio::spawn(read_updates(stream, events));
        Ok(Self { reader })
    }

    /// Stop receiving updates
    pub fn close(&self) {
        self.reader.abort();
    }
}

impl Drop for PushChannel {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

async fn read_updates(mut stream: WsStream, events: mpsc::UnboundedSender<PushEvent>) {
    let failure = loop {
        let message = match stream.next().await {
            Some(Ok(Message::Close(_))) | None => break ChannelError::Closed,
            Some(Ok(message)) => message,
            Some(Err(e)) => break ChannelError::Receive(Box::new(e)),
        };

        let update = match decode_frame::<SubscriptionMessage>(message) {
            None => continue,
            Some(Ok(msg)) => RoomUpdate::try_from(msg),
            Some(Err(e)) => Err(e),
        };

        match update {
            Ok(update) => {
                tracing::debug!("Received {} update", update.kind());
                if events.send(PushEvent::Update(update)).is_err() {
                    // Event loop has gone away
                    return;
                }
            }
            Err(e) => tracing::warn!("Skipping malformed push message: {}", e),
        }
    };

    tracing::error!("Push channel stopped: {}", failure);
    let _ = events.send(PushEvent::Failed(failure));
}

/// Progress events of a streamed collection import
pub struct ImportProgressStream {
    stream: WsStream,
}

impl ImportProgressStream {
    pub async fn connect(
        ws_base: &str,
        room_id: &RoomId,
        catalog_user: &str,
    ) -> Result<Self, ChannelError> {
        let url = format!(
            "{}/api/rooms/{}/bgguser/{}/progress",
            ws_base.trim_end_matches('/'),
            urlencoding::encode(room_id.as_str()),
            urlencoding::encode(catalog_user)
        );
        let (stream, _) = connect_async(url.as_str())
            .await
            .map_err(|e| ChannelError::Connect(Box::new(e)))?;
        Ok(Self { stream })
    }

    /// Next progress event, or `None` once the server closes the stream
    pub async fn next_progress(&mut self) -> Option<Result<ImportProgress, ChannelError>> {
        loop {
            let message = match self.stream.next().await? {
                Ok(Message::Close(_)) => return None,
                Ok(message) => message,
                Err(e) => return Some(Err(ChannelError::Receive(Box::new(e)))),
            };
            if let Some(result) = decode_frame::<AddGamesMessage>(message) {
                return Some(result.map(ImportProgress::from));
            }
        }
    }

    /// Adapt into a [`Stream`] of progress events
    pub fn into_stream(
        self,
    ) -> Pin<Box<dyn Stream<Item = Result<ImportProgress, ChannelError>> + Send>> {
        Box::pin(stream::unfold(self, |mut this| async move {
            let item = this.next_progress().await?;
            Some((item, this))
        }))
    }
}
