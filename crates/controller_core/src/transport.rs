//! Websocket implementation of the coordination seam.
//!
//! One connection per channel; a single read task pumps inbound frames into
//! the session's broadcast. Outbound sends fail soft — the engine logs and
//! drops, never retries. Reconnection policy belongs to the caller.

use std::sync::{Arc, Mutex as StdMutex};

use anyhow::Context;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};
use url::Url;

use coordination::{
    CoordinationConnector, CoordinationSession, LinkStatus, SessionEvent, SessionOptions,
};
use shared::protocol::{ChannelEvent, ControlEnvelope, Frame, PresenceRecord};

const EVENT_BUFFER: usize = 256;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid coordination service url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("coordination session is closed")]
    Closed,
}

type WsSink = futures::stream::SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Connects to `{service_url}/channels/{channel}` and speaks the JSON frame
/// protocol from [`shared::protocol::Frame`].
pub struct WebSocketConnector;

#[async_trait]
impl CoordinationConnector for WebSocketConnector {
    async fn connect(
        &self,
        options: SessionOptions,
    ) -> anyhow::Result<Arc<dyn CoordinationSession>> {
        let url = channel_url(&options)?;
        let (stream, _) = connect_async(url.as_str())
            .await
            .with_context(|| format!("connecting coordination channel {url}"))?;
        let (sink, mut read) = stream.split();

        let (events, _) = broadcast::channel(EVENT_BUFFER);
        let status = Arc::new(StdMutex::new(LinkStatus::Connected));

        let pump_events = events.clone();
        let pump_status = Arc::clone(&status);
        let reader = tokio::spawn(async move {
            while let Some(message) = read.next().await {
                match message {
                    Ok(Message::Text(text)) => match serde_json::from_str::<Frame>(&text) {
                        Ok(frame) => dispatch_frame(frame, &pump_events),
                        Err(error) => warn!(%error, "ignoring malformed frame"),
                    },
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(error) => {
                        warn!(%error, "coordination read failed");
                        break;
                    }
                }
            }
            if let Ok(mut status) = pump_status.lock() {
                *status = LinkStatus::Error;
            }
            let _ = pump_events.send(SessionEvent::Disconnected);
            debug!("coordination read task finished");
        });

        Ok(Arc::new(WebSocketSession {
            sink: Mutex::new(Some(sink)),
            events,
            status,
            reader: StdMutex::new(Some(reader)),
        }))
    }
}

struct WebSocketSession {
    sink: Mutex<Option<WsSink>>,
    events: broadcast::Sender<SessionEvent>,
    status: Arc<StdMutex<LinkStatus>>,
    reader: StdMutex<Option<JoinHandle<()>>>,
}

impl WebSocketSession {
    async fn send_frame(&self, frame: Frame) -> anyhow::Result<()> {
        let text = serde_json::to_string(&frame).context("encoding frame")?;
        let mut guard = self.sink.lock().await;
        let sink = guard.as_mut().ok_or(TransportError::Closed)?;
        sink.send(Message::Text(text))
            .await
            .context("websocket send")?;
        Ok(())
    }
}

#[async_trait]
impl CoordinationSession for WebSocketSession {
    async fn announce(&self, record: PresenceRecord) -> anyhow::Result<()> {
        self.send_frame(Frame::Announce { record }).await
    }

    async fn send(&self, envelope: ControlEnvelope) -> anyhow::Result<()> {
        self.send_frame(Frame::Message { envelope }).await
    }

    fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn status(&self) -> LinkStatus {
        self.status
            .lock()
            .map(|status| *status)
            .unwrap_or(LinkStatus::Error)
    }

    async fn close(&self) -> anyhow::Result<()> {
        if let Some(mut sink) = self.sink.lock().await.take() {
            let _ = sink.send(Message::Close(None)).await;
        }
        if let Ok(mut reader) = self.reader.lock() {
            if let Some(handle) = reader.take() {
                handle.abort();
            }
        }
        if let Ok(mut status) = self.status.lock() {
            *status = LinkStatus::Idle;
        }
        Ok(())
    }
}

fn dispatch_frame(frame: Frame, events: &broadcast::Sender<SessionEvent>) {
    let event = match frame {
        Frame::Sync { records } => SessionEvent::Presence(ChannelEvent::Sync { records }),
        Frame::Join { record } => SessionEvent::Presence(ChannelEvent::Join { record }),
        Frame::Leave { client_id } => SessionEvent::Presence(ChannelEvent::Leave { client_id }),
        Frame::Message { envelope } => SessionEvent::Message(envelope),
        // Announce frames only travel client -> service.
        Frame::Announce { .. } => return,
    };
    let _ = events.send(event);
}

fn channel_url(options: &SessionOptions) -> Result<Url, TransportError> {
    let raw = format!(
        "{}/channels/{}",
        options.service_url.trim_end_matches('/'),
        options.channel
    );
    Ok(Url::parse(&raw)?)
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
