//! Seam to the external coordination service.
//!
//! The service itself is an external collaborator; this crate defines only
//! the contract the engine requires from it: channel-scoped identity
//! announcement with whole-record replace semantics, subscription to
//! sync/join/leave presence events, and unordered at-most-once message
//! broadcast scoped to the same channel.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;

use shared::protocol::{ChannelEvent, ControlEnvelope, PresenceRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Coordination service endpoint.
    pub service_url: String,
    /// Well-known channel the controllers and the host share.
    pub channel: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStatus {
    Idle,
    Connected,
    Error,
}

/// An open, channel-scoped connection to the coordination service.
#[async_trait]
pub trait CoordinationSession: Send + Sync {
    /// Replace this client's announced record wholesale. There is no
    /// per-field patch; re-announcing is the only way to change anything.
    async fn announce(&self, record: PresenceRecord) -> anyhow::Result<()>;

    /// Fire-and-forget broadcast of an addressed message on the channel.
    /// Delivery is unordered and at-most-once.
    async fn send(&self, envelope: ControlEnvelope) -> anyhow::Result<()>;

    /// Presence events: full sync snapshots, joins, leaves, plus inbound
    /// addressed messages.
    fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent>;

    fn status(&self) -> LinkStatus;

    async fn close(&self) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Presence(ChannelEvent),
    Message(ControlEnvelope),
    Disconnected,
}

#[async_trait]
pub trait CoordinationConnector: Send + Sync {
    async fn connect(&self, options: SessionOptions) -> anyhow::Result<Arc<dyn CoordinationSession>>;
}
