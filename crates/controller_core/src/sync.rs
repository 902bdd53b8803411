//! Presence ingestion and host election.
//!
//! A pure synchronous state machine over the coordination channel's
//! sync/join/leave events. The engine drives it from the network callback
//! and forwards the outcome to its event subscribers.

use std::collections::HashMap;

use tracing::info;

use shared::domain::ClientId;
use shared::protocol::{ChannelEvent, PresenceRecord, SharedSessionState};

/// What one applied presence event changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub host_changed: bool,
    /// The mirror was rewritten wholesale from the elected host's record.
    pub state_replaced: bool,
    pub connected: usize,
}

/// Mirrors the channel's presence records and tracks the authoritative host.
///
/// At most one record is authoritative at any instant. Election is
/// deterministic in the record set alone: the host candidate with the
/// greatest `session_start` wins (newest wins — a deliberate, known
/// clock-skew-sensitive heuristic), ties broken by client id so arrival
/// order never matters.
#[derive(Debug, Default)]
pub struct PresenceSync {
    records: HashMap<ClientId, PresenceRecord>,
    elected: Option<ClientId>,
    mirrored: Option<SharedSessionState>,
}

impl PresenceSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elected_host(&self) -> Option<ClientId> {
        self.elected
    }

    /// Read-only mirror of the elected host's shared state. Stale (not
    /// cleared) while no host is elected.
    pub fn mirrored_state(&self) -> Option<&SharedSessionState> {
        self.mirrored.as_ref()
    }

    pub fn connected(&self) -> usize {
        self.records.len()
    }

    pub fn apply(&mut self, event: ChannelEvent) -> SyncOutcome {
        match event {
            ChannelEvent::Sync { records } => {
                self.records = records
                    .into_iter()
                    .map(|record| (record.identity.client_id, record))
                    .collect();
            }
            ChannelEvent::Join { record } => {
                self.records.insert(record.identity.client_id, record);
            }
            ChannelEvent::Leave { client_id } => {
                self.records.remove(&client_id);
            }
        }
        self.reelect()
    }

    fn reelect(&mut self) -> SyncOutcome {
        let candidate = self
            .records
            .values()
            .filter(|record| record.identity.role.is_host())
            .max_by_key(|record| (record.identity.session_start, record.identity.client_id));

        // A host record without usable shared state counts as no host at
        // all; the stale mirror is kept rather than partially updated.
        let (elected, fresh_state) = match candidate {
            Some(record) => match &record.shared_state {
                Some(state) => (Some(record.identity.client_id), Some(state.clone())),
                None => (None, None),
            },
            None => (None, None),
        };

        let host_changed = elected != self.elected;
        if host_changed {
            match elected {
                Some(host_id) => info!(?host_id, "authoritative host changed"),
                None => info!("no authoritative host on channel"),
            }
        }
        self.elected = elected;

        let state_replaced = fresh_state.is_some();
        if let Some(state) = fresh_state {
            self.mirrored = Some(state);
        }

        SyncOutcome {
            host_changed,
            state_replaced,
            connected: self.records.len(),
        }
    }
}

#[cfg(test)]
#[path = "tests/sync_tests.rs"]
mod tests;
