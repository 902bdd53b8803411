//! Controller-side synchronization engine.
//!
//! Turns raw pointer, acceleration and orientation callbacks into the small
//! semantic-action vocabulary the host understands, keeps this client's
//! presence announced on the coordination channel, and mirrors the elected
//! host's shared state. Everything rides the coordination service; there is
//! no direct controller-to-host connection.

use std::sync::Arc;
use std::time::Instant;

use anyhow::anyhow;
use async_trait::async_trait;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tracing::{trace, warn};

use coordination::{
    CoordinationConnector, CoordinationSession, LinkStatus, SessionEvent, SessionOptions,
};
use input::{
    Gesture, GestureEngine, InputTuning, MotionSnapshot, Orientation, Point, SensorStatus,
    ShakeDetector, ShakeDirection, TiltGenerator, Vec3,
};
use shared::domain::{ClientId, ClientIdentity};
use shared::error::{EngineFault, ErrorCode};
use shared::protocol::{
    ControlAction, ControlEnvelope, PresenceRecord, SelectAction, SharedSessionState,
};

pub mod command;
pub mod roles;
pub mod sync;
pub mod transport;

pub use command::Command;
pub use roles::{profile_for, ControlProfile};
pub use sync::{PresenceSync, SyncOutcome};
pub use transport::WebSocketConnector;

const EVENT_BUFFER: usize = 1024;

/// Null session in place before [`ControllerClient::connect`]. Every
/// operation fails soft, matching the engine's drop-on-disconnect rule.
pub struct MissingCoordinationSession;

#[async_trait]
impl CoordinationSession for MissingCoordinationSession {
    async fn announce(&self, _record: PresenceRecord) -> anyhow::Result<()> {
        Err(anyhow!("coordination session is not connected"))
    }

    async fn send(&self, _envelope: ControlEnvelope) -> anyhow::Result<()> {
        Err(anyhow!("coordination session is not connected"))
    }

    fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        let (_sender, receiver) = broadcast::channel(1);
        receiver
    }

    fn status(&self) -> LinkStatus {
        LinkStatus::Idle
    }

    async fn close(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Events surfaced to engine consumers (UI, audio cues, diagnostics).
#[derive(Debug, Clone)]
pub enum EngineEvent {
    HostChanged {
        host_id: Option<ClientId>,
    },
    /// The mirror was replaced wholesale from the elected host's record.
    SharedStateReplaced {
        state: SharedSessionState,
    },
    RosterUpdated {
        connected: usize,
    },
    /// An addressed message reached this client (host role consumes these).
    ActionReceived {
        envelope: ControlEnvelope,
    },
    SensorStatusChanged {
        accelerometer: SensorStatus,
        orientation: SensorStatus,
    },
    LinkStatusChanged {
        status: LinkStatus,
    },
    Fault(EngineFault),
}

struct ControllerState {
    sync: PresenceSync,
    gestures: GestureEngine,
    shake: ShakeDetector,
    shake_enabled: bool,
    tilt: TiltGenerator,
    snapshot: MotionSnapshot,
    search_query: Option<String>,
    announced_state: Option<SharedSessionState>,
    last_pan_position: Option<Point>,
    pump: Option<JoinHandle<()>>,
}

/// One controller (or host) client on a coordination channel.
pub struct ControllerClient {
    identity: ClientIdentity,
    profile: ControlProfile,
    session: Mutex<Arc<dyn CoordinationSession>>,
    inner: Mutex<ControllerState>,
    events: broadcast::Sender<EngineEvent>,
}

impl ControllerClient {
    pub fn new(identity: ClientIdentity, tuning: InputTuning) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        let profile = profile_for(identity.role);
        Arc::new(Self {
            identity,
            profile,
            session: Mutex::new(Arc::new(MissingCoordinationSession)),
            inner: Mutex::new(ControllerState {
                sync: PresenceSync::new(),
                gestures: GestureEngine::new(tuning.clone()),
                shake: ShakeDetector::new(tuning.clone()),
                shake_enabled: false,
                tilt: TiltGenerator::new(tuning),
                snapshot: MotionSnapshot::default(),
                search_query: None,
                announced_state: None,
                last_pan_position: None,
                pump: None,
            }),
            events,
        })
    }

    pub fn identity(&self) -> &ClientIdentity {
        &self.identity
    }

    pub fn profile(&self) -> ControlProfile {
        self.profile
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    pub async fn elected_host(&self) -> Option<ClientId> {
        self.inner.lock().await.sync.elected_host()
    }

    pub async fn mirrored_state(&self) -> Option<SharedSessionState> {
        self.inner.lock().await.sync.mirrored_state().cloned()
    }

    pub async fn motion_snapshot(&self) -> MotionSnapshot {
        self.inner.lock().await.snapshot.clone()
    }

    pub async fn link_status(&self) -> LinkStatus {
        self.session.lock().await.status()
    }

    /// Connect (or reconnect) through `connector` and announce presence
    /// from scratch. The mirror stays stale until the service's next full
    /// sync arrives.
    pub async fn connect(
        self: &Arc<Self>,
        connector: &dyn CoordinationConnector,
        options: SessionOptions,
    ) -> anyhow::Result<()> {
        let session = match connector.connect(options).await {
            Ok(session) => session,
            Err(error) => {
                self.emit(EngineEvent::LinkStatusChanged {
                    status: LinkStatus::Error,
                });
                return Err(error);
            }
        };
        let mut session_events = session.subscribe_events();

        let previous = {
            let mut guard = self.session.lock().await;
            std::mem::replace(&mut *guard, Arc::clone(&session))
        };
        let _ = previous.close().await;

        {
            let mut inner = self.inner.lock().await;
            if let Some(pump) = inner.pump.take() {
                pump.abort();
            }
            let client = Arc::clone(self);
            inner.pump = Some(tokio::spawn(async move {
                while let Ok(event) = session_events.recv().await {
                    client.ingest_session_event(event).await;
                }
            }));
        }

        self.emit(EngineEvent::LinkStatusChanged {
            status: LinkStatus::Connected,
        });
        self.announce_presence().await;
        Ok(())
    }

    /// Feed one coordination event. Synchronous state mutation, event
    /// emission afterwards; errors never escape this boundary.
    pub async fn ingest_session_event(&self, event: SessionEvent) {
        match event {
            SessionEvent::Presence(change) => {
                let (outcome, host_id, state) = {
                    let mut inner = self.inner.lock().await;
                    let outcome = inner.sync.apply(change);
                    (
                        outcome.clone(),
                        inner.sync.elected_host(),
                        inner.sync.mirrored_state().cloned(),
                    )
                };
                if outcome.host_changed {
                    self.emit(EngineEvent::HostChanged { host_id });
                }
                if outcome.state_replaced {
                    if let Some(state) = state {
                        self.emit(EngineEvent::SharedStateReplaced { state });
                    }
                }
                self.emit(EngineEvent::RosterUpdated {
                    connected: outcome.connected,
                });
            }
            SessionEvent::Message(envelope) => {
                if envelope.target_host_id == self.identity.client_id {
                    self.emit(EngineEvent::ActionReceived { envelope });
                } else {
                    trace!("ignoring message addressed elsewhere");
                }
            }
            SessionEvent::Disconnected => {
                self.emit(EngineEvent::LinkStatusChanged {
                    status: LinkStatus::Error,
                });
            }
        }
    }

    // ── Pointer input ───────────────────────────────────────────────────

    pub async fn pointer_down(&self, pointer_id: i64, position: Point) {
        let mut inner = self.inner.lock().await;
        inner.gestures.pointer_down(pointer_id, position);
        inner.last_pan_position = (inner.gestures.active_contacts() == 1).then_some(position);
    }

    pub async fn pointer_moved(&self, pointer_id: i64, position: Point) {
        let (zoom, pan) = {
            let mut inner = self.inner.lock().await;
            let zoom = inner.gestures.pointer_moved(pointer_id, position);
            let pan = if inner.gestures.active_contacts() == 1 {
                let delta = inner
                    .last_pan_position
                    .map(|last| (position.x - last.x, position.y - last.y));
                inner.last_pan_position = Some(position);
                delta
            } else {
                inner.last_pan_position = None;
                None
            };
            (zoom, pan)
        };
        if self.profile.zooms {
            if let Some(delta) = zoom {
                self.send_action(ControlAction::Zoom { delta }).await;
            }
        }
        if self.profile.pans_on_drag {
            if let Some((dx, dy)) = pan {
                self.send_action(ControlAction::Pan { dx, dy }).await;
            }
        }
    }

    pub async fn pointer_up(&self, pointer_id: i64, position: Point) {
        let gesture = {
            let mut inner = self.inner.lock().await;
            inner.last_pan_position = None;
            inner.gestures.pointer_up(pointer_id, position)
        };
        if self.profile.classifies_release {
            if let Some(gesture) = gesture {
                self.send_action(ControlAction::Select {
                    action: select_for_gesture(gesture),
                })
                .await;
            }
        }
    }

    pub async fn pointer_cancelled(&self, pointer_id: i64) {
        let mut inner = self.inner.lock().await;
        inner.gestures.pointer_cancelled(pointer_id);
        inner.last_pan_position = None;
    }

    pub async fn wheel(&self, wheel_delta_y: f64, trackpad_pinch: bool) {
        if !self.profile.zooms {
            return;
        }
        let delta = {
            let inner = self.inner.lock().await;
            inner.gestures.wheel(wheel_delta_y, trackpad_pinch)
        };
        if delta != 0.0 {
            self.send_action(ControlAction::Zoom { delta }).await;
        }
    }

    // ── Motion input ────────────────────────────────────────────────────

    pub async fn accelerometer_sample(&self, accel: Vec3, accel_with_gravity: Vec3) {
        self.accelerometer_sample_at(accel, accel_with_gravity, Instant::now())
            .await;
    }

    pub async fn accelerometer_sample_at(
        &self,
        accel: Vec3,
        accel_with_gravity: Vec3,
        now: Instant,
    ) {
        let confirmed = {
            let mut inner = self.inner.lock().await;
            // Diagnostic read-back sees every sample, armed or not.
            inner.snapshot.record_acceleration(accel, accel_with_gravity);
            if inner.shake_enabled {
                inner.shake.ingest(accel, now)
            } else {
                None
            }
        };
        if self.profile.shake_select {
            if let Some(direction) = confirmed {
                self.send_action(ControlAction::Select {
                    action: select_for_shake(direction),
                })
                .await;
            }
        }
    }

    pub async fn orientation_sample(&self, orientation: Orientation) {
        self.orientation_sample_at(orientation, Instant::now()).await;
    }

    pub async fn orientation_sample_at(&self, orientation: Orientation, now: Instant) {
        let emission = {
            let mut inner = self.inner.lock().await;
            inner.snapshot.record_orientation(orientation);
            inner.tilt.ingest(orientation, now)
        };
        if self.profile.tilts {
            if let Some(emission) = emission {
                self.send_action(ControlAction::Tilt {
                    tilt_x: emission.tilt_x,
                    tilt_z: emission.tilt_z,
                    transmitting: emission.transmitting,
                })
                .await;
            }
        }
    }

    pub async fn enable_shake(&self) {
        let mut inner = self.inner.lock().await;
        match inner.snapshot.accelerometer {
            SensorStatus::Unavailable | SensorStatus::Denied => {
                self.emit(EngineFault::new(
                    fault_code(inner.snapshot.accelerometer),
                    "accelerometer not usable; shake detection stays off",
                )
                .into());
            }
            _ => inner.shake_enabled = true,
        }
    }

    /// Synchronous cancellation: detection stops and the armed/debounce
    /// state is gone before this returns.
    pub async fn disable_shake(&self) {
        let mut inner = self.inner.lock().await;
        inner.shake_enabled = false;
        inner.shake.reset();
    }

    pub async fn enable_tilt(&self) {
        let mut inner = self.inner.lock().await;
        match inner.snapshot.orientation_sensor {
            SensorStatus::Unavailable | SensorStatus::Denied => {
                self.emit(EngineFault::new(
                    fault_code(inner.snapshot.orientation_sensor),
                    "orientation sensor not usable; tilt stays off",
                )
                .into());
            }
            _ => {
                let current = inner.snapshot.last_orientation;
                inner.tilt.enable(current);
            }
        }
    }

    /// Stops tilt transmission, clears calibration, and sends the forced
    /// final update with the disabled flag.
    pub async fn disable_tilt(&self) {
        let emission = {
            let mut inner = self.inner.lock().await;
            if !inner.tilt.is_transmitting() {
                return;
            }
            inner.tilt.disable()
        };
        if self.profile.tilts {
            self.send_action(ControlAction::Tilt {
                tilt_x: emission.tilt_x,
                tilt_z: emission.tilt_z,
                transmitting: emission.transmitting,
            })
            .await;
        }
    }

    pub async fn report_accelerometer_status(&self, status: SensorStatus) {
        let (accelerometer, orientation) = {
            let mut inner = self.inner.lock().await;
            inner.snapshot.accelerometer = status;
            if !status.is_usable() {
                inner.shake_enabled = false;
                inner.shake.reset();
            }
            (inner.snapshot.accelerometer, inner.snapshot.orientation_sensor)
        };
        self.emit(EngineEvent::SensorStatusChanged {
            accelerometer,
            orientation,
        });
    }

    pub async fn report_orientation_status(&self, status: SensorStatus) {
        let (accelerometer, orientation) = {
            let mut inner = self.inner.lock().await;
            inner.snapshot.orientation_sensor = status;
            if !status.is_usable() && inner.tilt.is_transmitting() {
                inner.tilt.disable();
            }
            (inner.snapshot.accelerometer, inner.snapshot.orientation_sensor)
        };
        self.emit(EngineEvent::SensorStatusChanged {
            accelerometer,
            orientation,
        });
    }

    // ── Text input ──────────────────────────────────────────────────────

    /// Route free text: recognized phrases come back as side-channel
    /// commands, everything else becomes this client's literal search
    /// query (propagated by re-announcement, never as a message).
    pub async fn submit_text(&self, text: &str) -> Option<Command> {
        if let Some(command) = command::parse(text) {
            return Some(command);
        }
        self.set_search_query(text).await;
        None
    }

    pub async fn set_search_query(&self, query: &str) {
        {
            let mut inner = self.inner.lock().await;
            inner.search_query = Some(query.to_string());
        }
        self.announce_presence().await;
    }

    /// Host-role clients publish their shared state through here; the
    /// record is replaced wholesale on the channel.
    pub async fn announce_shared_state(&self, state: SharedSessionState) {
        if !self.identity.role.is_host() {
            warn!("non-host role tried to announce shared state; ignoring");
            return;
        }
        {
            let mut inner = self.inner.lock().await;
            inner.announced_state = Some(state);
        }
        self.announce_presence().await;
    }

    async fn announce_presence(&self) {
        let record = {
            let inner = self.inner.lock().await;
            PresenceRecord {
                identity: self.identity.clone(),
                search_query: inner.search_query.clone(),
                shared_state: inner.announced_state.clone(),
            }
        };
        let session = self.current_session().await;
        if let Err(error) = session.announce(record).await {
            warn!(%error, "presence announcement failed");
            self.emit(
                EngineFault::new(ErrorCode::Transport, "presence announcement failed").into(),
            );
        }
    }

    /// Addressed fire-and-forget send. Without an elected host the action
    /// is dropped before it reaches the transport; transport failures are
    /// logged and dropped (the next sample supersedes them).
    async fn send_action(&self, action: ControlAction) {
        let target = { self.inner.lock().await.sync.elected_host() };
        let Some(target_host_id) = target else {
            trace!("no elected host; dropping action");
            return;
        };
        let envelope = ControlEnvelope {
            sender_id: self.identity.client_id,
            sender_role: self.identity.role,
            sender_name: self.identity.display_name.clone(),
            target_host_id,
            action,
        };
        let session = self.current_session().await;
        if let Err(error) = session.send(envelope).await {
            warn!(%error, "dropping update message");
        }
    }

    async fn current_session(&self) -> Arc<dyn CoordinationSession> {
        Arc::clone(&*self.session.lock().await)
    }

    fn emit(&self, event: EngineEvent) {
        let _ = self.events.send(event);
    }
}

impl From<EngineFault> for EngineEvent {
    fn from(fault: EngineFault) -> Self {
        EngineEvent::Fault(fault)
    }
}

fn fault_code(status: SensorStatus) -> ErrorCode {
    match status {
        SensorStatus::Denied => ErrorCode::SensorDenied,
        _ => ErrorCode::SensorUnavailable,
    }
}

fn select_for_gesture(gesture: Gesture) -> SelectAction {
    match gesture {
        Gesture::Tap => SelectAction::Tap,
        Gesture::North => SelectAction::North,
        Gesture::South => SelectAction::South,
        Gesture::East => SelectAction::East,
        Gesture::West => SelectAction::West,
    }
}

fn select_for_shake(direction: ShakeDirection) -> SelectAction {
    match direction {
        ShakeDirection::East => SelectAction::East,
        ShakeDirection::West => SelectAction::West,
        ShakeDirection::North => SelectAction::North,
        ShakeDirection::South => SelectAction::South,
        ShakeDirection::Up => SelectAction::Up,
        ShakeDirection::Down => SelectAction::Down,
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
