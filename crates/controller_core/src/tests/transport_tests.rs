use super::*;

use std::time::Duration;

use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::DateTime;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::timeout;
use uuid::Uuid;

use shared::domain::{ClientId, ClientIdentity, Role};
use shared::protocol::{ControlAction, SelectAction};

#[derive(Clone)]
struct StubState {
    inbound: mpsc::UnboundedSender<Frame>,
    scripted: Vec<Frame>,
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(_channel): Path<String>,
    State(state): State<StubState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| serve_channel(socket, state))
}

/// Records every inbound frame; answers the first announce with the
/// scripted frames, like the real service answering with a full sync.
async fn serve_channel(mut socket: WebSocket, state: StubState) {
    while let Some(Ok(message)) = socket.recv().await {
        if let WsMessage::Text(text) = message {
            let frame: Frame = serde_json::from_str(&text).expect("frame");
            let is_announce = matches!(frame, Frame::Announce { .. });
            let _ = state.inbound.send(frame);
            if is_announce {
                for scripted in &state.scripted {
                    let encoded = serde_json::to_string(scripted).expect("encode");
                    if socket.send(WsMessage::Text(encoded)).await.is_err() {
                        return;
                    }
                }
            }
        }
    }
}

async fn spawn_stub(scripted: Vec<Frame>) -> (String, mpsc::UnboundedReceiver<Frame>) {
    let (inbound, received) = mpsc::unbounded_channel();
    let app = Router::new()
        .route("/channels/:channel", get(ws_handler))
        .with_state(StubState { inbound, scripted });
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    (format!("ws://{addr}"), received)
}

fn options(service_url: &str) -> SessionOptions {
    SessionOptions {
        service_url: service_url.to_string(),
        channel: "main".into(),
    }
}

fn controller_record(n: u128) -> PresenceRecord {
    PresenceRecord::for_identity(ClientIdentity {
        client_id: ClientId(Uuid::from_u128(n)),
        role: Role::Navigator,
        display_name: format!("nav-{n}"),
        session_start: DateTime::from_timestamp(1_000, 0).expect("timestamp"),
    })
}

#[tokio::test]
async fn announce_reaches_the_service_and_sync_comes_back() {
    let record = controller_record(1);
    let scripted = vec![Frame::Sync {
        records: vec![record.clone()],
    }];
    let (service_url, mut received) = spawn_stub(scripted).await;

    let session = WebSocketConnector
        .connect(options(&service_url))
        .await
        .expect("connect");
    assert_eq!(session.status(), LinkStatus::Connected);

    let mut events = session.subscribe_events();
    session.announce(record.clone()).await.expect("announce");

    let announced = timeout(Duration::from_secs(5), received.recv())
        .await
        .expect("stub alive")
        .expect("frame");
    assert_eq!(announced, Frame::Announce { record: record.clone() });

    let event = timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("event in time")
        .expect("subscribed");
    assert_eq!(
        event,
        SessionEvent::Presence(ChannelEvent::Sync {
            records: vec![record]
        })
    );
}

#[tokio::test]
async fn messages_are_broadcast_on_the_channel() {
    let (service_url, mut received) = spawn_stub(Vec::new()).await;
    let session = WebSocketConnector
        .connect(options(&service_url))
        .await
        .expect("connect");

    let envelope = ControlEnvelope {
        sender_id: ClientId(Uuid::from_u128(2)),
        sender_role: Role::Selector,
        sender_name: "sel".into(),
        target_host_id: ClientId(Uuid::from_u128(9)),
        action: ControlAction::Select {
            action: SelectAction::North,
        },
    };
    session.send(envelope.clone()).await.expect("send");

    let frame = timeout(Duration::from_secs(5), received.recv())
        .await
        .expect("stub alive")
        .expect("frame");
    assert_eq!(frame, Frame::Message { envelope });
}

#[tokio::test]
async fn close_tears_the_session_down() {
    let (service_url, _received) = spawn_stub(Vec::new()).await;
    let session = WebSocketConnector
        .connect(options(&service_url))
        .await
        .expect("connect");
    session.close().await.expect("close");
    assert_eq!(session.status(), LinkStatus::Idle);

    let record = controller_record(3);
    assert!(session.announce(record).await.is_err());
}

#[tokio::test]
async fn invalid_service_url_fails_to_connect() {
    let result = WebSocketConnector.connect(options("not a url")).await;
    assert!(result.is_err());
}
