use crate::domain::ids::{player_id, rand_id};
use crate::domain::ports::{ClientSink, SinkError};
use crate::interface_adapters::net::sink::WsSink;
use crate::interface_adapters::protocol::{ClientEnvelope, ServerMessage, WelcomeDto};
use crate::interface_adapters::state::AppState;
use crate::use_cases::{Session, SessionError};

use axum::{
    extract::{
        State,
        ws::{Message, Utf8Bytes, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{Stream, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, error, info, info_span, warn};

const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, thiserror::Error)]
pub enum NetError {
    // Categorizes connection lifecycle failures so callers can decide policy.
    #[error("websocket error: {0}")]
    Ws(#[from] axum::Error),
    #[error("malformed client message: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Sink(#[from] SinkError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    // Any origin may connect; there is no identity beyond the connection itself.
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    // Separate connection id so transport logs correlate even before the player spawns.
    let conn_id = rand_id();
    let player_id = player_id();
    let span = info_span!("conn", conn_id, player_id = %player_id);

    async move {
        let (socket_tx, mut stream) = socket.split();
        let (sink, writer) = WsSink::spawn(socket_tx, state.outbound_capacity);
        let sink = Arc::new(sink);

        let session = match bootstrap_session(player_id, sink.clone(), &state).await {
            Ok(session) => session,
            Err(e) => {
                error!(error = %e, "failed to bootstrap connection");
                drop(sink);
                finish_writer(writer).await;
                return;
            }
        };
        info!("client connected");

        // Main Client Loop: the only way out is a read failure or a close.
        match run_client_loop(&mut stream, &session).await {
            Ok(()) => info!("websocket closed"),
            Err(e) => warn!(error = %e, "client loop exited with error"),
        }

        // Removing the player releases the world's handle; ours goes next, closing the queue.
        session.leave().await;
        drop(sink);
        finish_writer(writer).await;
        info!("client disconnected");
    }
    .instrument(span)
    .await
}

async fn bootstrap_session(
    player_id: String,
    sink: Arc<dyn ClientSink>,
    state: &AppState,
) -> Result<Session, NetError> {
    // Welcome is queued before the player exists in the world, so no world update can beat it.
    let welcome = ServerMessage::Welcome(WelcomeDto {
        player_id: player_id.clone(),
    });
    send_message(sink.as_ref(), &welcome)?;

    let session = Session::join(
        player_id,
        sink,
        state.world.clone(),
        state.broadcaster.clone(),
        state.tuning,
    )
    .await?;
    Ok(session)
}

fn send_message(sink: &dyn ClientSink, msg: &ServerMessage) -> Result<usize, NetError> {
    let txt = serde_json::to_string(msg)?;
    let bytes = txt.len();
    sink.send_text(Utf8Bytes::from(txt))?;
    Ok(bytes)
}

// Lets queued frames drain, but cuts off a peer that stopped reading.
async fn finish_writer(mut writer: JoinHandle<()>) {
    if tokio::time::timeout(WRITER_DRAIN_TIMEOUT, &mut writer)
        .await
        .is_err()
    {
        writer.abort();
        debug!("outbound writer aborted after drain timeout");
    }
}

/// Reads client frames and applies each decoded command until the client goes away.
///
/// Returns `Ok` on a clean close and `Err` on a transport error or an undecodable envelope;
/// either way the session is over.
pub async fn run_client_loop<S>(stream: &mut S, session: &Session) -> Result<(), NetError>
where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    while let Some(incoming) = stream.next().await {
        let envelope = match incoming? {
            Message::Text(text) => ClientEnvelope::parse(text.as_str())?,
            Message::Binary(bytes) => ClientEnvelope::parse(&bytes)?,
            Message::Ping(_) | Message::Pong(_) => continue,
            Message::Close(_) => return Ok(()),
        };

        let command = envelope.into_command();
        let outcome = session.apply(command).await;
        debug!(?outcome, "command handled");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tuning::Tuning;
    use crate::domain::{SharedWorld, World};
    use crate::interface_adapters::net::SnapshotBroadcaster;
    use crate::use_cases::Command;
    use crate::use_cases::test_support::{ClosedSink, CountingBroadcaster, RecordingSink};
    use futures::stream;

    async fn session_at(x: f64, y: f64) -> (Session, SharedWorld, Arc<CountingBroadcaster>) {
        let world = World::default().into_shared();
        let broadcaster = CountingBroadcaster::new();
        let session = Session::join(
            player_id(),
            RecordingSink::shared(),
            world.clone(),
            broadcaster.clone(),
            Tuning::default(),
        )
        .await
        .expect("join should succeed");
        session.apply(Command::Move { x, y }).await;
        (session, world, broadcaster)
    }

    fn text(s: &str) -> Result<Message, axum::Error> {
        Ok(Message::Text(s.into()))
    }

    #[tokio::test]
    async fn when_client_sends_commands_then_each_is_applied_until_close() {
        let (session, world, broadcaster) = session_at(100.0, 100.0).await;
        let mut frames = stream::iter(vec![
            text(r#"{"type":"move","data":{"x":200,"y":250}}"#),
            Ok(Message::Ping(Vec::<u8>::new().into())),
            text(r#"{"type":"shoot","data":{"angle":0}}"#),
            Ok(Message::Close(None)),
            text(r#"{"type":"move","data":{"x":300,"y":300}}"#),
        ]);

        let result = run_client_loop(&mut frames, &session).await;

        assert!(result.is_ok());
        let guard = world.read().await;
        let player = &guard.players[session.player_id()];
        assert_eq!((player.x, player.y), (200.0, 250.0));
        assert_eq!(guard.projectiles.len(), 1);
        // join + setup move + move + shoot
        assert_eq!(broadcaster.calls(), 4);
    }

    #[tokio::test]
    async fn when_envelope_is_malformed_then_loop_ends_with_decode_error() {
        let (session, world, _broadcaster) = session_at(100.0, 100.0).await;
        let mut frames = stream::iter(vec![
            text("{not json"),
            text(r#"{"type":"move","data":{"x":300,"y":300}}"#),
        ]);

        let result = run_client_loop(&mut frames, &session).await;

        assert!(matches!(result, Err(NetError::Decode(_))));
        let guard = world.read().await;
        let player = &guard.players[session.player_id()];
        assert_eq!((player.x, player.y), (100.0, 100.0));
    }

    #[tokio::test]
    async fn when_transport_fails_then_loop_ends_with_ws_error() {
        let (session, _world, _broadcaster) = session_at(100.0, 100.0).await;
        let mut frames = stream::iter(vec![Err(axum::Error::new(std::io::Error::other(
            "connection reset",
        )))]);

        let result = run_client_loop(&mut frames, &session).await;

        assert!(matches!(result, Err(NetError::Ws(_))));
    }

    #[tokio::test]
    async fn when_binary_frame_carries_json_then_it_is_treated_like_text() {
        let (session, world, _broadcaster) = session_at(100.0, 100.0).await;
        let payload = br#"{"type":"move","data":{"x":150,"y":160}}"#.to_vec();
        let mut frames = stream::iter(vec![Ok(Message::Binary(payload.into()))]);

        let result = run_client_loop(&mut frames, &session).await;

        assert!(result.is_ok());
        let guard = world.read().await;
        let player = &guard.players[session.player_id()];
        assert_eq!((player.x, player.y), (150.0, 160.0));
    }

    #[tokio::test]
    async fn when_unknown_or_partial_commands_arrive_then_loop_keeps_running() {
        let (session, world, broadcaster) = session_at(100.0, 100.0).await;
        let mut frames = stream::iter(vec![
            text(r#"{"type":"emote","data":{"id":1}}"#),
            text(r#"{"type":"move","data":{"x":"left","y":400}}"#),
        ]);

        let result = run_client_loop(&mut frames, &session).await;

        assert!(result.is_ok());
        let guard = world.read().await;
        let player = &guard.players[session.player_id()];
        // x defaulted to zero and was rejected; y applied.
        assert_eq!((player.x, player.y), (100.0, 400.0));
        assert_eq!(broadcaster.calls(), 3);
    }

    #[tokio::test]
    async fn when_session_bootstraps_then_welcome_is_queued_before_any_world_update() {
        let world = World::default().into_shared();
        let state = AppState {
            world: world.clone(),
            broadcaster: Arc::new(SnapshotBroadcaster::new(world.clone())),
            tuning: Tuning::default(),
            outbound_capacity: 8,
        };
        let sink = RecordingSink::new();

        let session = bootstrap_session("player_w".to_string(), sink.clone(), &state)
            .await
            .expect("bootstrap should succeed");

        let sent = sink.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], r#"{"type":"welcome","data":{"playerId":"player_w"}}"#);
        assert!(sent[1].starts_with(r#"{"type":"gameState""#));
        assert!(world.read().await.players.contains_key(session.player_id()));
    }

    #[tokio::test]
    async fn when_welcome_cannot_be_queued_then_no_player_is_spawned() {
        let world = World::default().into_shared();
        let state = AppState {
            world: world.clone(),
            broadcaster: CountingBroadcaster::new(),
            tuning: Tuning::default(),
            outbound_capacity: 8,
        };

        let result = bootstrap_session("player_x".to_string(), Arc::new(ClosedSink), &state).await;

        assert!(matches!(result, Err(NetError::Sink(SinkError::Closed))));
        assert!(world.read().await.players.is_empty());
    }
}
