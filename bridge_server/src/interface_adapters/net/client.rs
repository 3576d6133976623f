use crate::interface_adapters::protocol::{ClientIntent, ClientMessage, ServerMessage};
use crate::interface_adapters::state::{AppState, SessionSettings};
use crate::interface_adapters::utils::rng::rand_id;
use crate::use_cases::{ClientCommand, GameEvent, GameHandle, SnapshotThrottle};

use axum::{
    Error,
    extract::{
        State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code},
    },
    response::IntoResponse,
};
use futures::SinkExt;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{Instrument, Span, debug, info, info_span, warn};

#[derive(Debug)]
enum NetError {
    // Categorizes connection lifecycle failures so callers can decide policy.
    #[allow(dead_code)]
    Ws(axum::Error),
    #[allow(dead_code)]
    Serialization(serde_json::Error),
    InputClosed,
    SnapshotDropped,
}

impl From<axum::Error> for NetError {
    fn from(e: axum::Error) -> Self {
        NetError::Ws(e)
    }
}

enum LoopControl {
    Continue,
    Disconnect,
}

const LOG_THROTTLE: Duration = Duration::from_secs(2);
const MAX_INVALID_JSON: u32 = 10;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let game = state.game.clone();
    let settings = state.session.clone();
    ws.on_upgrade(move |socket| {
        // Separate connection id for correlating logs before/after a client_id exists.
        let conn_id = rand_id();
        let span = info_span!("conn", conn_id, client_id = tracing::field::Empty);
        handle_socket(socket, game, settings).instrument(span)
    })
}

async fn handle_socket(mut socket: WebSocket, game: GameHandle, settings: SessionSettings) {
    let mut ctx = match bootstrap_connection(&mut socket, &game, &settings).await {
        Ok(ctx) => ctx,
        Err(e) => {
            warn!(error = ?e, "failed to bootstrap connection");
            let _ = send_close_with_reason(&mut socket, close_code::ERROR, "world unavailable")
                .await;
            return;
        }
    };

    Span::current().record("client_id", ctx.client_id);
    info!(client_id = ctx.client_id, "client connected");

    // Main Client Loop
    if let Err(e) = run_client_loop(&mut socket, &mut ctx).await {
        warn!(error = ?e, "client loop exited with error");
    }
}

async fn send_message(socket: &mut WebSocket, msg: &ServerMessage) -> Result<usize, NetError> {
    let txt = serde_json::to_string(msg).map_err(NetError::Serialization)?;
    let bytes = txt.len();
    socket
        .send(Message::Text(txt.into()))
        .await
        .map_err(NetError::Ws)?;
    Ok(bytes)
}

async fn send_close_with_reason(
    socket: &mut WebSocket,
    code: u16,
    reason: &'static str,
) -> Result<(), NetError> {
    socket
        .send(Message::Close(Some(CloseFrame {
            code,
            reason: reason.into(),
        })))
        .await
        .map_err(NetError::Ws)?;
    socket.close().await.map_err(NetError::Ws)
}

struct ConnCtx {
    pub client_id: u64,
    pub input_tx: mpsc::Sender<GameEvent>,
    pub throttle: SnapshotThrottle,
    // Pull period for snapshots from the world actor.
    pub snapshot_tick: Interval,

    pub msgs_in: u64,
    pub msgs_out: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub snapshots_skipped: u64,

    pub invalid_json: u32,

    pub last_input_full_log: Instant,
    pub last_invalid_input_log: Instant,

    pub close_frame: Option<CloseFrame>,
}

async fn bootstrap_connection(
    socket: &mut WebSocket,
    game: &GameHandle,
    settings: &SessionSettings,
) -> Result<ConnCtx, NetError> {
    let client_id = rand_id();

    // Tell the world first so the very first snapshot request already has a context.
    game.input_tx
        .send(GameEvent::Connect { client_id })
        .await
        .map_err(|_| NetError::InputClosed)?;

    // Send Identity Packet
    let identity_msg = ServerMessage::Identity {
        client_id: client_id.to_string(),
    };
    let bytes_out = match send_message(socket, &identity_msg).await {
        Ok(bytes) => bytes as u64,
        Err(err) => {
            // Compensate the Connect so the world does not keep a ghost client.
            let _ = game.input_tx.send(GameEvent::Disconnect { client_id }).await;
            return Err(err);
        }
    };

    let mut snapshot_tick = tokio::time::interval(settings.snapshot_interval);
    snapshot_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let now = Instant::now() - LOG_THROTTLE;
    Ok(ConnCtx {
        client_id,
        input_tx: game.input_tx.clone(),
        throttle: SnapshotThrottle::new(settings.max_in_flight),
        snapshot_tick,

        msgs_in: 0,
        msgs_out: 1,
        bytes_in: 0,
        bytes_out,
        snapshots_skipped: 0,

        invalid_json: 0,

        last_input_full_log: now,
        last_invalid_input_log: now,

        close_frame: None,
    })
}

fn should_log(last: &mut Instant) -> bool {
    if last.elapsed() >= LOG_THROTTLE {
        *last = Instant::now();
        true
    } else {
        false
    }
}

async fn run_client_loop(socket: &mut WebSocket, ctx: &mut ConnCtx) -> Result<(), NetError> {
    let client_id = ctx.client_id;

    // Split borrows so `tokio::select!` can hold them concurrently.
    let ConnCtx {
        input_tx,
        throttle,
        snapshot_tick,
        msgs_in,
        msgs_out,
        bytes_in,
        bytes_out,
        snapshots_skipped,
        invalid_json,
        last_input_full_log,
        last_invalid_input_log,
        close_frame,
        ..
    } = ctx;

    let mut fatal: Option<NetError> = None;

    loop {
        // disconnect becomes true on error
        let disconnect: bool = tokio::select! {
            // Incoming Message from Client
            incoming = socket.recv() => {
                match handle_incoming_ws(
                    incoming,
                    client_id,
                    input_tx,
                    throttle,
                    msgs_in,
                    bytes_in,
                    invalid_json,
                    last_invalid_input_log,
                    close_frame,
                ).await {
                    Ok(LoopControl::Continue) => false,
                    Ok(LoopControl::Disconnect) => true,
                    Err(e) => {
                        fatal = Some(e);
                        true
                    }
                }
            }

            // Outgoing Snapshot
            _ = snapshot_tick.tick() => {
                match push_snapshot(
                    socket,
                    client_id,
                    input_tx,
                    throttle,
                    msgs_out,
                    bytes_out,
                    snapshots_skipped,
                    last_input_full_log,
                ).await {
                    Ok(LoopControl::Continue) => false,
                    Ok(LoopControl::Disconnect) => true,
                    Err(e) => {
                        fatal = Some(e);
                        true
                    }
                }
            }
        };

        if disconnect {
            if let Some(frame) = close_frame.take() {
                let _ = socket.send(Message::Close(Some(frame))).await;
            }
            if let Err(err) = socket.close().await.map_err(NetError::Ws) {
                debug!(error = ?err, "socket close error");
            }
            break;
        }
    }

    if let Err(e) = disconnect_cleanup(
        client_id,
        input_tx,
        *msgs_in,
        *msgs_out,
        *bytes_in,
        *bytes_out,
        *snapshots_skipped,
        *invalid_json,
    )
    .await
    {
        warn!(error = ?e, "error during disconnect cleanup");
        if fatal.is_none() {
            fatal = Some(e);
        }
    }

    if let Some(err) = fatal {
        Err(err)
    } else {
        Ok(())
    }
}

#[allow(clippy::too_many_arguments)]
async fn handle_incoming_ws(
    incoming: Option<Result<Message, Error>>,
    client_id: u64,
    input_tx: &mpsc::Sender<GameEvent>,
    throttle: &mut SnapshotThrottle,
    msgs_in: &mut u64,
    bytes_in: &mut u64,
    invalid_json: &mut u32,
    last_invalid_input_log: &mut Instant,
    close_frame: &mut Option<CloseFrame>,
) -> Result<LoopControl, NetError> {
    match incoming {
        Some(Ok(msg)) => match msg {
            Message::Text(text) => {
                *msgs_in += 1;
                *bytes_in += text.len() as u64;

                match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(message) => match ClientIntent::from(message) {
                        ClientIntent::Ack(counter) => {
                            throttle.acknowledge(counter);
                            Ok(LoopControl::Continue)
                        }
                        ClientIntent::Command(command) => {
                            forward_command(client_id, input_tx, command).await
                        }
                    },
                    Err(parse_err) => {
                        *invalid_json += 1;
                        if should_log(last_invalid_input_log) {
                            warn!(
                                client_id,
                                bytes = text.len(),
                                error = %parse_err,
                                "failed to parse client message"
                            );
                        }

                        if *invalid_json > MAX_INVALID_JSON {
                            *close_frame = Some(CloseFrame {
                                code: close_code::POLICY,
                                reason: "too many invalid messages".into(),
                            });
                            return Ok(LoopControl::Disconnect);
                        }

                        Ok(LoopControl::Continue)
                    }
                }
            }
            Message::Binary(_) => {
                *close_frame = Some(CloseFrame {
                    code: close_code::UNSUPPORTED,
                    reason: "binary messages not supported".into(),
                });
                Ok(LoopControl::Disconnect)
            }
            Message::Ping(_) | Message::Pong(_) => Ok(LoopControl::Continue),
            Message::Close(_) => Ok(LoopControl::Disconnect),
        },
        Some(Err(e)) => {
            warn!(client_id, error = %e, "websocket recv error");
            Ok(LoopControl::Disconnect)
        }
        None => {
            info!(client_id, "websocket closed");
            Ok(LoopControl::Disconnect)
        }
    }
}

// Commands are discrete actions, so they wait for mailbox space instead of being dropped.
async fn forward_command(
    client_id: u64,
    input_tx: &mpsc::Sender<GameEvent>,
    command: ClientCommand,
) -> Result<LoopControl, NetError> {
    input_tx
        .send(GameEvent::Command { client_id, command })
        .await
        .map_err(|_| NetError::InputClosed)?;
    Ok(LoopControl::Continue)
}

#[allow(clippy::too_many_arguments)]
async fn push_snapshot(
    socket: &mut WebSocket,
    client_id: u64,
    input_tx: &mpsc::Sender<GameEvent>,
    throttle: &mut SnapshotThrottle,
    msgs_out: &mut u64,
    bytes_out: &mut u64,
    snapshots_skipped: &mut u64,
    last_input_full_log: &mut Instant,
) -> Result<LoopControl, NetError> {
    let (reply_tx, reply_rx) = oneshot::channel();
    match input_tx.try_send(GameEvent::Snapshot {
        client_id,
        reply: reply_tx,
    }) {
        Ok(()) => {}
        Err(mpsc::error::TrySendError::Full(_evt)) => {
            if should_log(last_input_full_log) {
                warn!(client_id, "input channel full; skipping snapshot");
            }
            return Ok(LoopControl::Continue);
        }
        Err(mpsc::error::TrySendError::Closed(_evt)) => return Err(NetError::InputClosed),
    }

    let frame = reply_rx.await.map_err(|_| NetError::SnapshotDropped)?;
    let Some(counter) = throttle.offer(&frame) else {
        *snapshots_skipped += 1;
        return Ok(LoopControl::Continue);
    };

    let msg = ServerMessage::Snapshot {
        counter,
        paused: frame.paused,
        view: frame.view,
    };
    match send_message(socket, &msg).await {
        Ok(bytes) => {
            *msgs_out += 1;
            *bytes_out += bytes as u64;
            Ok(LoopControl::Continue)
        }
        Err(err) => {
            // Log unexpected send failures; disconnect will follow immediately.
            warn!(error = ?err, "failed to send snapshot");
            Ok(LoopControl::Disconnect)
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn disconnect_cleanup(
    client_id: u64,
    input_tx: &mpsc::Sender<GameEvent>,
    msgs_in: u64,
    msgs_out: u64,
    bytes_in: u64,
    bytes_out: u64,
    snapshots_skipped: u64,
    invalid_json: u32,
) -> Result<(), NetError> {
    // Release the station; the ship itself stays in the world.
    input_tx
        .send(GameEvent::Disconnect { client_id })
        .await
        .map_err(|_| NetError::InputClosed)?;

    debug!(
        client_id,
        msgs_in,
        msgs_out,
        bytes_in,
        bytes_out,
        snapshots_skipped,
        invalid_json,
        "connection stats"
    );
    info!(client_id, "client disconnected");
    Ok(())
}
