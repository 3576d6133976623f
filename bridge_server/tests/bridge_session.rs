mod support;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

const WAIT: Duration = Duration::from_secs(5);

async fn connect() -> Socket {
    let base_url = support::ensure_server();
    let url = format!("{}/ws", base_url.replacen("http://", "ws://", 1));
    let (socket, _) = connect_async(url).await.expect("websocket connect");
    socket
}

async fn next_message(socket: &mut Socket) -> Message {
    timeout(WAIT, socket.next())
        .await
        .expect("message before timeout")
        .expect("stream still open")
        .expect("valid websocket message")
}

async fn next_json(socket: &mut Socket) -> Value {
    loop {
        if let Message::Text(text) = next_message(socket).await {
            return serde_json::from_str(text.as_str()).expect("server sends json");
        }
    }
}

async fn send_json(socket: &mut Socket, value: Value) {
    socket
        .send(Message::text(value.to_string()))
        .await
        .expect("send client message");
}

// Acknowledges every snapshot on the way so delivery never stalls.
async fn snapshot_matching(socket: &mut Socket, pred: impl Fn(&Value) -> bool) -> Value {
    timeout(WAIT, async {
        loop {
            let msg = next_json(socket).await;
            if msg["type"] != "Snapshot" {
                continue;
            }
            let counter = msg["data"]["counter"].as_u64().expect("counter");
            send_json(socket, json!({"type": "Ack", "data": {"counter": counter}})).await;
            if pred(&msg) {
                return msg;
            }
        }
    })
    .await
    .expect("matching snapshot before timeout")
}

async fn close_code(socket: &mut Socket) -> u16 {
    loop {
        if let Message::Close(frame) = next_message(socket).await {
            return frame.map(|f| u16::from(f.code)).expect("close frame");
        }
    }
}

#[tokio::test]
async fn when_client_connects_then_identity_then_ship_selection_arrive() {
    let mut socket = connect().await;

    let identity = next_json(&mut socket).await;
    assert_eq!(identity["type"], "Identity");
    assert!(identity["data"]["client_id"].is_string());

    let snapshot = next_json(&mut socket).await;
    assert_eq!(snapshot["type"], "Snapshot");
    assert_eq!(snapshot["data"]["counter"], 1);
    assert_eq!(snapshot["data"]["view"]["view"], "ShipSelection");
}

#[tokio::test]
async fn when_ship_is_spawned_then_helm_view_follows_commands() {
    let mut socket = connect().await;
    next_json(&mut socket).await;

    send_json(
        &mut socket,
        json!({"type": "SpawnShip", "data": {"name": "Halcyon"}}),
    )
    .await;
    let helm = snapshot_matching(&mut socket, |m| {
        m["data"]["view"]["view"] == "Helm" && m["data"]["view"]["data"]["ship"]["name"] == "Halcyon"
    })
    .await;
    assert_eq!(helm["data"]["view"]["data"]["throttle"], 0.0);

    send_json(&mut socket, json!({"type": "SetThrottle", "data": {"value": 60.0}})).await;
    snapshot_matching(&mut socket, |m| {
        m["data"]["view"]["data"]["throttle"] == 60.0
    })
    .await;

    send_json(
        &mut socket,
        json!({"type": "ChangeStation", "data": {"station": "Engineering"}}),
    )
    .await;
    let engineering =
        snapshot_matching(&mut socket, |m| m["data"]["view"]["view"] == "Engineering").await;
    assert_eq!(
        engineering["data"]["view"]["data"]["subsystems"]
            .as_array()
            .map(Vec::len),
        Some(4)
    );
}

#[tokio::test]
async fn when_snapshots_go_unacknowledged_then_delivery_pauses_until_ack() {
    let mut socket = connect().await;
    next_json(&mut socket).await;

    // A moving ship changes every tick, so only the in-flight ceiling can hold frames back.
    send_json(&mut socket, json!({"type": "SpawnShip", "data": {"name": "Drift"}})).await;
    send_json(&mut socket, json!({"type": "SetThrottle", "data": {"value": 100.0}})).await;

    let mut counters = Vec::new();
    let window = tokio::time::sleep(Duration::from_millis(1500));
    tokio::pin!(window);
    loop {
        tokio::select! {
            _ = &mut window => break,
            msg = socket.next() => {
                let Some(Ok(Message::Text(text))) = msg else { continue };
                let value: Value = serde_json::from_str(text.as_str()).unwrap();
                if value["type"] == "Snapshot" {
                    counters.push(value["data"]["counter"].as_u64().unwrap());
                }
            }
        }
    }
    assert_eq!(counters, vec![1, 2, 3]);

    send_json(&mut socket, json!({"type": "Ack", "data": {"counter": 3}})).await;
    let resumed = next_json(&mut socket).await;
    assert_eq!(resumed["data"]["counter"], 4);
}

#[tokio::test]
async fn when_client_sends_binary_then_connection_closes_as_unsupported() {
    let mut socket = connect().await;
    next_json(&mut socket).await;

    socket
        .send(Message::binary(vec![1u8, 2, 3]))
        .await
        .expect("send binary");

    assert_eq!(close_code(&mut socket).await, 1003);
}

#[tokio::test]
async fn when_client_keeps_sending_garbage_then_connection_closes_for_policy() {
    let mut socket = connect().await;
    next_json(&mut socket).await;

    for _ in 0..11 {
        socket
            .send(Message::text("{not json"))
            .await
            .expect("send garbage");
    }

    assert_eq!(close_code(&mut socket).await, 1008);
}
