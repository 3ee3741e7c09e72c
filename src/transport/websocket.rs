//! WebSocket gateway
//!
//! Bridges one upgraded connection to the broker. Each connection has a
//! reader half, which publishes every text or binary frame to the
//! connection's topic, and in publish-and-subscribe mode a writer half,
//! which drains the connection's subscription back out as frames.
//!
//! There is no cancellation signal between the halves: whichever finishes
//! first (read error, client close, write error, retired subscription)
//! ends the connection, the other half is dropped, and the endpoint is
//! unsubscribed from everything.

use std::fmt::Display;

use axum::extract::ws::{Message as WsMessage, WebSocket};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::broker::{Broker, Payload, Subscription};

/// Relay inbound frames to `topic`. Never writes anything back.
pub async fn publish_only(socket: WebSocket, broker: Broker, topic: String) {
    let conn = connection_id();
    info!(%conn, %topic, "publisher connected");

    let (mut ws_sender, mut ws_receiver) = socket.split();
    read_half(&mut ws_receiver, &broker, &topic, &conn).await;
    let _ = ws_sender.close().await;

    info!(%conn, %topic, "publisher disconnected");
}

/// Relay inbound frames to `topic` and everything published on `topic`
/// (including this connection's own frames) back out.
pub async fn publish_subscribe(mut socket: WebSocket, broker: Broker, topic: String) {
    let conn = connection_id();

    let subscription = match broker.subscribe([topic.as_str()]) {
        Ok(subscription) => subscription,
        Err(e) => {
            warn!(%conn, %topic, error = %e, "cannot subscribe, closing connection");
            let _ = SinkExt::close(&mut socket).await;
            return;
        }
    };
    let endpoint = subscription.id();
    info!(%conn, %topic, %endpoint, "subscriber connected");

    let (mut ws_sender, mut ws_receiver) = socket.split();

    tokio::select! {
        _ = read_half(&mut ws_receiver, &broker, &topic, &conn) => {
            debug!(%conn, "reader finished first");
        }
        _ = write_half(&mut ws_sender, subscription, &conn) => {
            debug!(%conn, "writer finished first");
        }
    }

    // Already retired endpoints make this a no-op; a stopped broker is fine too.
    let _ = broker.unsubscribe_all(endpoint);
    let _ = ws_sender.close().await;

    info!(%conn, %topic, %endpoint, "subscriber disconnected");
}

/// Publish every data frame from `ws_receiver` to `topic` until the stream
/// ends, errors, or the client sends a close frame.
pub async fn read_half<S, E>(ws_receiver: &mut S, broker: &Broker, topic: &str, conn: &str)
where
    S: Stream<Item = Result<WsMessage, E>> + Unpin,
    E: Display,
{
    while let Some(frame) = ws_receiver.next().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                warn!(%conn, error = %e, "read failed");
                break;
            }
        };

        let payload = match frame {
            WsMessage::Close(_) => break,
            other => match frame_to_payload(other) {
                Some(payload) => payload,
                None => continue,
            },
        };

        if broker.publish(payload, [topic]).is_err() {
            warn!(%conn, "broker is shut down, dropping connection");
            break;
        }
    }
}

/// Write every message of `subscription` to `ws_sender` until the
/// subscription is retired or a write fails.
pub async fn write_half<K>(ws_sender: &mut K, mut subscription: Subscription, conn: &str)
where
    K: Sink<WsMessage> + Unpin,
    K::Error: Display,
{
    while let Some(message) = subscription.recv().await {
        if let Err(e) = ws_sender.send(payload_to_frame(&message.payload)).await {
            warn!(%conn, error = %e, "failed to send message");
            return;
        }
    }
    debug!(%conn, endpoint = %subscription.id(), "subscription retired");
}

/// Data frames become payloads; control frames carry nothing to publish.
pub fn frame_to_payload(frame: WsMessage) -> Option<Payload> {
    match frame {
        WsMessage::Text(text) => Some(Payload::from(text.as_str())),
        WsMessage::Binary(bytes) => Some(Payload::from(&bytes[..])),
        WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Close(_) => None,
    }
}

pub fn payload_to_frame(payload: &Payload) -> WsMessage {
    match payload {
        Payload::Text(text) => WsMessage::Text(text.to_string().into()),
        Payload::Binary(bytes) => WsMessage::Binary(bytes.to_vec().into()),
    }
}

fn connection_id() -> String {
    format!("conn-{}", Uuid::new_v4())
}
