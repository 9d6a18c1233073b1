//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Realtime fan-out gateway. One broker subscription feeds a broadcast
// channel; every connected WebSocket client gets each event payload verbatim.
// Clients are read-only observers: nothing they send changes any state, and
// the broker delivery is acknowledged whether or not anyone is listening.
//
// | Component     | Description                                         |
// |---------------|-----------------------------------------------------|
// | Relay         | Broadcast hub between the broker loop and clients   |
// | router        | /health plus the /ws upgrade endpoint               |
// | run_relay     | Broker-side loop: forward, then ack unconditionally |
//--------------------------------------------------------------------------------------------------

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Extension, WebSocketUpgrade,
    },
    response::Response,
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::api;

/// Frames buffered per client before a slow one starts losing them.
pub const DEFAULT_RELAY_CAPACITY: usize = 256;

/// Broadcast hub between the broker loop and the WebSocket sessions.
///
/// Cloning is cheap; every clone feeds the same set of subscribers.
#[derive(Clone)]
pub struct Relay {
    frames: broadcast::Sender<String>,
    connections: Arc<AtomicUsize>,
}

impl Relay {
    pub fn new(capacity: usize) -> Self {
        let (frames, _) = broadcast::channel(capacity);
        Self {
            frames,
            connections: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Fans one broker payload out to every live client and returns how many
    /// were queued. Never fails: zero clients is a normal state, and a slow
    /// client's loss surfaces on its own session, not here.
    pub fn forward(&self, payload: &[u8]) -> usize {
        let frame = String::from_utf8_lossy(payload).into_owned();
        self.frames.send(frame).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.frames.subscribe()
    }

    /// Number of live client sessions.
    pub fn client_count(&self) -> usize {
        self.connections.load(Ordering::Relaxed)
    }
}

/// Creates the gateway routes
pub fn router(relay: Relay) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/ws", get(ws_handler))
        .layer(Extension(relay))
}

async fn ws_handler(ws: WebSocketUpgrade, Extension(relay): Extension<Relay>) -> Response {
    ws.on_upgrade(move |socket| client_session(socket, relay))
}

/// One client's session: pump broadcast frames out until the client goes
/// away. Inbound frames are drained and discarded, clients only listen.
async fn client_session(socket: WebSocket, relay: Relay) {
    let mut frames = relay.subscribe();
    let total = relay.connections.fetch_add(1, Ordering::Relaxed) + 1;
    info!(total_connections = total, "Client connected");

    let (mut sender, mut receiver) = socket.split();
    loop {
        tokio::select! {
            frame = frames.recv() => match frame {
                Ok(text) => {
                    if sender.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Slow client skipped frames");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    let total = relay.connections.fetch_sub(1, Ordering::Relaxed) - 1;
    info!(total_connections = total, "Client disconnected");
}

/// Broker-side loop: forward every payload verbatim, then acknowledge
/// unconditionally. A slow or absent client must never hold the ack hostage.
pub async fn run_relay(relay: Relay, mut subscription: broker::Subscription) {
    info!("Gateway relay started");
    while let Some(delivery) = subscription.receive().await {
        let recipients = relay.forward(delivery.body());
        debug!(recipients, "Event fanned out");
        if let Err(err) = subscription.ack(&delivery).await {
            error!(error = %err, "Failed to acknowledge fanned-out delivery");
        }
    }
    warn!("Gateway subscription closed, relay stopping");
}

//--------------------------------------------------------------------------------------------------
//  TESTS
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_with_no_clients_is_fine() {
        let relay = Relay::new(8);
        assert_eq!(relay.forward(b"{\"type\":\"book\"}"), 0);
    }

    #[test]
    fn test_forward_reaches_every_subscriber() {
        let relay = Relay::new(8);
        let mut first = relay.subscribe();
        let mut second = relay.subscribe();
        let mut third = relay.subscribe();

        let payload = br#"{"type":"payment","transactionId":"t-1"}"#;
        assert_eq!(relay.forward(payload), 3);

        let expected = String::from_utf8_lossy(payload).into_owned();
        assert_eq!(first.try_recv().unwrap(), expected);
        assert_eq!(second.try_recv().unwrap(), expected);
        assert_eq!(third.try_recv().unwrap(), expected);
    }

    #[test]
    fn test_dropped_subscriber_leaves_the_rest() {
        let relay = Relay::new(8);
        let mut first = relay.subscribe();
        let mut second = relay.subscribe();
        let dropped = relay.subscribe();
        drop(dropped);

        assert_eq!(relay.forward(b"frame"), 2);
        assert_eq!(first.try_recv().unwrap(), "frame");
        assert_eq!(second.try_recv().unwrap(), "frame");
    }

    #[test]
    fn test_payload_is_forwarded_verbatim() {
        let relay = Relay::new(8);
        let mut client = relay.subscribe();

        // Payloads are relayed as-is, undecoded; even junk goes through.
        relay.forward(b"not json");
        assert_eq!(client.try_recv().unwrap(), "not json");
    }
}
