//! WebSocket connection loop.
//!
//! Registers the socket with the [`NotificationHub`] through a
//! [`ChannelSink`], forwards queued events as text frames, and watches the
//! read half only for liveness and close.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};

use super::hub::NotificationHub;
use super::sink::{ChannelSink, Outbound};

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Client frames are ignored apart from close; pings are answered by the
///   transport.
/// - Events queued by the hub are written in order.
/// - The subscriber is removed from the hub when the loop ends, whichever
///   side ended it.
pub async fn run_connection(socket: WebSocket, hub: Arc<NotificationHub>) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (sink, mut outbound) = ChannelSink::channel();
    let subscriber_id = hub.subscribe(Arc::new(sink)).await;

    loop {
        tokio::select! {
            // Incoming frame from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Close(_)) | Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
            // Event queued by the hub
            frame = outbound.recv() => {
                match frame {
                    Some(Outbound::Event(json)) => {
                        if ws_tx.send(Message::text(json)).await.is_err() {
                            break;
                        }
                    }
                    Some(Outbound::Close) | None => break,
                }
            }
        }
    }

    hub.unsubscribe(subscriber_id).await;
    let _ = ws_tx.close().await;
    tracing::debug!(%subscriber_id, "ws connection closed");
}
