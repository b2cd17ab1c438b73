//! Server-Sent Events transport.
//!
//! Each `GET /events` request becomes an [`SseConnection`]: a stream of SSE frames that lives as long as the HTTP
//! response. Opening the connection registers a subscriber with the hub; dropping it (which actix does once the client
//! goes away and a write fails) unregisters it again.
//!
//! Frames on the wire:
//!
//! ```text
//!    event: connected
//!    data: {"id":"Xk2f9QpL0aZ3mB7cD1eR"}
//!
//!    event: donation
//!    data: {"amount":25.99,"currency":"USD","donorName":"Jane","message":"","timestamp":"2024-05-01T12:00:00.123Z"}
//!
//!    : keepalive
//! ```
use std::{
    convert::Infallible,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use actix_web::web::Bytes;
use donation_engine::{
    events::{CONNECTED_EVENT, DONATION_EVENT},
    BroadcastHub,
    ChannelSubscriber,
    HubMessage,
    SessionId,
};
use futures::Stream;
use log::*;
use serde_json::json;
use tokio::sync::mpsc::UnboundedReceiver;

const KEEPALIVE_FRAME: &[u8] = b": keepalive\n\n";

pub struct SseConnection {
    session_id: SessionId,
    hub: BroadcastHub,
    receiver: UnboundedReceiver<HubMessage>,
    greeting: Option<Bytes>,
}

impl SseConnection {
    /// Registers a new viewer with the hub. The viewer stays registered until this value is dropped.
    pub fn open(hub: BroadcastHub) -> Self {
        let session_id = SessionId::random();
        let (subscriber, receiver) = ChannelSubscriber::new(session_id.clone());
        hub.register(Arc::new(subscriber));
        info!("📺️ Client connected: {session_id}");
        let greeting = Some(event_frame(CONNECTED_EVENT, &json!({ "id": session_id }).to_string()));
        Self { session_id, hub, receiver, greeting }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }
}

impl Stream for SseConnection {
    type Item = Result<Bytes, Infallible>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if let Some(greeting) = self.greeting.take() {
            return Poll::Ready(Some(Ok(greeting)));
        }
        self.receiver.poll_recv(cx).map(|msg| msg.map(|m| Ok(encode_message(&m))))
    }
}

impl Drop for SseConnection {
    fn drop(&mut self) {
        self.hub.unregister(&self.session_id);
        info!("📺️ Client disconnected: {}", self.session_id);
    }
}

pub fn encode_message(message: &HubMessage) -> Bytes {
    match message {
        HubMessage::Donation(donation) => match serde_json::to_string(donation) {
            Ok(data) => event_frame(DONATION_EVENT, &data),
            Err(e) => {
                error!("📺️ Could not serialize donation {donation}. {e}");
                Bytes::from_static(KEEPALIVE_FRAME)
            },
        },
        HubMessage::KeepAlive => Bytes::from_static(KEEPALIVE_FRAME),
    }
}

/// `data` must be a single line. Serialized JSON always is, since newlines inside strings are escaped.
fn event_frame(event: &str, data: &str) -> Bytes {
    Bytes::from(format!("event: {event}\ndata: {data}\n\n"))
}
