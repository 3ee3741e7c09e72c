//! Subscriber endpoints
//!
//! An endpoint is identified by an `EndpointId` and backed by a bounded
//! queue. The broker keeps the only sending half inside its registry; the
//! caller gets the receiving half wrapped in a `Subscription`. Once the
//! registry drops the sender (the endpoint's topic set became empty) the
//! queue is retired: buffered messages can still be drained, after which
//! `recv` returns `None` for good.

use std::fmt;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use uuid::Uuid;

use crate::broker::message::Message;

/// Opaque, comparable handle for one subscriber endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EndpointId(Uuid);

impl EndpointId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Whether a (topic, endpoint) pairing survives its first delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionMode {
    /// Receives every message until unsubscribed.
    Persistent,
    /// Receives exactly one message, then is removed from all its topics.
    OneShot,
}

/// Receive side of a subscriber endpoint.
#[derive(Debug)]
pub struct Subscription {
    id: EndpointId,
    receiver: mpsc::Receiver<Message>,
}

impl Subscription {
    pub(crate) fn new(id: EndpointId, receiver: mpsc::Receiver<Message>) -> Self {
        Self { id, receiver }
    }

    pub fn id(&self) -> EndpointId {
        self.id
    }

    /// Wait for the next message. `None` once the endpoint is retired and
    /// its queue has been drained.
    pub async fn recv(&mut self) -> Option<Message> {
        self.receiver.recv().await
    }

    pub fn try_recv(&mut self) -> Result<Message, TryRecvError> {
        self.receiver.try_recv()
    }

    /// True once the broker has retired this endpoint. Messages delivered
    /// before retirement may still be buffered.
    pub fn is_retired(&self) -> bool {
        self.receiver.is_closed()
    }
}
