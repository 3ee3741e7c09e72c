//! Broker engine
//!
//! `Broker` is the handle the rest of the system talks to. It is cheap to
//! clone and safe to use from any number of tasks at once: each method only
//! builds a `Command` and pushes it onto the actor's unbounded queue, so no
//! method ever waits on delivery.
//!
//! Ordering: commands sent through one handle from one task are applied in
//! the order they were sent. Commands from different tasks interleave in
//! whatever order they reach the queue.
//!
//! After `shutdown` every method returns `BrokerError::Closed` instead of
//! silently queueing work nobody will ever process. The rejection starts as
//! soon as `shutdown` returns, on every clone of the handle, without waiting
//! for the actor to drain.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{mpsc, oneshot};

use crate::broker::actor::Actor;
use crate::broker::command::Command;
use crate::broker::message::Payload;
use crate::broker::registry::TopicInfo;
use crate::broker::subscription::{EndpointId, Subscription, SubscriptionMode};
use crate::config::DEFAULT_CAPACITY;
use crate::utils::error::BrokerError;

#[derive(Debug, Clone)]
pub struct Broker {
    commands: mpsc::UnboundedSender<Command>,
    capacity: usize,
    stopped: Arc<AtomicBool>,
}

impl Broker {
    /// Spawn the command actor on the current Tokio runtime and return a
    /// handle to it. Each subscription queue holds up to `capacity`
    /// messages (at least one).
    pub fn new(capacity: usize) -> Self {
        let (commands, receiver) = mpsc::unbounded_channel();
        tokio::spawn(Actor::new(receiver).run());

        Self {
            commands,
            capacity: capacity.max(1),
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Subscribe a new endpoint to `topics`. The returned subscription is
    /// usable immediately; messages published before the actor applies the
    /// subscribe are not delivered to it.
    pub fn subscribe<I, T>(&self, topics: I) -> Result<Subscription, BrokerError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.subscribe_with(topics, SubscriptionMode::Persistent)
    }

    /// Like `subscribe`, but the endpoint receives exactly one message and is
    /// then removed from all of its topics.
    pub fn subscribe_once<I, T>(&self, topics: I) -> Result<Subscription, BrokerError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.subscribe_with(topics, SubscriptionMode::OneShot)
    }

    fn subscribe_with<I, T>(
        &self,
        topics: I,
        mode: SubscriptionMode,
    ) -> Result<Subscription, BrokerError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let (sender, receiver) = mpsc::channel(self.capacity);
        let id = EndpointId::new();

        self.send(Command::Subscribe {
            id,
            sender,
            topics: collect(topics),
            mode,
        })?;

        Ok(Subscription::new(id, receiver))
    }

    /// Add persistent subscriptions to an existing endpoint. Has no effect
    /// if the endpoint has already been retired.
    pub fn add_subscription<I, T>(&self, endpoint: EndpointId, topics: I) -> Result<(), BrokerError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.send(Command::AddSubscription {
            id: endpoint,
            topics: collect(topics),
        })
    }

    /// Publish `payload` to every subscriber of each of `topics`.
    pub fn publish<P, I, T>(&self, payload: P, topics: I) -> Result<(), BrokerError>
    where
        P: Into<Payload>,
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.send(Command::Publish {
            topics: collect(topics),
            payload: payload.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        })
    }

    /// Unsubscribe `endpoint` from `topics`, or from everything when no
    /// topic is given.
    pub fn unsubscribe<I, T>(&self, endpoint: EndpointId, topics: I) -> Result<(), BrokerError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let topics = collect(topics);
        if topics.is_empty() {
            return self.unsubscribe_all(endpoint);
        }
        self.send(Command::Unsubscribe {
            id: endpoint,
            topics,
        })
    }

    pub fn unsubscribe_all(&self, endpoint: EndpointId) -> Result<(), BrokerError> {
        self.send(Command::UnsubscribeAll { id: endpoint })
    }

    /// Remove every subscriber from `topics`. Endpoints left without topics
    /// are retired; endpoints still subscribed elsewhere stay open.
    pub fn close_topic<I, T>(&self, topics: I) -> Result<(), BrokerError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.send(Command::CloseTopic {
            topics: collect(topics),
        })
    }

    /// Stop the actor. Every endpoint still registered is retired.
    pub fn shutdown(&self) -> Result<(), BrokerError> {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return Err(BrokerError::Closed);
        }
        self.commands
            .send(Command::Shutdown)
            .map_err(|_| BrokerError::Closed)
    }

    /// Snapshot of live topics, as seen by the actor once every command
    /// this caller sent earlier has been applied.
    pub async fn topics(&self) -> Result<Vec<TopicInfo>, BrokerError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::ListTopics { reply })?;
        response.await.map_err(|_| BrokerError::Closed)
    }

    /// Resolves once the actor has stopped and retired every endpoint.
    pub async fn closed(&self) {
        self.commands.closed().await
    }

    /// True once `shutdown` was called on any clone or the actor is gone.
    pub fn is_closed(&self) -> bool {
        self.stopped.load(Ordering::SeqCst) || self.commands.is_closed()
    }

    fn send(&self, command: Command) -> Result<(), BrokerError> {
        if self.stopped.load(Ordering::SeqCst) {
            return Err(BrokerError::Closed);
        }
        self.commands
            .send(command)
            .map_err(|_| BrokerError::Closed)
    }
}

impl Default for Broker {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

fn collect<I, T>(topics: I) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    topics.into_iter().map(Into::into).collect()
}
