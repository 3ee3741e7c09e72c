//! Command actor
//!
//! The single task that owns the `Registry`. Every subscribe, publish,
//! unsubscribe and shutdown request arrives here as a `Command` on an
//! unbounded queue and is applied to completion before the next one is
//! read, so registry state needs no locks.
//!
//! Delivery is synchronous inside the loop: if a subscriber's queue is full
//! the actor waits for room, and every other command waits with it. A slow
//! subscriber therefore throttles all publishers on all topics.

use std::ops::ControlFlow;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::broker::command::Command;
use crate::broker::message::Message;
use crate::broker::registry::Registry;
use crate::broker::subscription::SubscriptionMode;

pub struct Actor {
    commands: mpsc::UnboundedReceiver<Command>,
    registry: Registry,
}

impl Actor {
    pub fn new(commands: mpsc::UnboundedReceiver<Command>) -> Self {
        Self {
            commands,
            registry: Registry::new(),
        }
    }

    /// Apply commands until `Shutdown` arrives or every handle is dropped,
    /// then retire all remaining endpoints.
    ///
    /// Commands still queued behind the shutdown are dropped together with
    /// the queue; handles observe the closed queue as `BrokerError::Closed`.
    pub async fn run(mut self) {
        debug!("command actor started");

        while let Some(command) = self.commands.recv().await {
            if self.apply(command).await.is_break() {
                break;
            }
        }

        let retired = self.registry.retire_all();
        info!(retired, "broker shut down");
    }

    async fn apply(&mut self, command: Command) -> ControlFlow<()> {
        match command {
            Command::Subscribe {
                id,
                sender,
                topics,
                mode,
            } => {
                for topic in &topics {
                    self.registry.add(topic, id, &sender, mode);
                }
                debug!(endpoint = %id, ?topics, ?mode, "subscribed");
            }
            Command::AddSubscription { id, topics } => match self.registry.sender(id) {
                Some(sender) => {
                    for topic in &topics {
                        self.registry
                            .add(topic, id, &sender, SubscriptionMode::Persistent);
                    }
                    debug!(endpoint = %id, ?topics, "subscription extended");
                }
                None => debug!(endpoint = %id, "add-subscription for retired endpoint ignored"),
            },
            Command::Publish {
                topics,
                payload,
                timestamp,
            } => {
                for topic in topics {
                    let message = Message {
                        topic,
                        payload: payload.clone(),
                        timestamp,
                    };
                    self.registry.send(message).await;
                }
            }
            Command::Unsubscribe { id, topics } => {
                for topic in &topics {
                    self.registry.remove(topic, id);
                }
            }
            Command::UnsubscribeAll { id } => self.registry.remove_endpoint(id),
            Command::CloseTopic { topics } => {
                for topic in &topics {
                    self.registry.remove_topic(topic);
                    debug!(topic = %topic, "topic closed");
                }
            }
            Command::ListTopics { reply } => {
                let _ = reply.send(self.registry.topic_infos());
            }
            Command::Shutdown => return ControlFlow::Break(()),
        }

        ControlFlow::Continue(())
    }
}
