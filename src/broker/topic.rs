//! Topic management
//!
//! A `Topic` is the forward half of the registry: the endpoints currently
//! subscribed to one topic name, each with its subscription mode.
//! Re-subscribing an endpoint overwrites its mode.
//!
//! Concurrency note: only the command actor touches topics.

use std::collections::HashMap;

use crate::broker::subscription::{EndpointId, SubscriptionMode};

#[derive(Debug)]
pub struct Topic {
    pub name: String,
    pub subscribers: HashMap<EndpointId, SubscriptionMode>,
}

impl Topic {
    /// Create a new topic with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            subscribers: HashMap::new(),
        }
    }

    /// Add or update a subscriber. The latest mode wins.
    pub fn subscribe(&mut self, id: EndpointId, mode: SubscriptionMode) {
        self.subscribers.insert(id, mode);
    }

    /// Remove a subscriber. Returns whether it was subscribed.
    pub fn unsubscribe(&mut self, id: &EndpointId) -> bool {
        self.subscribers.remove(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }
}
