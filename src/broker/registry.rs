//! Topic registry
//!
//! Bookkeeping for who listens to what, kept in two maps that must always
//! agree with each other:
//!
//! - forward: topic name → `Topic` (endpoint → subscription mode)
//! - reverse: endpoint → `Endpoint` (its queue sender and topic set)
//!
//! An endpoint is listed under a topic iff that topic is in the endpoint's
//! topic set. Neither map ever holds an empty entry: removing the last
//! endpoint of a topic deletes the topic, and removing the last topic of an
//! endpoint deletes the endpoint, which drops the registry's sender and
//! thereby retires the queue. Dropping happens at most once per endpoint,
//! so retirement is exactly-once without any extra bookkeeping.
//!
//! The registry has no synchronization of its own. It is owned by the
//! command actor and nothing else.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::debug;

use crate::broker::message::Message;
use crate::broker::subscription::{EndpointId, SubscriptionMode};
use crate::broker::topic::Topic;

#[derive(Debug)]
struct Endpoint {
    sender: mpsc::Sender<Message>,
    topics: HashSet<String>,
}

/// Snapshot of one live topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicInfo {
    pub name: String,
    pub subscribers: usize,
}

#[derive(Debug, Default)]
pub struct Registry {
    topics: HashMap<String, Topic>,
    endpoints: HashMap<EndpointId, Endpoint>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `id` to `topic`, upserting the mode.
    ///
    /// `sender` is only stored when the endpoint is not registered yet; an
    /// endpoint keeps the queue it was first registered with.
    pub fn add(
        &mut self,
        topic: &str,
        id: EndpointId,
        sender: &mpsc::Sender<Message>,
        mode: SubscriptionMode,
    ) {
        self.topics
            .entry(topic.to_string())
            .or_insert_with(|| Topic::new(topic))
            .subscribe(id, mode);

        self.endpoints
            .entry(id)
            .or_insert_with(|| Endpoint {
                sender: sender.clone(),
                topics: HashSet::new(),
            })
            .topics
            .insert(topic.to_string());
    }

    /// Deliver `message` to every endpoint subscribed to `message.topic`.
    ///
    /// Waits while a target queue is full. One-shot endpoints are removed
    /// from all of their topics right after their delivery. An endpoint
    /// whose receiver is gone is removed the same way.
    pub async fn send(&mut self, message: Message) {
        let Some(topic) = self.topics.get(&message.topic) else {
            debug!(topic = %message.topic, "publish to topic without subscribers");
            return;
        };

        let targets: Vec<(EndpointId, SubscriptionMode)> = topic
            .subscribers
            .iter()
            .map(|(id, mode)| (*id, *mode))
            .collect();

        for (id, mode) in targets {
            let Some(endpoint) = self.endpoints.get(&id) else {
                continue;
            };

            let delivered = endpoint.sender.send(message.clone()).await;
            match delivered {
                Ok(()) if mode == SubscriptionMode::OneShot => {
                    self.remove_endpoint(id);
                }
                Ok(()) => {}
                Err(_) => {
                    debug!(endpoint = %id, "subscriber dropped its queue, removing");
                    self.remove_endpoint(id);
                }
            }
        }
    }

    /// Remove the (topic, endpoint) pairing. Absent pairings are a no-op.
    /// Returns whether anything was removed.
    pub fn remove(&mut self, topic: &str, id: EndpointId) -> bool {
        let Some(entry) = self.topics.get_mut(topic) else {
            return false;
        };
        if !entry.unsubscribe(&id) {
            return false;
        }
        if entry.is_empty() {
            self.topics.remove(topic);
            debug!(topic = %topic, "topic removed");
        }

        if let Some(endpoint) = self.endpoints.get_mut(&id) {
            endpoint.topics.remove(topic);
            if endpoint.topics.is_empty() {
                // dropping the sender retires the queue
                self.endpoints.remove(&id);
                debug!(endpoint = %id, "endpoint retired");
            }
        }

        true
    }

    /// Remove every endpoint from `topic`.
    pub fn remove_topic(&mut self, topic: &str) {
        let ids: Vec<EndpointId> = match self.topics.get(topic) {
            Some(entry) => entry.subscribers.keys().copied().collect(),
            None => return,
        };
        for id in ids {
            self.remove(topic, id);
        }
    }

    /// Remove `id` from every topic it is subscribed to.
    pub fn remove_endpoint(&mut self, id: EndpointId) {
        let topics: Vec<String> = match self.endpoints.get(&id) {
            Some(endpoint) => endpoint.topics.iter().cloned().collect(),
            None => return,
        };
        for topic in topics {
            self.remove(&topic, id);
        }
    }

    /// Retire every endpoint still registered. Returns how many were retired.
    pub fn retire_all(&mut self) -> usize {
        let ids: Vec<EndpointId> = self.endpoints.keys().copied().collect();
        let retired = ids.len();
        for id in ids {
            self.remove_endpoint(id);
        }
        retired
    }

    /// Queue sender of a live endpoint.
    pub fn sender(&self, id: EndpointId) -> Option<mpsc::Sender<Message>> {
        self.endpoints.get(&id).map(|endpoint| endpoint.sender.clone())
    }

    #[cfg(test)]
    pub(crate) fn is_live(&self, id: EndpointId) -> bool {
        self.endpoints.contains_key(&id)
    }

    /// Topics `id` is subscribed to, sorted.
    #[cfg(test)]
    pub(crate) fn topics_of(&self, id: EndpointId) -> Vec<String> {
        let mut topics: Vec<String> = self
            .endpoints
            .get(&id)
            .map(|endpoint| endpoint.topics.iter().cloned().collect())
            .unwrap_or_default();
        topics.sort();
        topics
    }

    #[cfg(test)]
    pub(crate) fn subscriber_count(&self, topic: &str) -> usize {
        self.topics.get(topic).map_or(0, Topic::len)
    }

    /// Live topics with their subscriber counts, sorted by name.
    pub fn topic_infos(&self) -> Vec<TopicInfo> {
        let mut infos: Vec<TopicInfo> = self
            .topics
            .values()
            .map(|topic| TopicInfo {
                name: topic.name.clone(),
                subscribers: topic.len(),
            })
            .collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }

    #[cfg(test)]
    pub(crate) fn endpoint_count(&self) -> usize {
        self.endpoints.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.topics.is_empty() && self.endpoints.is_empty()
    }

    /// Check the forward/reverse agreement and the no-empty-entries rule.
    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        let forward_ok = self.topics.iter().all(|(name, topic)| {
            !topic.is_empty()
                && topic.subscribers.keys().all(|id| {
                    self.endpoints
                        .get(id)
                        .is_some_and(|endpoint| endpoint.topics.contains(name))
                })
        });
        let reverse_ok = self.endpoints.iter().all(|(id, endpoint)| {
            !endpoint.topics.is_empty()
                && endpoint.topics.iter().all(|name| {
                    self.topics
                        .get(name)
                        .is_some_and(|topic| topic.subscribers.contains_key(id))
                })
        });
        forward_ok && reverse_ok
    }
}
