//! Commands sent from broker handles to the command actor.

use tokio::sync::{mpsc, oneshot};

use crate::broker::message::{Message, Payload};
use crate::broker::registry::TopicInfo;
use crate::broker::subscription::{EndpointId, SubscriptionMode};

#[derive(Debug)]
pub enum Command {
    /// Register a fresh endpoint on `topics`. With no topics the sender is
    /// simply dropped, which retires the queue immediately.
    Subscribe {
        id: EndpointId,
        sender: mpsc::Sender<Message>,
        topics: Vec<String>,
        mode: SubscriptionMode,
    },
    /// Extend a live endpoint's topic set. Ignored for retired endpoints.
    AddSubscription {
        id: EndpointId,
        topics: Vec<String>,
    },
    Publish {
        topics: Vec<String>,
        payload: Payload,
        timestamp: i64,
    },
    Unsubscribe {
        id: EndpointId,
        topics: Vec<String>,
    },
    UnsubscribeAll {
        id: EndpointId,
    },
    CloseTopic {
        topics: Vec<String>,
    },
    ListTopics {
        reply: oneshot::Sender<Vec<TopicInfo>>,
    },
    Shutdown,
}
