//! The broker: topic registry, the command actor that owns it, and the
//! `Broker` handle used by everything else.

pub mod actor;
pub mod command;
pub mod engine;
pub mod message;
pub mod registry;
pub mod subscription;
pub mod topic;

pub use engine::Broker;
pub use message::{Message, Payload};
pub use registry::TopicInfo;
pub use subscription::{EndpointId, Subscription, SubscriptionMode};
