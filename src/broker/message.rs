//! Message definitions for the broker
//!
//! A `Message` is what a subscriber pulls out of its queue: the topic it was
//! delivered on, the payload as published, and the publish timestamp.
//!
//! Payloads are reference counted so fanning one publish out to many
//! subscribers never copies the body.

use std::fmt;
use std::sync::Arc;

/// Body of a published message. Text and binary frames stay distinct all
/// the way through the broker so the gateway can write back the same kind
/// of frame it read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(Arc<str>),
    Binary(Arc<[u8]>),
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.into())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text.into())
    }
}

impl From<&[u8]> for Payload {
    fn from(bytes: &[u8]) -> Self {
        Payload::Binary(bytes.into())
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload::Binary(bytes.into())
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Text(text) => f.write_str(text),
            Payload::Binary(bytes) => write!(f, "<{} bytes>", bytes.len()),
        }
    }
}

/// A delivered message.
///
/// - `topic`: the topic this copy was delivered on
/// - `payload`: body as published
/// - `timestamp`: milliseconds since UNIX epoch, stamped by the broker handle
///   when the publish was enqueued
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub topic: String,
    pub payload: Payload,
    pub timestamp: i64,
}
