//! The `error` module defines the error types used within `specular`.
//!
//! Broker-level failures are deliberately rare: registry no-ops (publishing
//! to an empty topic, unsubscribing twice) are not errors at all. The only
//! thing a broker caller can observe is that the command actor has stopped.
//! Everything else here belongs to process startup and the network edge.

use thiserror::Error;

/// Failure of a broker handle operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BrokerError {
    /// The command actor has shut down and no longer accepts commands.
    #[error("broker is shut down")]
    Closed,
}

/// Application-level error.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Broker(#[from] BrokerError),

    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
