//! The `transport` module is responsible for network communication with
//! clients over WebSockets.
//!
//! `routes` maps request paths to topics and connection modes, `websocket`
//! bridges each upgraded connection to the broker, and `server` binds and
//! runs the whole thing.

pub mod routes;
pub mod server;
pub mod websocket;

pub use server::{serve, start_websocket_server};

#[cfg(test)]
mod tests;
