//! # Specular
//!
//! `specular` is an in-memory topic publish/subscribe broker with a
//! WebSocket front door. Clients connect to `/specular/{topic}` to publish
//! and receive everything on a topic, or to `/specular/pub/{topic}` to
//! publish only.
//!
//! ## Core Modules
//!
//! - `broker`: the topic registry, the single-writer command actor that owns
//!   it, and the cloneable `Broker` handle used to talk to that actor.
//! - `transport`: HTTP routing, the WebSocket gateway and the server loop.
//! - `client`: a line-oriented relay client for manual testing.
//! - `config`: settings loaded from `config/default.*` and `SPECULAR_*`
//!   environment variables.
//! - `utils`: error types and logging setup.

pub mod broker;
pub mod client;
pub mod config;
pub mod transport;
pub mod utils;
