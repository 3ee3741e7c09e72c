//! A small line-oriented client for poking at a running server.
//!
//! Every line read from the input is sent as a text frame; every frame
//! received is printed on its own line.

pub mod relay;

pub use relay::{relay, run};
