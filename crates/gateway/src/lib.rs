//! Huddle gateway — HTTP server coordinating meeting-agent sessions.
//!
//! Wires the session registry, the company intel store, the event bus, and
//! the outbound provider clients behind an axum API.

pub mod api;
pub mod bootstrap;
pub mod cli;
pub mod runtime;
pub mod state;
