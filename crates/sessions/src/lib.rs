//! Session registry for meeting-agent sessions.
//!
//! In-memory only: sessions are lost on restart. Designed for a
//! Redis/database backend swap later.

pub mod store;

pub use store::{Session, SessionStatus, SessionStore};
