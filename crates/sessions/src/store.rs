//! In-memory session registry.
//!
//! Each session tracks one meeting-join attempt by an automated participant:
//! the meeting URL, the bot created for it, and the lifecycle status. All
//! mutation goes through a single lock; callers get clones, never aliases.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use hd_domain::error::{Error, Result};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session status
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Lifecycle status of an agent session.
///
/// Intended flow is `Pending → Joining → Active → Completed`, with `Failed`
/// reachable from any non-terminal state. `Pending` is reserved — the
/// orchestrator only registers a session once its bot exists, so sessions
/// enter the registry at `Joining`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Pending,
    Joining,
    Active,
    Completed,
    Failed,
}

impl SessionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Full state of one agent session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    /// Bot ID assigned by the meeting-bot provider.
    pub bot_id: String,
    pub meeting_url: String,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub outcome: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Thread-safe in-memory registry of agent sessions.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session at `Joining`.
    ///
    /// When `session_id` is `None` a fresh UUID is generated. Callers that
    /// need the ID before the session exists (the bot callback URL embeds
    /// it) pre-generate it and pass it in.
    pub fn create(
        &self,
        bot_id: &str,
        meeting_url: &str,
        session_id: Option<String>,
    ) -> Result<Session> {
        let session_id = session_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let now = Utc::now();

        let session = Session {
            session_id: session_id.clone(),
            bot_id: bot_id.to_owned(),
            meeting_url: meeting_url.to_owned(),
            status: SessionStatus::Joining,
            created_at: now,
            updated_at: now,
            outcome: None,
            summary: None,
        };

        let mut sessions = self.sessions.write();
        if sessions.contains_key(&session_id) {
            return Err(Error::SessionExists(session_id));
        }
        sessions.insert(session_id.clone(), session.clone());

        tracing::info!(session_id = %session_id, bot_id = %bot_id, "session created");
        Ok(session)
    }

    /// Look up a session by ID.
    pub fn get(&self, session_id: &str) -> Option<Session> {
        self.sessions.read().get(session_id).cloned()
    }

    /// Look up a session, failing with `SessionNotFound` when absent.
    pub fn get_or_fail(&self, session_id: &str) -> Result<Session> {
        self.get(session_id)
            .ok_or_else(|| Error::SessionNotFound(session_id.to_owned()))
    }

    /// Update a session's status, optionally overwriting outcome/summary.
    ///
    /// Transition edges are not validated — goal completion jumps
    /// `Joining → Completed` directly.
    pub fn update_status(
        &self,
        session_id: &str,
        status: SessionStatus,
        outcome: Option<String>,
        summary: Option<String>,
    ) -> Result<Session> {
        let mut sessions = self.sessions.write();
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| Error::SessionNotFound(session_id.to_owned()))?;

        session.status = status;
        session.updated_at = Utc::now();

        if outcome.is_some() {
            session.outcome = outcome;
        }
        if summary.is_some() {
            session.summary = summary;
        }

        Ok(session.clone())
    }

    /// Seconds since the session was created, against the current wall
    /// clock. Not frozen at completion — a completed session's duration
    /// keeps growing on every read.
    pub fn duration_seconds(&self, session: &Session) -> i64 {
        Utc::now()
            .signed_duration_since(session.created_at)
            .num_seconds()
    }

    /// List all sessions. No ordering guarantee.
    pub fn list(&self) -> Vec<Session> {
        self.sessions.read().values().cloned().collect()
    }

    /// Remove a session. Returns `true` if it existed.
    pub fn delete(&self, session_id: &str) -> bool {
        self.sessions.write().remove(session_id).is_some()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_get_returns_joining() {
        let store = SessionStore::new();
        let created = store.create("bot-1", "https://meet.google.com/abc", None).unwrap();

        let fetched = store.get(&created.session_id).unwrap();
        assert_eq!(fetched.session_id, created.session_id);
        assert_eq!(fetched.status, SessionStatus::Joining);
        assert_eq!(fetched.bot_id, "bot-1");
    }

    #[test]
    fn create_with_supplied_id_keeps_it() {
        let store = SessionStore::new();
        let created = store
            .create("bot-1", "https://meet.google.com/abc", Some("sess-42".into()))
            .unwrap();
        assert_eq!(created.session_id, "sess-42");
    }

    #[test]
    fn create_rejects_id_collision() {
        let store = SessionStore::new();
        store
            .create("bot-1", "https://meet.google.com/abc", Some("dup".into()))
            .unwrap();
        let err = store
            .create("bot-2", "https://meet.google.com/xyz", Some("dup".into()))
            .unwrap_err();
        assert!(matches!(err, Error::SessionExists(id) if id == "dup"));
    }

    #[test]
    fn update_status_on_missing_session_fails() {
        let store = SessionStore::new();
        let err = store
            .update_status("nope", SessionStatus::Completed, None, None)
            .unwrap_err();
        assert!(matches!(err, Error::SessionNotFound(id) if id == "nope"));
        // It must never silently create one.
        assert!(store.get("nope").is_none());
    }

    #[test]
    fn update_status_overwrites_outcome_and_summary() {
        let store = SessionStore::new();
        let s = store.create("bot-1", "url", None).unwrap();

        let updated = store
            .update_status(
                &s.session_id,
                SessionStatus::Completed,
                Some("resolved".into()),
                Some("all good".into()),
            )
            .unwrap();
        assert_eq!(updated.status, SessionStatus::Completed);
        assert_eq!(updated.outcome.as_deref(), Some("resolved"));
        assert_eq!(updated.summary.as_deref(), Some("all good"));

        // Absent options leave the stored values untouched.
        let updated = store
            .update_status(&s.session_id, SessionStatus::Failed, None, None)
            .unwrap();
        assert_eq!(updated.outcome.as_deref(), Some("resolved"));
    }

    #[test]
    fn duration_is_monotonically_non_decreasing() {
        let store = SessionStore::new();
        let s = store.create("bot-1", "url", None).unwrap();

        let d1 = store.duration_seconds(&s);
        let d2 = store.duration_seconds(&s);
        assert!(d2 >= d1);
        assert!(d1 >= 0);
    }

    #[test]
    fn delete_returns_whether_session_existed() {
        let store = SessionStore::new();
        let s = store.create("bot-1", "url", None).unwrap();

        assert!(store.delete(&s.session_id));
        assert!(!store.delete(&s.session_id));
        assert!(store.get(&s.session_id).is_none());
    }

    #[test]
    fn terminal_states() {
        assert!(SessionStatus::Completed.is_terminal());
        assert!(SessionStatus::Failed.is_terminal());
        assert!(!SessionStatus::Joining.is_terminal());
        assert!(!SessionStatus::Pending.is_terminal());
    }
}
