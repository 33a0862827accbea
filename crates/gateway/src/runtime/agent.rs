//! Agent orchestration — the only component touching the registry, the bus,
//! and the bot provider together.
//!
//! Starting an agent pre-generates the session ID (the bot's webpage URL
//! embeds it), creates the bot upstream, registers the session, and
//! broadcasts `agent_started`. Goal completion removes the bot best-effort,
//! marks the session `Completed`, and broadcasts `goal_completed`.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

use hd_clients::MeetingBotApi;
use hd_domain::error::{Error, Result};
use hd_sessions::{SessionStatus, SessionStore};

use super::events::EventBus;

/// Result of a successful agent start.
#[derive(Debug, Clone, Serialize)]
pub struct StartedAgent {
    pub session_id: String,
    pub bot_id: String,
    pub status: SessionStatus,
}

pub struct AgentRunner {
    bots: Arc<dyn MeetingBotApi>,
    sessions: Arc<SessionStore>,
    events: Arc<EventBus>,
}

impl AgentRunner {
    pub fn new(
        bots: Arc<dyn MeetingBotApi>,
        sessions: Arc<SessionStore>,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            bots,
            sessions,
            events,
        }
    }

    /// Start a new agent session for `meeting_url`.
    pub async fn start(&self, meeting_url: &str) -> Result<StartedAgent> {
        tracing::info!(meeting_url = %meeting_url, "starting agent");

        // The bot's callback URL embeds the session ID, so it must exist
        // before bot creation — which in turn must succeed before the
        // session is registered.
        let session_id = uuid::Uuid::new_v4().to_string();

        let bot_response = self.bots.create_bot(meeting_url, &session_id).await?;
        let bot_id = bot_response
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                tracing::error!(response = %bot_response, "bot provider response missing bot ID");
                Error::BotCreation("missing bot ID in response".into())
            })?
            .to_owned();

        let session = self
            .sessions
            .create(&bot_id, meeting_url, Some(session_id))?;

        self.events.publish(json!({
            "event_type": "agent_started",
            "session_id": session.session_id,
            "bot_id": bot_id,
            "meeting_url": meeting_url,
            "status": session.status,
            "timestamp": Utc::now().to_rfc3339(),
        }));

        Ok(StartedAgent {
            session_id: session.session_id,
            bot_id,
            status: session.status,
        })
    }

    /// Mark a session's goal as completed.
    ///
    /// Bot removal is best-effort: the bot may have already left the call,
    /// so an upstream failure is logged and completion proceeds.
    pub async fn complete_goal(
        &self,
        session_id: &str,
        outcome: &str,
        summary: &str,
    ) -> Result<()> {
        tracing::info!(session_id = %session_id, outcome = %outcome, "goal completed");

        let session = self.sessions.get_or_fail(session_id)?;

        match self.bots.remove_bot(&session.bot_id).await {
            Ok(()) => tracing::info!(bot_id = %session.bot_id, "bot removed from call"),
            Err(e) => tracing::warn!(
                bot_id = %session.bot_id,
                error = %e,
                "failed to remove bot from call (may have already left)"
            ),
        }

        self.sessions.update_status(
            session_id,
            SessionStatus::Completed,
            Some(outcome.to_owned()),
            Some(summary.to_owned()),
        )?;

        self.events.publish(json!({
            "event_type": "goal_completed",
            "session_id": session_id,
            "bot_id": session.bot_id,
            "outcome": outcome,
            "summary": summary,
            "status": SessionStatus::Completed,
            "timestamp": Utc::now().to_rfc3339(),
        }));

        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Scriptable bot provider double.
    struct MockBots {
        create_response: Value,
        fail_remove: bool,
        created_with: Mutex<Vec<(String, String)>>,
        removed: Mutex<Vec<String>>,
    }

    impl MockBots {
        fn returning(create_response: Value) -> Self {
            Self {
                create_response,
                fail_remove: false,
                created_with: Mutex::new(Vec::new()),
                removed: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl MeetingBotApi for MockBots {
        async fn create_bot(&self, meeting_url: &str, session_id: &str) -> Result<Value> {
            self.created_with
                .lock()
                .push((meeting_url.to_owned(), session_id.to_owned()));
            Ok(self.create_response.clone())
        }

        async fn remove_bot(&self, bot_id: &str) -> Result<()> {
            self.removed.lock().push(bot_id.to_owned());
            if self.fail_remove {
                return Err(Error::UpstreamRejected {
                    service: "recall",
                    status: 404,
                    body: "bot already left".into(),
                });
            }
            Ok(())
        }

        async fn bot_status(&self, _bot_id: &str) -> Result<Option<Value>> {
            Ok(None)
        }
    }

    #[allow(clippy::type_complexity)]
    fn runner(
        bots: MockBots,
    ) -> (AgentRunner, Arc<MockBots>, Arc<SessionStore>, Arc<EventBus>) {
        let bots = Arc::new(bots);
        let sessions = Arc::new(SessionStore::new());
        let events = Arc::new(EventBus::new());
        let runner = AgentRunner::new(bots.clone(), sessions.clone(), events.clone());
        (runner, bots, sessions, events)
    }

    #[tokio::test]
    async fn start_registers_session_and_publishes_started_event() {
        let bots = MockBots::returning(json!({"id": "bot-7"}));
        let (runner, _, sessions, events) = runner(bots);
        let mut rx = events.subscribe();

        let started = runner.start("https://meet.google.com/abc").await.unwrap();
        assert_eq!(started.bot_id, "bot-7");
        assert_eq!(started.status, SessionStatus::Joining);

        let session = sessions.get(&started.session_id).unwrap();
        assert_eq!(session.status, SessionStatus::Joining);
        assert_eq!(session.bot_id, "bot-7");

        let event = rx.recv().await.unwrap();
        assert_eq!(event["event_type"], "agent_started");
        assert_eq!(event["session_id"], started.session_id.as_str());
        assert_eq!(event["status"], "joining");
    }

    #[tokio::test]
    async fn start_passes_pregenerated_session_id_to_bot_creation() {
        let bots = MockBots::returning(json!({"id": "bot-7"}));
        let (runner, bots, _, _) = runner(bots);

        let started = runner.start("url").await.unwrap();

        let calls = bots.created_with.lock();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "url");
        // The ID handed to bot creation is the one the session got.
        assert_eq!(calls[0].1, started.session_id);
    }

    #[tokio::test]
    async fn start_fails_when_bot_response_lacks_id() {
        let bots = MockBots::returning(json!({"error": "quota"}));
        let (runner, _, sessions, _) = runner(bots);

        let err = runner.start("url").await.unwrap_err();
        assert!(matches!(err, Error::BotCreation(_)));
        assert!(sessions.list().is_empty());
    }

    #[tokio::test]
    async fn complete_goal_succeeds_even_when_bot_removal_fails() {
        let mut bots = MockBots::returning(json!({"id": "bot-7"}));
        bots.fail_remove = true;
        let (runner, bots, sessions, events) = runner(bots);

        let started = runner.start("url").await.unwrap();
        let mut rx = events.subscribe();

        runner
            .complete_goal(&started.session_id, "resolved", "it went fine")
            .await
            .unwrap();

        let session = sessions.get(&started.session_id).unwrap();
        assert_eq!(session.status, SessionStatus::Completed);
        assert_eq!(session.outcome.as_deref(), Some("resolved"));
        assert_eq!(session.summary.as_deref(), Some("it went fine"));

        let event = rx.recv().await.unwrap();
        assert_eq!(event["event_type"], "goal_completed");
        assert_eq!(event["status"], "completed");

        // Removal was attempted before it failed.
        assert_eq!(bots.removed.lock().as_slice(), ["bot-7"]);
    }

    #[tokio::test]
    async fn complete_goal_on_unknown_session_fails() {
        let bots = MockBots::returning(json!({"id": "bot-7"}));
        let (runner, _, _, _) = runner(bots);

        let err = runner.complete_goal("ghost", "x", "y").await.unwrap_err();
        assert!(matches!(err, Error::SessionNotFound(id) if id == "ghost"));
    }
}
