//! Meeting-bot provider client (Recall).
//!
//! Handles bot creation, leaving calls, and status checks. The trait seam
//! exists so orchestration can be exercised against a mock in tests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{json, Value};

use hd_domain::config::MeetingBotConfig;
use hd_domain::error::{Error, Result};

const SERVICE: &str = "recall";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Bot lifecycle operations against the meeting-bot provider.
#[async_trait]
pub trait MeetingBotApi: Send + Sync {
    /// Create a bot that joins `meeting_url`. The session ID is embedded in
    /// the agent webpage URL so the bot's page can call back into the
    /// gateway for this session.
    async fn create_bot(&self, meeting_url: &str, session_id: &str) -> Result<Value>;

    /// Ask the provider to remove a bot from its call.
    async fn remove_bot(&self, bot_id: &str) -> Result<()>;

    /// Fetch the provider's view of a bot. `None` when the bot is unknown.
    async fn bot_status(&self, bot_id: &str) -> Result<Option<Value>>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Recall client
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Production implementation backed by the Recall API.
#[derive(Debug, Clone)]
pub struct RecallClient {
    http: Client,
    base_url: String,
    api_key: String,
    bot_name: String,
    agent_page_url: String,
}

impl RecallClient {
    pub fn new(cfg: &MeetingBotConfig, api_key: String) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_owned(),
            api_key,
            bot_name: cfg.bot_name.clone(),
            agent_page_url: cfg.agent_page_url.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn decorate(&self, rb: RequestBuilder) -> RequestBuilder {
        rb.header("Authorization", format!("Token {}", self.api_key))
            .header("Accept", "application/json")
    }

    /// The webpage the bot loads as its camera feed, with the session ID
    /// appended so the page can identify its session.
    fn agent_page_for(&self, session_id: &str) -> String {
        let sep = if self.agent_page_url.contains('?') { '&' } else { '?' };
        format!("{}{}session_id={}", self.agent_page_url, sep, session_id)
    }

    async fn send(&self, rb: RequestBuilder) -> Result<Response> {
        self.decorate(rb).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::UpstreamTimeout { service: SERVICE }
            } else {
                Error::UpstreamUnavailable {
                    service: SERVICE,
                    message: e.to_string(),
                }
            }
        })
    }

    /// Reject statuses >= 400 with the response body attached.
    async fn check(resp: Response) -> Result<Response> {
        let status = resp.status();
        if status.as_u16() >= 400 {
            let body = resp.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), %body, "recall API error");
            return Err(Error::UpstreamRejected {
                service: SERVICE,
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }
}

#[async_trait]
impl MeetingBotApi for RecallClient {
    async fn create_bot(&self, meeting_url: &str, session_id: &str) -> Result<Value> {
        let payload = json!({
            "meeting_url": meeting_url,
            "bot_name": self.bot_name,
            "output_media": {
                "camera": {
                    "kind": "webpage",
                    "config": { "url": self.agent_page_for(session_id) },
                },
            },
        });

        tracing::info!(meeting_url = %meeting_url, "creating meeting bot");

        let resp = self
            .send(self.http.post(self.url("/bot/")).json(&payload))
            .await?;
        let resp = Self::check(resp).await?;
        resp.json().await.map_err(|e| Error::Http(e.to_string()))
    }

    async fn remove_bot(&self, bot_id: &str) -> Result<()> {
        tracing::info!(bot_id = %bot_id, "removing bot from call");

        let resp = self
            .send(
                self.http
                    .post(self.url("/bot/leave_call/create"))
                    .json(&json!({ "bot_id": bot_id })),
            )
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    async fn bot_status(&self, bot_id: &str) -> Result<Option<Value>> {
        let resp = self
            .send(self.http.get(self.url(&format!("/bot/{bot_id}/"))))
            .await?;

        if resp.status().as_u16() == 404 {
            return Ok(None);
        }
        let resp = Self::check(resp).await?;
        let body = resp.json().await.map_err(|e| Error::Http(e.to_string()))?;
        Ok(Some(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(page_url: &str) -> RecallClient {
        let cfg = MeetingBotConfig {
            agent_page_url: page_url.into(),
            ..Default::default()
        };
        RecallClient::new(&cfg, "key".into()).unwrap()
    }

    #[test]
    fn agent_page_gets_session_id_query_param() {
        let c = client("https://agent.example.com/agent");
        assert_eq!(
            c.agent_page_for("s-1"),
            "https://agent.example.com/agent?session_id=s-1"
        );
    }

    #[test]
    fn agent_page_with_existing_query_uses_ampersand() {
        let c = client("https://agent.example.com/agent?mode=ws");
        assert_eq!(
            c.agent_page_for("s-1"),
            "https://agent.example.com/agent?mode=ws&session_id=s-1"
        );
    }
}
