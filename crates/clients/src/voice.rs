//! Voice-agent provider client (ElevenLabs).
//!
//! One call: retrieve a signed URL for the conversation websocket. The
//! agent webpage uses websocket mode because WebRTC is unreliable inside
//! the bot's headless browser.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use hd_domain::config::VoiceConfig;
use hd_domain::error::{Error, Result};

const SERVICE: &str = "elevenlabs";

#[derive(Debug, Clone)]
pub struct VoiceClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl VoiceClient {
    pub fn new(cfg: &VoiceConfig, api_key: String) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_owned(),
            api_key,
        })
    }

    /// Fetch a signed URL for the given conversational agent.
    pub async fn signed_url(&self, agent_id: &str) -> Result<String> {
        let url = format!("{}/v1/convai/conversation/get-signed-url", self.base_url);

        let resp = self
            .http
            .get(&url)
            .query(&[("agent_id", agent_id)])
            .header("xi-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::UpstreamTimeout { service: SERVICE }
                } else {
                    Error::UpstreamUnavailable {
                        service: SERVICE,
                        message: e.to_string(),
                    }
                }
            })?;

        let status = resp.status().as_u16();
        if status >= 400 {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::UpstreamRejected {
                service: SERVICE,
                status,
                body,
            });
        }

        let body: Value = resp.json().await.map_err(|e| Error::Http(e.to_string()))?;
        match body.get("signed_url").and_then(Value::as_str) {
            Some(url) if !url.is_empty() => Ok(url.to_owned()),
            _ => Err(Error::UpstreamRejected {
                service: SERVICE,
                status,
                body: "response missing signed_url".into(),
            }),
        }
    }
}
