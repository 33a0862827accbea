//! Outbound automation webhook client (Make.com scenarios).
//!
//! The gateway notifies automation scenarios by POSTing JSON to configured
//! webhook URLs: one on company selection, one per contact during outreach
//! dispatch. The sink trait lets dispatch logic run against a mock.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use hd_domain::config::AutomationConfig;
use hd_domain::error::{Error, Result};

const SERVICE: &str = "automation";

/// Outbound JSON webhook delivery.
#[async_trait]
pub trait WebhookSink: Send + Sync {
    /// POST `payload` to `url` and return the response status code.
    ///
    /// Non-2xx statuses are NOT errors here — dispatch accounts for them
    /// per contact. Errors are transport-level only.
    async fn post(&self, url: &str, payload: &Value) -> Result<u16>;
}

#[derive(Debug, Clone)]
pub struct AutomationClient {
    http: Client,
}

impl AutomationClient {
    pub fn new(cfg: &AutomationConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self { http })
    }
}

#[async_trait]
impl WebhookSink for AutomationClient {
    async fn post(&self, url: &str, payload: &Value) -> Result<u16> {
        let resp = self.http.post(url).json(payload).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::UpstreamTimeout { service: SERVICE }
            } else {
                Error::UpstreamUnavailable {
                    service: SERVICE,
                    message: e.to_string(),
                }
            }
        })?;

        Ok(resp.status().as_u16())
    }
}
