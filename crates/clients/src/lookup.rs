//! Company-lookup provider client (Clearbit autocomplete).
//!
//! Backs the `/companies/search` proxy endpoint.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use hd_domain::config::LookupConfig;
use hd_domain::error::{Error, Result};

const SERVICE: &str = "clearbit";

#[derive(Debug, Clone)]
pub struct LookupClient {
    http: Client,
    base_url: String,
}

impl LookupClient {
    pub fn new(cfg: &LookupConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            http,
            base_url: cfg.base_url.clone(),
        })
    }

    /// Search candidate companies for a free-text query.
    /// A non-array response body degrades to an empty list.
    pub async fn search(&self, query: &str) -> Result<Vec<Value>> {
        let resp = self
            .http
            .get(&self.base_url)
            .query(&[("query", query)])
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
        Ok(body.as_array().cloned().unwrap_or_default())
    }
}
