//! Outreach dispatch — the read consumer of the company intel store.
//!
//! Once reconnaissance has filled a company record, outreach fans its key
//! personnel out to a configured automation webhook, one POST per contact.
//! Delivery is accounted per contact; a failed POST never aborts the run.
//! Company selection is a single forwarding POST to its own webhook.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde_json::{json, Map, Value};

use hd_clients::WebhookSink;
use hd_domain::config::AutomationConfig;
use hd_domain::error::{Error, Result};
use hd_intel::IntelStore;

/// Statuses the automation platform acknowledges a delivery with.
const ACCEPTED: [u16; 3] = [200, 201, 202];

/// Outcome of a full-company dispatch run.
#[derive(Debug)]
pub struct DispatchReport {
    /// Stored name the query resolved to, exact or fuzzy.
    pub company_name: String,
    pub total_contacts: usize,
    pub delivered: usize,
    pub failed: usize,
    pub execution_time: String,
    /// Per-contact delivery outcomes, in dispatch order.
    pub details: Vec<Value>,
}

pub struct OutreachRunner {
    sink: Arc<dyn WebhookSink>,
    intel: Arc<IntelStore>,
    config: AutomationConfig,
}

impl OutreachRunner {
    pub fn new(sink: Arc<dyn WebhookSink>, intel: Arc<IntelStore>, config: AutomationConfig) -> Self {
        Self { sink, intel, config }
    }

    pub fn is_configured(&self) -> (bool, bool) {
        (
            !self.config.select_webhook_url.is_empty(),
            !self.config.dispatch_webhook_url.is_empty(),
        )
    }

    /// Forward a company selection to the automation webhook.
    ///
    /// Unlike per-contact dispatch, a non-2xx here is an error — there is
    /// no partial outcome to report.
    pub async fn select_company(&self, company_name: &str) -> Result<()> {
        if self.config.select_webhook_url.is_empty() {
            return Err(Error::Config(
                "automation.select_webhook_url is not configured".into(),
            ));
        }

        tracing::info!(company = %company_name, "forwarding company selection");

        let status = self
            .sink
            .post(
                &self.config.select_webhook_url,
                &json!({ "company_name": company_name }),
            )
            .await?;

        if !ACCEPTED.contains(&status) {
            return Err(Error::UpstreamRejected {
                service: "automation",
                status,
                body: "selection webhook rejected the payload".into(),
            });
        }
        Ok(())
    }

    /// Dispatch outreach for every key contact in a stored company record.
    pub async fn dispatch_company(&self, query: &str) -> Result<DispatchReport> {
        if self.config.dispatch_webhook_url.is_empty() {
            return Err(Error::Config(
                "automation.dispatch_webhook_url is not configured".into(),
            ));
        }

        let start = Instant::now();
        tracing::info!(company = %query, "starting outreach dispatch");

        let (company_name, record) = self
            .intel
            .get(query)
            .ok_or_else(|| Error::RecordNotFound(query.to_owned()))?;
        if company_name != query {
            tracing::info!(query = %query, matched = %company_name, "fuzzy company match");
        }

        let contacts = extract_contacts(&record.data);
        if contacts.is_empty() {
            return Err(Error::NoContacts(company_name));
        }

        tracing::info!(count = contacts.len(), "contacts to dispatch");

        let mut details = Vec::with_capacity(contacts.len());
        let mut delivered = 0;
        let mut failed = 0;

        for contact in &contacts {
            let result = self.dispatch_one(contact, &company_name).await;
            if result["status"] == "delivered" {
                delivered += 1;
            } else {
                failed += 1;
            }
            details.push(result);
        }

        let execution_time = format!("{:.2}s", start.elapsed().as_secs_f64());
        tracing::info!(
            company = %company_name,
            total = contacts.len(),
            delivered,
            failed,
            elapsed = %execution_time,
            "outreach dispatch complete"
        );

        Ok(DispatchReport {
            company_name,
            total_contacts: contacts.len(),
            delivered,
            failed,
            execution_time,
            details,
        })
    }

    /// Dispatch outreach to a single named contact, outside any record.
    ///
    /// Returns `(delivered, message)` — delivery failure is an outcome,
    /// not an error.
    pub async fn dispatch_contact(
        &self,
        name: &str,
        role: &str,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<(bool, String)> {
        if self.config.dispatch_webhook_url.is_empty() {
            return Err(Error::Config(
                "automation.dispatch_webhook_url is not configured".into(),
            ));
        }

        tracing::info!(contact = %name, role = %role, "dispatching individual outreach");

        let payload = json!({
            "name": name,
            "role": role,
            "email": email,
            "phone": phone,
            "timestamp": Utc::now().to_rfc3339(),
            "outreach_type": "individual",
        });

        match self.sink.post(&self.config.dispatch_webhook_url, &payload).await {
            Ok(status) if ACCEPTED.contains(&status) => {
                Ok((true, format!("outreach dispatched to {name}")))
            }
            Ok(status) => {
                tracing::warn!(contact = %name, status, "dispatch webhook rejected contact");
                Ok((false, format!("webhook returned status {status}")))
            }
            Err(e) => {
                tracing::warn!(contact = %name, error = %e, "dispatch webhook unreachable");
                Ok((false, e.to_string()))
            }
        }
    }

    async fn dispatch_one(&self, contact: &Value, company_name: &str) -> Value {
        let contact_name = contact.get("name").and_then(Value::as_str).unwrap_or("");

        let payload = json!({
            "company_name": company_name,
            "contact": contact,
            "timestamp": Utc::now().to_rfc3339(),
            "outreach_type": "multi-channel",
        });

        match self.sink.post(&self.config.dispatch_webhook_url, &payload).await {
            Ok(status) if ACCEPTED.contains(&status) => json!({
                "contact_name": contact_name,
                "status": "delivered",
                "status_code": status,
            }),
            Ok(status) => {
                tracing::warn!(contact = %contact_name, status, "dispatch webhook rejected contact");
                json!({
                    "contact_name": contact_name,
                    "status": "failed",
                    "status_code": status,
                    "message": format!("webhook returned status {status}"),
                })
            }
            Err(e) => {
                tracing::warn!(contact = %contact_name, error = %e, "dispatch webhook unreachable");
                json!({
                    "contact_name": contact_name,
                    "status": "failed",
                    "message": e.to_string(),
                })
            }
        }
    }
}

/// Pull the key-personnel list out of a record: `keyPersonnel` at the top
/// level first, then nested under `data`. Anything non-array counts as no
/// contacts.
pub fn extract_contacts(data: &Map<String, Value>) -> Vec<Value> {
    let top = data.get("keyPersonnel");
    let nested = || data.get("data").and_then(|d| d.get("keyPersonnel"));

    top.or_else(nested)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
