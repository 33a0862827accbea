//! Webhook ingestion pipeline.
//!
//! Automation platforms deliver payloads either as plain JSON or wrapped as
//! `{"text": "<escaped JSON>"}`. Ingestion unwraps the envelope when
//! present, files the payload under the company it names, and rebroadcasts
//! it on the event bus. Malformed nested JSON never fails the caller — the
//! outer payload is used as-is.

use serde_json::Value;

use hd_intel::IntelStore;

use super::events::EventBus;

/// Unwrap the `{"text": "<json>"}` envelope if present.
///
/// Returns the original payload unchanged when the field is absent, is not
/// a string, or does not parse to a JSON object.
pub fn unwrap_payload(payload: Value) -> Value {
    if let Some(text) = payload.get("text").and_then(Value::as_str) {
        match serde_json::from_str::<Value>(text) {
            Ok(inner @ Value::Object(_)) => {
                tracing::info!("unwrapped nested webhook payload");
                return inner;
            }
            _ => {
                tracing::warn!("'text' field is not a JSON object, using original payload");
            }
        }
    }
    payload
}

/// Pull the company name out of a payload: `company_name` first, then
/// `companyProfile.name` when the direct field is absent or empty.
///
/// A non-empty value of the wrong type suppresses the fallback — the
/// payload named a company, just not usably — and yields nothing.
pub fn extract_company_name(payload: &Value) -> Option<String> {
    let nested = || {
        payload
            .get("companyProfile")
            .and_then(|profile| profile.get("name"))
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
    };

    match payload.get("company_name") {
        Some(Value::String(name)) if !name.is_empty() => Some(name.clone()),
        None | Some(Value::Null) | Some(Value::String(_)) => nested(),
        Some(other) if is_empty_value(other) => nested(),
        Some(_) => None,
    }
}

/// Empty in the loose sense upstream payloads use: zero, false, or an
/// empty collection.
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Null => true,
        Value::String(s) => s.is_empty(),
    }
}

/// Ingest a raw webhook payload.
///
/// Unwraps the envelope, stores the **entire** unwrapped payload under the
/// extracted company name (when one is present), publishes it on the bus,
/// and returns it for echoing back to the caller.
pub fn process(store: &IntelStore, bus: &EventBus, raw: Value) -> Value {
    let payload = unwrap_payload(raw);

    if let Some(name) = extract_company_name(&payload) {
        if let Some(fragment) = payload.as_object() {
            store.upsert(&name, fragment.clone());
        }
    }

    bus.publish(payload.clone());
    payload
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unwraps_nested_json_object() {
        let raw = json!({"text": r#"{"event_type":"x","company_name":"Acme"}"#});
        let unwrapped = unwrap_payload(raw);
        assert_eq!(unwrapped["event_type"], "x");
        assert_eq!(unwrapped["company_name"], "Acme");
    }

    #[test]
    fn invalid_nested_json_falls_back_to_outer_payload() {
        let raw = json!({"text": "not json"});
        let unwrapped = unwrap_payload(raw.clone());
        assert_eq!(unwrapped, raw);
    }

    #[test]
    fn nested_non_object_json_falls_back_too() {
        let raw = json!({"text": "[1, 2, 3]"});
        let unwrapped = unwrap_payload(raw.clone());
        assert_eq!(unwrapped, raw);
    }

    #[test]
    fn company_name_direct_field_wins() {
        let payload = json!({
            "company_name": "Acme",
            "companyProfile": {"name": "Globex"},
        });
        assert_eq!(extract_company_name(&payload).as_deref(), Some("Acme"));
    }

    #[test]
    fn company_name_falls_back_to_profile() {
        let payload = json!({"companyProfile": {"name": "Globex"}});
        assert_eq!(extract_company_name(&payload).as_deref(), Some("Globex"));
    }

    #[test]
    fn empty_or_missing_name_is_none() {
        assert_eq!(extract_company_name(&json!({})), None);
        assert_eq!(extract_company_name(&json!({"company_name": ""})), None);
        assert_eq!(extract_company_name(&json!({"company_name": 42})), None);
    }

    #[test]
    fn empty_direct_name_falls_back_to_profile() {
        let payload = json!({
            "company_name": "",
            "companyProfile": {"name": "Globex"},
        });
        assert_eq!(extract_company_name(&payload).as_deref(), Some("Globex"));
    }

    #[test]
    fn non_string_direct_name_suppresses_fallback() {
        let payload = json!({
            "company_name": 42,
            "companyProfile": {"name": "Globex"},
        });
        assert_eq!(extract_company_name(&payload), None);
    }

    #[tokio::test]
    async fn process_stores_record_and_publishes_unwrapped_payload() {
        let store = IntelStore::new();
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        let raw = json!({"text": r#"{"event_type":"x","company_name":"Acme"}"#});
        let echoed = process(&store, &bus, raw);

        assert_eq!(echoed["event_type"], "x");

        let (name, record) = store.get("Acme").unwrap();
        assert_eq!(name, "Acme");
        // The whole unwrapped payload lands in the record, not a sub-object.
        assert_eq!(record.data.get("event_type"), Some(&json!("x")));

        let published = rx.recv().await.unwrap();
        assert_eq!(published["event_type"], "x");
    }

    #[tokio::test]
    async fn process_without_company_name_still_publishes() {
        let store = IntelStore::new();
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        let echoed = process(&store, &bus, json!({"text": "not json"}));
        assert_eq!(echoed["text"], "not json");
        assert!(store.list().is_empty());

        let published = rx.recv().await.unwrap();
        assert_eq!(published["text"], "not json");
    }
}
