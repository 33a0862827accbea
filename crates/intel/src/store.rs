//! Fuzzy-keyed store of merged company records.
//!
//! Keys are free-text company names as they arrive from upstream payloads.
//! Lookups deliberately favor recall over precision: an exact match wins,
//! otherwise the first stored name that contains or starts with the query
//! (case-insensitively) is returned. Deletion is exact-match only, so a
//! fuzzy query can never remove the wrong record.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::{Map, Value};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Record model
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Accumulated intelligence about one company.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyRecord {
    /// Merged data, shallow: each upsert's top-level fields overwrite
    /// same-named fields, everything else is preserved.
    pub data: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

/// Listing row: record metadata without the payload.
#[derive(Debug, Clone, Serialize)]
pub struct CompanySummary {
    pub company_name: String,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub has_data: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Thread-safe in-memory company record store.
#[derive(Default)]
pub struct IntelStore {
    records: RwLock<HashMap<String, CompanyRecord>>,
}

impl IntelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or merge a data fragment under `company_name`.
    ///
    /// Creates an empty record on first write, then shallow-merges the
    /// fragment's top-level fields into it and bumps `last_updated`.
    pub fn upsert(&self, company_name: &str, fragment: Map<String, Value>) {
        let mut records = self.records.write();
        let now = Utc::now();

        let record = records
            .entry(company_name.to_owned())
            .or_insert_with(|| CompanyRecord {
                data: Map::new(),
                created_at: now,
                last_updated: now,
            });

        for (key, value) in fragment {
            record.data.insert(key, value);
        }
        record.last_updated = now;

        tracing::info!(
            company = %company_name,
            total = records.len(),
            "stored company intel"
        );
    }

    /// Resolve a query to a stored company name.
    ///
    /// Exact match first; otherwise the first stored name (iteration order,
    /// arbitrary) that contains the query or starts with it,
    /// case-insensitively.
    pub fn find_name(&self, query: &str) -> Option<String> {
        let records = self.records.read();
        if records.contains_key(query) {
            return Some(query.to_owned());
        }

        let query_lower = query.to_lowercase();
        records
            .keys()
            .find(|stored| {
                let stored_lower = stored.to_lowercase();
                stored_lower.contains(&query_lower) || stored_lower.starts_with(&query_lower)
            })
            .cloned()
    }

    /// Fuzzy lookup: resolved name plus a clone of the record.
    pub fn get(&self, query: &str) -> Option<(String, CompanyRecord)> {
        let matched = self.find_name(query)?;
        let record = self.records.read().get(&matched)?.clone();
        Some((matched, record))
    }

    /// List metadata for every stored record.
    pub fn list(&self) -> Vec<CompanySummary> {
        self.records
            .read()
            .iter()
            .map(|(name, record)| CompanySummary {
                company_name: name.clone(),
                created_at: record.created_at,
                last_updated: record.last_updated,
                has_data: !record.data.is_empty(),
            })
            .collect()
    }

    /// Delete on an exact key match only. Returns `true` if removed.
    pub fn delete_exact(&self, company_name: &str) -> bool {
        let removed = self.records.write().remove(company_name).is_some();
        if removed {
            tracing::info!(company = %company_name, "deleted company intel");
        }
        removed
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fragment(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn upserts_merge_shallowly() {
        let store = IntelStore::new();
        store.upsert("Acme", fragment(json!({"a": 1})));
        store.upsert("Acme", fragment(json!({"b": 2})));

        let (name, record) = store.get("Acme").unwrap();
        assert_eq!(name, "Acme");
        assert_eq!(record.data.get("a"), Some(&json!(1)));
        assert_eq!(record.data.get("b"), Some(&json!(2)));
    }

    #[test]
    fn upsert_overwrites_same_named_top_level_fields() {
        let store = IntelStore::new();
        store.upsert("Acme", fragment(json!({"a": 1, "keep": true})));
        store.upsert("Acme", fragment(json!({"a": 99})));

        let (_, record) = store.get("Acme").unwrap();
        assert_eq!(record.data.get("a"), Some(&json!(99)));
        assert_eq!(record.data.get("keep"), Some(&json!(true)));
    }

    #[test]
    fn fuzzy_match_finds_substring_case_insensitively() {
        let store = IntelStore::new();
        store.upsert("Acme Corp", fragment(json!({"x": 1})));

        assert_eq!(store.find_name("acme"), Some("Acme Corp".into()));
        assert_eq!(store.find_name("CORP"), Some("Acme Corp".into()));
        assert_eq!(store.find_name("globex"), None);
    }

    #[test]
    fn exact_match_wins_over_fuzzy() {
        let store = IntelStore::new();
        store.upsert("Acme Corp", fragment(json!({})));
        store.upsert("Acme", fragment(json!({})));

        assert_eq!(store.find_name("Acme"), Some("Acme".into()));
    }

    #[test]
    fn delete_is_exact_only() {
        let store = IntelStore::new();
        store.upsert("Acme Corp", fragment(json!({"x": 1})));

        // Fuzzy query must not delete.
        assert!(!store.delete_exact("acme"));
        assert!(store.get("acme").is_some());

        assert!(store.delete_exact("Acme Corp"));
        assert!(store.get("acme").is_none());
    }

    #[test]
    fn list_reports_has_data() {
        let store = IntelStore::new();
        store.upsert("Empty Co", Map::new());
        store.upsert("Full Co", fragment(json!({"k": "v"})));

        let mut rows = store.list();
        rows.sort_by(|a, b| a.company_name.cmp(&b.company_name));
        assert_eq!(rows.len(), 2);
        assert!(!rows[0].has_data);
        assert!(rows[1].has_data);
    }
}
