//! Company intelligence store.
//!
//! Accumulates merged, fuzzy-keyed records of company data fed in by
//! webhook ingestion. In-memory only.

pub mod store;

pub use store::{CompanyRecord, CompanySummary, IntelStore};
