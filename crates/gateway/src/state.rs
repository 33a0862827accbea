use std::sync::Arc;

use hd_clients::{LookupClient, VoiceClient};
use hd_domain::config::Config;
use hd_intel::IntelStore;
use hd_sessions::SessionStore;

use crate::runtime::agent::AgentRunner;
use crate::runtime::events::EventBus;
use crate::runtime::outreach::OutreachRunner;

/// Shared application state passed to all API handlers.
///
/// Every store is an explicit instance constructed once in bootstrap and
/// handed out by `Arc` — there are no process-wide globals, so tests can
/// build isolated states.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    // ── In-memory state ───────────────────────────────────────────────
    pub sessions: Arc<SessionStore>,
    pub intel: Arc<IntelStore>,
    pub events: Arc<EventBus>,

    // ── Orchestration & collaborators ─────────────────────────────────
    pub agent: Arc<AgentRunner>,
    pub outreach: Arc<OutreachRunner>,
    pub voice: Arc<VoiceClient>,
    pub lookup: Arc<LookupClient>,
}
