//! AppState construction extracted from `main.rs`.

use std::sync::Arc;

use anyhow::Context;

use hd_clients::{AutomationClient, LookupClient, RecallClient, VoiceClient};
use hd_domain::config::{Config, ConfigSeverity};
use hd_intel::IntelStore;
use hd_sessions::SessionStore;

use crate::runtime::agent::AgentRunner;
use crate::runtime::events::EventBus;
use crate::runtime::outreach::OutreachRunner;
use crate::state::AppState;

/// Validate config, initialize every subsystem and return a fully-wired
/// [`AppState`].
pub fn build_app_state(config: Arc<Config>) -> anyhow::Result<AppState> {
    // ── Config validation ────────────────────────────────────────────
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            ConfigSeverity::Warning => tracing::warn!("config: {issue}"),
            ConfigSeverity::Error => tracing::error!("config: {issue}"),
        }
    }
    if issues.iter().any(|i| i.severity == ConfigSeverity::Error) {
        anyhow::bail!(
            "config validation failed with {} error(s)",
            issues
                .iter()
                .filter(|i| i.severity == ConfigSeverity::Error)
                .count()
        );
    }

    // ── In-memory stores ─────────────────────────────────────────────
    let sessions = Arc::new(SessionStore::new());
    let intel = Arc::new(IntelStore::new());
    let events = Arc::new(EventBus::new());
    tracing::info!("session registry, intel store and event bus ready");

    // ── Outbound clients ─────────────────────────────────────────────
    // Secrets come from the environment variables named in the config.
    // Empty keys degrade gracefully: the client is built, the upstream
    // rejects the first call.
    let recall_key = Config::secret_from_env(&config.meeting_bot.api_key_env)
        .unwrap_or_else(|| {
            tracing::warn!(
                env = %config.meeting_bot.api_key_env,
                "meeting-bot API key not set — bot creation will fail"
            );
            String::new()
        });
    let bots = Arc::new(
        RecallClient::new(&config.meeting_bot, recall_key)
            .context("initializing meeting-bot client")?,
    );
    tracing::info!(base_url = %config.meeting_bot.base_url, "meeting-bot client ready");

    let voice_key = Config::secret_from_env(&config.voice.api_key_env).unwrap_or_else(|| {
        tracing::warn!(
            env = %config.voice.api_key_env,
            "voice API key not set — signed-url requests will fail"
        );
        String::new()
    });
    let voice = Arc::new(
        VoiceClient::new(&config.voice, voice_key).context("initializing voice client")?,
    );

    let lookup =
        Arc::new(LookupClient::new(&config.lookup).context("initializing lookup client")?);

    let automation = Arc::new(
        AutomationClient::new(&config.automation).context("initializing automation client")?,
    );

    // ── Orchestration ────────────────────────────────────────────────
    let agent = Arc::new(AgentRunner::new(bots, sessions.clone(), events.clone()));
    let outreach = Arc::new(OutreachRunner::new(
        automation,
        intel.clone(),
        config.automation.clone(),
    ));
    tracing::info!("agent and outreach runners ready");

    Ok(AppState {
        config,
        sessions,
        intel,
        events,
        agent,
        outreach,
        voice,
        lookup,
    })
}
