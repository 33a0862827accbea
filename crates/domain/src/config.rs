use std::fmt;

use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub meeting_bot: MeetingBotConfig,
    #[serde(default)]
    pub voice: VoiceConfig,
    #[serde(default)]
    pub lookup: LookupConfig,
    #[serde(default)]
    pub automation: AutomationConfig,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Server
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "d_8000")]
    pub port: u16,
    #[serde(default = "d_host")]
    pub host: String,
    #[serde(default)]
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "127.0.0.1".into(),
            cors: CorsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Origins allowed for CORS. Use `["*"]` for permissive (NOT recommended).
    /// Defaults to localhost-only.
    #[serde(default = "d_cors_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: d_cors_origins(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Meeting-bot provider (Recall)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingBotConfig {
    #[serde(default = "d_recall_url")]
    pub base_url: String,
    /// Environment variable holding the Recall API key.
    #[serde(default = "d_recall_key_env")]
    pub api_key_env: String,
    /// Display name the bot joins the meeting with.
    #[serde(default = "d_bot_name")]
    pub bot_name: String,
    /// URL of the agent webpage the bot loads as its camera feed.
    /// The session ID is appended as a query parameter at bot creation.
    #[serde(default)]
    pub agent_page_url: String,
    #[serde(default = "d_30")]
    pub timeout_secs: u64,
}

impl Default for MeetingBotConfig {
    fn default() -> Self {
        Self {
            base_url: d_recall_url(),
            api_key_env: d_recall_key_env(),
            bot_name: d_bot_name(),
            agent_page_url: String::new(),
            timeout_secs: 30,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Voice-agent provider (ElevenLabs)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceConfig {
    #[serde(default = "d_elevenlabs_url")]
    pub base_url: String,
    /// Environment variable holding the ElevenLabs API key.
    #[serde(default = "d_elevenlabs_key_env")]
    pub api_key_env: String,
    /// Conversational-AI agent ID used for signed-URL requests.
    #[serde(default)]
    pub agent_id: String,
    #[serde(default = "d_30")]
    pub timeout_secs: u64,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            base_url: d_elevenlabs_url(),
            api_key_env: d_elevenlabs_key_env(),
            agent_id: String::new(),
            timeout_secs: 30,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Company-lookup provider (Clearbit autocomplete)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    #[serde(default = "d_clearbit_url")]
    pub base_url: String,
    #[serde(default = "d_10")]
    pub timeout_secs: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: d_clearbit_url(),
            timeout_secs: 10,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Outbound automation webhooks (Make.com scenarios)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationConfig {
    /// Webhook notified when a company is selected for outreach.
    #[serde(default)]
    pub select_webhook_url: String,
    /// Webhook receiving one POST per contact during outreach dispatch.
    #[serde(default)]
    pub dispatch_webhook_url: String,
    #[serde(default = "d_10")]
    pub timeout_secs: u64,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            select_webhook_url: String::new(),
            dispatch_webhook_url: String::new(),
            timeout_secs: 10,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        // Server port must be non-zero.
        if self.server.port == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "server.port".into(),
                message: "port must be greater than 0".into(),
            });
        }

        // Server host must not be empty.
        if self.server.host.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "server.host".into(),
                message: "host must not be empty".into(),
            });
        }

        // Meeting-bot base_url must not be empty.
        if self.meeting_bot.base_url.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "meeting_bot.base_url".into(),
                message: "base_url must not be empty".into(),
            });
        }

        // Without an agent page the bot joins with a blank camera feed.
        if self.meeting_bot.agent_page_url.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "meeting_bot.agent_page_url".into(),
                message: "no agent webpage configured — bots will join without a camera feed"
                    .into(),
            });
        }

        // Signed-URL requests need an agent ID.
        if self.voice.agent_id.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "voice.agent_id".into(),
                message: "no voice agent ID configured — the signed-url endpoint will fail"
                    .into(),
            });
        }

        // Outreach endpoints refuse to dispatch without a webhook URL.
        if self.automation.dispatch_webhook_url.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "automation.dispatch_webhook_url".into(),
                message: "no dispatch webhook configured — outreach endpoints will fail".into(),
            });
        }

        // CORS: warn if wildcard is used.
        if self.server.cors.allowed_origins.len() == 1
            && self.server.cors.allowed_origins[0] == "*"
        {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "server.cors.allowed_origins".into(),
                message: "wildcard \"*\" allows all origins (not recommended for production)"
                    .into(),
            });
        }

        errors
    }

    /// Resolve a secret from the environment variable named in the config.
    /// Returns `None` when the variable is unset or empty.
    pub fn secret_from_env(var: &str) -> Option<String> {
        match std::env::var(var) {
            Ok(v) if !v.trim().is_empty() => Some(v),
            _ => None,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// serde default helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn d_8000() -> u16 {
    8000
}

fn d_host() -> String {
    "127.0.0.1".into()
}

fn d_cors_origins() -> Vec<String> {
    vec!["http://localhost:*".into(), "http://127.0.0.1:*".into()]
}

fn d_recall_url() -> String {
    "https://us-east-1.recall.ai/api/v1".into()
}

fn d_recall_key_env() -> String {
    "RECALL_API_KEY".into()
}

fn d_bot_name() -> String {
    "Huddle Agent".into()
}

fn d_elevenlabs_url() -> String {
    "https://api.elevenlabs.io".into()
}

fn d_elevenlabs_key_env() -> String {
    "ELEVENLABS_API_KEY".into()
}

fn d_clearbit_url() -> String {
    "https://autocomplete.clearbit.com/v1/companies/suggest".into()
}

fn d_30() -> u64 {
    30
}

fn d_10() -> u64 {
    10
}
