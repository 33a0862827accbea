use hd_domain::config::{Config, ConfigSeverity};

#[test]
fn default_host_is_localhost() {
    let config = Config::default();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8000);
}

#[test]
fn explicit_zero_host_parses() {
    let toml_str = r#"
[server]
host = "0.0.0.0"
port = 9100
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9100);
}

#[test]
fn default_cors_allows_only_localhost() {
    let config = Config::default();
    assert!(config
        .server
        .cors
        .allowed_origins
        .contains(&"http://localhost:*".to_string()));
    assert!(config
        .server
        .cors
        .allowed_origins
        .contains(&"http://127.0.0.1:*".to_string()));
}

#[test]
fn meeting_bot_defaults() {
    let config = Config::default();
    assert_eq!(config.meeting_bot.api_key_env, "RECALL_API_KEY");
    assert_eq!(config.meeting_bot.timeout_secs, 30);
    assert!(config.meeting_bot.base_url.contains("recall.ai"));
}

#[test]
fn partial_toml_fills_defaults() {
    let toml_str = r#"
[meeting_bot]
agent_page_url = "https://agent.example.com/agent"

[voice]
agent_id = "agent_123"
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.meeting_bot.agent_page_url, "https://agent.example.com/agent");
    assert_eq!(config.voice.agent_id, "agent_123");
    assert_eq!(config.lookup.timeout_secs, 10);
}

#[test]
fn zero_port_is_a_validation_error() {
    let toml_str = r#"
[server]
port = 0
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    let issues = config.validate();
    assert!(issues
        .iter()
        .any(|i| i.severity == ConfigSeverity::Error && i.field == "server.port"));
}

#[test]
fn automation_defaults_and_unconfigured_warning() {
    let config = Config::default();
    assert!(config.automation.dispatch_webhook_url.is_empty());
    assert_eq!(config.automation.timeout_secs, 10);

    let issues = config.validate();
    assert!(issues
        .iter()
        .any(|i| i.severity == ConfigSeverity::Warning
            && i.field == "automation.dispatch_webhook_url"));

    let toml_str = r#"
[automation]
dispatch_webhook_url = "https://hook.example.com/abc"
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert!(config
        .validate()
        .iter()
        .all(|i| i.field != "automation.dispatch_webhook_url"));
}

#[test]
fn missing_agent_page_is_only_a_warning() {
    let config = Config::default();
    let issues = config.validate();
    assert!(issues
        .iter()
        .all(|i| i.severity != ConfigSeverity::Error));
    assert!(issues
        .iter()
        .any(|i| i.field == "meeting_bot.agent_page_url"));
}
