//! Environment-driven client construction.
//!
//! Kept as a single test: the process environment is shared by every test in
//! this binary.

use notes_ai::{ErrorKind, GenerationClient, JsonMode};
use std::time::Duration;

#[test]
fn new_client_honours_env_knobs() {
    std::env::remove_var("OPENROUTER_API_KEY");
    let err = GenerationClient::new().err().unwrap();
    assert_eq!(err.kind(), ErrorKind::Auth);

    std::env::set_var("OPENROUTER_API_KEY", "sk-env");
    std::env::set_var("NOTES_AI_TIMEOUT_MS", "1234");
    std::env::set_var("NOTES_AI_RETRY_ATTEMPTS", "7");
    std::env::set_var("NOTES_AI_RETRY_DELAY_MS", "250");
    std::env::set_var("NOTES_AI_DEFAULT_MODEL", "anthropic/claude-3-haiku");
    std::env::set_var("NOTES_AI_BASE_URL", "http://127.0.0.1:9/api/v1");
    std::env::set_var("NOTES_AI_APP_URL", "https://notes.example");
    std::env::set_var("NOTES_AI_APP_NAME", "Meeting Notes");
    std::env::set_var("NOTES_AI_JSON_MODE", "json_schema");

    let client = GenerationClient::new().unwrap();
    let config = client.config();
    assert_eq!(config.api_key, "sk-env");
    assert_eq!(config.timeout, Duration::from_millis(1234));
    assert_eq!(config.retry_attempts, 7);
    assert_eq!(config.retry_delay, Duration::from_millis(250));
    assert_eq!(config.default_model, "anthropic/claude-3-haiku");
    assert_eq!(config.base_url, "http://127.0.0.1:9/api/v1");
    assert_eq!(config.app.as_ref().unwrap().name, "Meeting Notes");
    assert_eq!(config.json_mode, JsonMode::JsonSchema);
    assert_eq!(client.retry_policy().max_retries, 7);

    // Explicit builder settings win over the environment.
    let client = GenerationClient::builder()
        .api_key("sk-explicit")
        .retry_attempts(1)
        .build()
        .unwrap();
    assert_eq!(client.config().api_key, "sk-explicit");
    assert_eq!(client.config().retry_attempts, 1);
    assert_eq!(client.config().timeout, Duration::from_millis(1234));

    // An unpaired app identity is ignored.
    std::env::remove_var("NOTES_AI_APP_NAME");
    let client = GenerationClient::new().unwrap();
    assert!(client.config().app.is_none());

    // Unparseable numbers keep the defaults.
    std::env::set_var("NOTES_AI_TIMEOUT_MS", "soon");
    let client = GenerationClient::new().unwrap();
    assert_eq!(client.config().timeout, Duration::from_millis(60_000));

    // A malformed proxy is skipped, not fatal.
    std::env::set_var("NOTES_AI_PROXY_URL", "http://not a proxy");
    let client = GenerationClient::new().unwrap();
    assert_eq!(client.config().base_url, "http://127.0.0.1:9/api/v1");
    std::env::remove_var("NOTES_AI_PROXY_URL");
}
