//! Config defaults: applies sensible default values to parsed config.

use crate::schema::{
    IntakeConfig, LimitsConfig, LoggingConfig, OllamaConfig, ServerConfig, TimeoutsConfig,
};

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:11434";
pub const DEFAULT_VISION_MODEL: &str = "qwen2.5vl";
pub const DEFAULT_TEXT_MODEL: &str = "llama3.1";

/// Image extraction deadline. Vision inference is the slower flow.
pub const DEFAULT_EXTRACTION_TIMEOUT_MS: u64 = 60_000;

/// Text-only comparison deadline.
pub const DEFAULT_DISCREPANCY_TIMEOUT_MS: u64 = 30_000;

/// Largest accepted upload body.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: IntakeConfig) -> IntakeConfig {
    let config = apply_server_defaults(config);
    let config = apply_ollama_defaults(config);
    let config = apply_timeout_defaults(config);
    let config = apply_limit_defaults(config);
    apply_logging_defaults(config)
}

fn apply_server_defaults(mut config: IntakeConfig) -> IntakeConfig {
    let server = config.server.get_or_insert_with(ServerConfig::default);
    server
        .bind_address
        .get_or_insert_with(|| DEFAULT_BIND_ADDRESS.to_string());
    server.port.get_or_insert(DEFAULT_PORT);
    config
}

fn apply_ollama_defaults(mut config: IntakeConfig) -> IntakeConfig {
    let ollama = config.ollama.get_or_insert_with(OllamaConfig::default);
    ollama
        .base_url
        .get_or_insert_with(|| DEFAULT_BASE_URL.to_string());
    ollama
        .vision_model
        .get_or_insert_with(|| DEFAULT_VISION_MODEL.to_string());
    ollama
        .text_model
        .get_or_insert_with(|| DEFAULT_TEXT_MODEL.to_string());
    config
}

fn apply_timeout_defaults(mut config: IntakeConfig) -> IntakeConfig {
    let timeouts = config.timeouts.get_or_insert_with(TimeoutsConfig::default);
    timeouts.extraction_ms.get_or_insert(DEFAULT_EXTRACTION_TIMEOUT_MS);
    timeouts.discrepancy_ms.get_or_insert(DEFAULT_DISCREPANCY_TIMEOUT_MS);
    config
}

fn apply_limit_defaults(mut config: IntakeConfig) -> IntakeConfig {
    let limits = config.limits.get_or_insert_with(LimitsConfig::default);
    limits.max_upload_bytes.get_or_insert(DEFAULT_MAX_UPLOAD_BYTES);
    config
}

fn apply_logging_defaults(mut config: IntakeConfig) -> IntakeConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    logging
        .level
        .get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
    logging.json.get_or_insert(false);
    config
}
