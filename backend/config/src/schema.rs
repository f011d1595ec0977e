//! LegalLens runtime configuration schema.
//!
//! Every field is optional on disk; [`crate::apply_all_defaults`] fills the
//! gaps and the accessors below fall back to the same constants.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::defaults::{
    DEFAULT_BASE_URL, DEFAULT_BIND_ADDRESS, DEFAULT_DISCREPANCY_TIMEOUT_MS,
    DEFAULT_EXTRACTION_TIMEOUT_MS, DEFAULT_LOG_LEVEL, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PORT,
    DEFAULT_TEXT_MODEL, DEFAULT_VISION_MODEL,
};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration for the LegalLens service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeConfig {
    /// HTTP listener
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,

    /// Model service location and model names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ollama: Option<OllamaConfig>,

    /// Per-flow deadlines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeouts: Option<TimeoutsConfig>,

    /// Request size limits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<LimitsConfig>,

    /// Logging configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OllamaConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Model used for image extraction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vision_model: Option<String>,
    /// Model used for cross-document comparison
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_model: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeoutsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discrepancy_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_upload_bytes: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Directory for the rolling JSON log file; console only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
}

// ---------------------------------------------------------------------------
// Resolved accessors
// ---------------------------------------------------------------------------

impl IntakeConfig {
    pub fn bind_address(&self) -> &str {
        self.server
            .as_ref()
            .and_then(|s| s.bind_address.as_deref())
            .unwrap_or(DEFAULT_BIND_ADDRESS)
    }

    pub fn port(&self) -> u16 {
        self.server.as_ref().and_then(|s| s.port).unwrap_or(DEFAULT_PORT)
    }

    pub fn base_url(&self) -> &str {
        self.ollama
            .as_ref()
            .and_then(|o| o.base_url.as_deref())
            .unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn vision_model(&self) -> &str {
        self.ollama
            .as_ref()
            .and_then(|o| o.vision_model.as_deref())
            .unwrap_or(DEFAULT_VISION_MODEL)
    }

    pub fn text_model(&self) -> &str {
        self.ollama
            .as_ref()
            .and_then(|o| o.text_model.as_deref())
            .unwrap_or(DEFAULT_TEXT_MODEL)
    }

    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_millis(
            self.timeouts
                .as_ref()
                .and_then(|t| t.extraction_ms)
                .unwrap_or(DEFAULT_EXTRACTION_TIMEOUT_MS),
        )
    }

    pub fn discrepancy_timeout(&self) -> Duration {
        Duration::from_millis(
            self.timeouts
                .as_ref()
                .and_then(|t| t.discrepancy_ms)
                .unwrap_or(DEFAULT_DISCREPANCY_TIMEOUT_MS),
        )
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.limits
            .as_ref()
            .and_then(|l| l.max_upload_bytes)
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES)
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_dir(&self) -> Option<&Path> {
        self.logging.as_ref().and_then(|l| l.dir.as_deref())
    }

    pub fn log_json(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_yaml() {
        let yaml = r#"
server:
  port: 8088
ollama:
  baseUrl: http://gpu-box:11434
  visionModel: llava
timeouts:
  extractionMs: 90000
"#;
        let cfg: IntakeConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.port(), 8088);
        assert_eq!(cfg.bind_address(), DEFAULT_BIND_ADDRESS);
        assert_eq!(cfg.base_url(), "http://gpu-box:11434");
        assert_eq!(cfg.vision_model(), "llava");
        assert_eq!(cfg.text_model(), DEFAULT_TEXT_MODEL);
        assert_eq!(cfg.extraction_timeout(), Duration::from_secs(90));
        assert_eq!(
            cfg.discrepancy_timeout(),
            Duration::from_millis(DEFAULT_DISCREPANCY_TIMEOUT_MS)
        );
    }

    #[test]
    fn empty_config_resolves_to_defaults() {
        let cfg = IntakeConfig::default();
        assert_eq!(cfg.port(), 3000);
        assert_eq!(cfg.max_upload_bytes(), 20 * 1024 * 1024);
        assert!(cfg.log_dir().is_none());
        assert!(!cfg.log_json());
        assert!(cfg.discrepancy_timeout() < cfg.extraction_timeout());
    }
}
