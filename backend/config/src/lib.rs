//! `legallens-config` — LegalLens runtime configuration management.
//!
//! Provides:
//! - Typed config schema (server, model service, deadlines, limits, logging)
//! - YAML loading from the config directory
//! - `${ENV_VAR}` substitution and well-known env overrides
//! - Default value application
//! - Validation with errors and warnings

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{apply_env_overrides_with, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_config};
pub use schema::IntakeConfig;
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Load, substitute env vars, apply overrides and defaults, and validate.
///
/// This is the main entry point for loading a config at runtime.
pub async fn load_and_prepare(path: &Path) -> Result<IntakeConfig> {
    load_and_prepare_with(path, &std::env::vars().collect()).await
}

/// [`load_and_prepare`] against an explicit environment.
pub async fn load_and_prepare_with(
    path: &Path,
    env: &HashMap<String, String>,
) -> Result<IntakeConfig> {
    let raw_config = load_config(path).await?;

    let value: Value = serde_json::to_value(&raw_config)
        .context("Failed to serialize config for processing")?;
    let value = resolve_env_vars_with(&value, env).context("Failed to resolve env vars in config")?;
    let config: IntakeConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let config = apply_env_overrides_with(config, env)?;
    let config = apply_all_defaults(config);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if let Some(first) = report.errors.into_iter().next() {
        bail!(first);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[tokio::test]
    async fn prepares_file_with_substitution_and_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());
        tokio::fs::write(
            &path,
            "ollama:\n  baseUrl: http://${MODEL_HOST}:11434\n  textModel: mistral\n",
        )
        .await
        .unwrap();

        let cfg = load_and_prepare_with(
            &path,
            &env(&[("MODEL_HOST", "gpu-box"), ("OLLAMA_TEXT_MODEL", "llama3.1:70b")]),
        )
        .await
        .unwrap();

        assert_eq!(cfg.base_url(), "http://gpu-box:11434");
        assert_eq!(cfg.text_model(), "llama3.1:70b");
        assert_eq!(cfg.vision_model(), defaults::DEFAULT_VISION_MODEL);
        assert_eq!(cfg.server.as_ref().and_then(|s| s.port), Some(defaults::DEFAULT_PORT));
    }

    #[tokio::test]
    async fn validation_errors_fail_the_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());
        tokio::fs::write(&path, "timeouts:\n  discrepancyMs: 0\n").await.unwrap();

        let err = load_and_prepare_with(&path, &HashMap::new()).await.unwrap_err();
        assert!(err.to_string().contains("timeouts.discrepancyMs"));
    }

    #[tokio::test]
    async fn missing_file_yields_full_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_and_prepare_with(&config_file_path(dir.path()), &HashMap::new())
            .await
            .unwrap();
        assert_eq!(cfg, apply_all_defaults(IntakeConfig::default()));
    }
}
