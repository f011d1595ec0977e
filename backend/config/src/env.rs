//! Environment handling for config values.
//!
//! Two mechanisms:
//! - `${VAR_NAME}` substitution in string values, resolved at load time.
//!   Only uppercase `[A-Z_][A-Z0-9_]*` names are matched; `$${VAR}` escapes
//!   to a literal `${VAR}`.
//! - Well-known override variables (`OLLAMA_BASE_URL`, `OLLAMA_MODEL`, ...)
//!   that replace individual settings after the file is parsed.

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use crate::schema::{IntakeConfig, LoggingConfig, OllamaConfig, ServerConfig};

/// Matches `${VAR}` and the escaped form `$${VAR}`.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$?\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

pub const ENV_BASE_URL: &str = "OLLAMA_BASE_URL";
pub const ENV_VISION_MODEL: &str = "OLLAMA_MODEL";
pub const ENV_TEXT_MODEL: &str = "OLLAMA_TEXT_MODEL";
pub const ENV_BIND: &str = "LEGALLENS_BIND";
pub const ENV_PORT: &str = "LEGALLENS_PORT";
pub const ENV_LOG: &str = "RUST_LOG";

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references in a config JSON value tree.
///
/// Walks the entire value tree recursively; only string leaves are processed.
/// Returns an error if any referenced env var is not set or is empty.
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => {
            let result: Result<Vec<_>> = arr
                .iter()
                .enumerate()
                .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
                .collect();
            Ok(Value::Array(result?))
        }
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                result.insert(k.clone(), substitute_value(v, env, &child_path)?);
            }
            Ok(Value::Object(result))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut missing: Option<MissingEnvVarError> = None;
    let substituted = ENV_VAR_PATTERN.replace_all(s, |caps: &regex::Captures| {
        let var_name = &caps[1];
        if caps[0].starts_with("$$") {
            return format!("${{{var_name}}}");
        }
        match env.get(var_name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                missing.get_or_insert_with(|| MissingEnvVarError {
                    var_name: var_name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    if let Some(err) = missing {
        bail!(err);
    }
    Ok(substituted.into_owned())
}

/// Apply the well-known override variables from `env`. Empty values are ignored.
pub fn apply_env_overrides_with(
    mut config: IntakeConfig,
    env: &HashMap<String, String>,
) -> Result<IntakeConfig> {
    let get = |key: &str| env.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

    if let Some(url) = get(ENV_BASE_URL) {
        debug!(var = ENV_BASE_URL, "Overriding model service URL from env");
        config.ollama.get_or_insert_with(OllamaConfig::default).base_url = Some(url.to_string());
    }
    if let Some(model) = get(ENV_VISION_MODEL) {
        config.ollama.get_or_insert_with(OllamaConfig::default).vision_model =
            Some(model.to_string());
    }
    if let Some(model) = get(ENV_TEXT_MODEL) {
        config.ollama.get_or_insert_with(OllamaConfig::default).text_model =
            Some(model.to_string());
    }
    if let Some(bind) = get(ENV_BIND) {
        config.server.get_or_insert_with(ServerConfig::default).bind_address =
            Some(bind.to_string());
    }
    if let Some(port) = get(ENV_PORT) {
        let port: u16 = port
            .parse()
            .with_context(|| format!("{ENV_PORT} must be a port number, got '{port}'"))?;
        config.server.get_or_insert_with(ServerConfig::default).port = Some(port);
    }
    if let Some(level) = get(ENV_LOG) {
        config.logging.get_or_insert_with(LoggingConfig::default).level = Some(level.to_string());
    }

    Ok(config)
}
