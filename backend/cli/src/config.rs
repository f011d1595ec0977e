use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use legallens_analysis::AnalysisConfig;
use legallens_config::{config_dir, config_file_path, load_and_prepare, IntakeConfig};

/// Config file to load: the `--config` flag, else the default location.
pub fn resolve_path(flag: Option<&Path>) -> PathBuf {
    flag.map(Path::to_path_buf)
        .unwrap_or_else(|| config_file_path(&config_dir()))
}

/// Load the runtime configuration.
pub async fn load(flag: Option<&Path>) -> Result<IntakeConfig> {
    let path = resolve_path(flag);
    load_and_prepare(&path)
        .await
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

/// Model names and deadlines handed to the analysis services.
pub fn analysis_config(config: &IntakeConfig) -> AnalysisConfig {
    AnalysisConfig {
        vision_model: config.vision_model().to_string(),
        text_model: config.text_model().to_string(),
        extraction_timeout: config.extraction_timeout(),
        discrepancy_timeout: config.discrepancy_timeout(),
    }
}

/// Listen address, with an optional port override from the command line.
pub fn listen_addr(config: &IntakeConfig, port: Option<u16>) -> Result<SocketAddr> {
    let port = port.unwrap_or_else(|| config.port());
    format!("{}:{}", config.bind_address(), port)
        .parse()
        .with_context(|| format!("Invalid bind address '{}'", config.bind_address()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use legallens_config::schema::{OllamaConfig, TimeoutsConfig};
    use std::time::Duration;

    #[test]
    fn maps_models_and_deadlines() {
        let cfg = IntakeConfig {
            ollama: Some(OllamaConfig {
                text_model: Some("mistral".into()),
                ..Default::default()
            }),
            timeouts: Some(TimeoutsConfig {
                extraction_ms: Some(45_000),
                discrepancy_ms: None,
            }),
            ..Default::default()
        };
        let analysis = analysis_config(&cfg);
        assert_eq!(analysis.text_model, "mistral");
        assert_eq!(analysis.vision_model, AnalysisConfig::default().vision_model);
        assert_eq!(analysis.extraction_timeout, Duration::from_secs(45));
        assert_eq!(
            analysis.discrepancy_timeout,
            AnalysisConfig::default().discrepancy_timeout
        );
    }

    #[test]
    fn port_flag_wins() {
        let addr = listen_addr(&IntakeConfig::default(), Some(8088)).unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:8088");
    }

    #[test]
    fn explicit_path_is_used_verbatim() {
        let path = resolve_path(Some(Path::new("/etc/legallens.yaml")));
        assert_eq!(path, PathBuf::from("/etc/legallens.yaml"));
    }
}
