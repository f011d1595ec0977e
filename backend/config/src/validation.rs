//! Config validation: deep schema checks with user-friendly error messages.

use crate::schema::IntakeConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &IntakeConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_server(config, &mut report);
    validate_ollama(config, &mut report);
    validate_timeouts(config, &mut report);
    validate_limits(config, &mut report);
    report
}

fn validate_server(config: &IntakeConfig, report: &mut ValidationReport) {
    let Some(server) = &config.server else { return };
    if let Some(bind) = &server.bind_address {
        if bind.trim().is_empty() {
            report.error("server.bindAddress", "bindAddress cannot be empty");
        }
    }
    if let Some(port) = server.port {
        if port < 1024 && port != 80 && port != 443 && port != 0 {
            report.warn(
                "server.port",
                format!("Port {port} requires elevated privileges; consider using a port >= 1024"),
            );
        }
    }
}

fn validate_ollama(config: &IntakeConfig, report: &mut ValidationReport) {
    let Some(ollama) = &config.ollama else { return };
    if let Some(url) = &ollama.base_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            report.error(
                "ollama.baseUrl",
                format!("'{url}' must start with http:// or https://"),
            );
        }
    }
    for (path, model) in [
        ("ollama.visionModel", &ollama.vision_model),
        ("ollama.textModel", &ollama.text_model),
    ] {
        if model.as_deref().is_some_and(|m| m.trim().is_empty()) {
            report.error(path, "Model name cannot be empty");
        }
    }
}

fn validate_timeouts(config: &IntakeConfig, report: &mut ValidationReport) {
    let Some(timeouts) = &config.timeouts else { return };
    if timeouts.extraction_ms == Some(0) {
        report.error("timeouts.extractionMs", "extractionMs must be > 0");
    }
    if timeouts.discrepancy_ms == Some(0) {
        report.error("timeouts.discrepancyMs", "discrepancyMs must be > 0");
    }
    if let (Some(extraction), Some(discrepancy)) = (timeouts.extraction_ms, timeouts.discrepancy_ms)
    {
        if discrepancy >= extraction {
            report.warn(
                "timeouts.discrepancyMs",
                format!(
                    "discrepancyMs ({discrepancy}) is not shorter than extractionMs ({extraction}); \
                     text comparison normally finishes well before image extraction"
                ),
            );
        }
    }
}

fn validate_limits(config: &IntakeConfig, report: &mut ValidationReport) {
    let Some(limits) = &config.limits else { return };
    if limits.max_upload_bytes == Some(0) {
        report.error("limits.maxUploadBytes", "maxUploadBytes must be > 0");
    }
}
