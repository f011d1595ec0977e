use thiserror::Error;

/// A parsed value did not match the expected document or report shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("schema validation failed at '{path}': expected {expected}, got {actual}")]
pub struct SchemaValidationError {
    /// Dotted path to the offending field (`$` for the top-level value).
    pub path: String,
    pub expected: String,
    pub actual: String,
}

impl SchemaValidationError {
    pub fn new(
        path: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {s})")).unwrap_or_default()
}

/// Top-level error type for the document-analysis pipeline.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("unsupported file type '{media_type}': only image files can be analyzed")]
    UnsupportedFileType { media_type: String },

    #[error("at least {required} analyzed documents are required for comparison, got {provided}")]
    InsufficientInput { provided: usize, required: usize },

    #[error("no file provided")]
    MissingFile,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("model gateway unavailable{}: {body}", status_suffix(.status))]
    GatewayUnavailable { status: Option<u16>, body: String },

    #[error("model gateway timed out after {timeout_ms} ms")]
    GatewayTimeout { timeout_ms: u64 },

    #[error(transparent)]
    SchemaValidation(#[from] SchemaValidationError),
}

impl IntakeError {
    /// Precondition failures detected before any model call.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            IntakeError::UnsupportedFileType { .. }
                | IntakeError::InsufficientInput { .. }
                | IntakeError::MissingFile
                | IntakeError::InvalidRequest(_)
        )
    }

    /// Short machine-readable label, used in logs and analysis events.
    pub fn kind(&self) -> &'static str {
        match self {
            IntakeError::UnsupportedFileType { .. } => "unsupported_file_type",
            IntakeError::InsufficientInput { .. } => "insufficient_input",
            IntakeError::MissingFile => "missing_file",
            IntakeError::InvalidRequest(_) => "invalid_request",
            IntakeError::GatewayUnavailable { .. } => "gateway_unavailable",
            IntakeError::GatewayTimeout { .. } => "gateway_timeout",
            IntakeError::SchemaValidation(_) => "schema_validation",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_names_path_and_types() {
        let err = SchemaValidationError::new("hasDiscrepancies", "boolean", "string \"maybe\"");
        let msg = err.to_string();
        assert!(msg.contains("hasDiscrepancies"));
        assert!(msg.contains("expected boolean"));
    }

    #[test]
    fn gateway_unavailable_includes_status_when_known() {
        let err = IntakeError::GatewayUnavailable {
            status: Some(503),
            body: "model loading".into(),
        };
        assert_eq!(
            err.to_string(),
            "model gateway unavailable (status 503): model loading"
        );

        let err = IntakeError::GatewayUnavailable {
            status: None,
            body: "connection refused".into(),
        };
        assert_eq!(err.to_string(), "model gateway unavailable: connection refused");
    }

    #[test]
    fn preconditions_are_client_errors() {
        assert!(IntakeError::MissingFile.is_client_error());
        assert!(IntakeError::InsufficientInput { provided: 1, required: 2 }.is_client_error());
        assert!(!IntakeError::GatewayTimeout { timeout_ms: 10 }.is_client_error());
        let schema: IntakeError = SchemaValidationError::new("$", "object", "null").into();
        assert!(!schema.is_client_error());
        assert_eq!(schema.kind(), "schema_validation");
    }
}
