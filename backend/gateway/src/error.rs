//! Mapping from pipeline errors to HTTP responses.
//!
//! Every failure body is a JSON object with an `error` message. Precondition
//! failures are 4xx; model service and output-contract failures are 500.

use std::time::Duration;

use axum::{
    extract::multipart::MultipartError,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use legallens_core::IntakeError;
use serde_json::{json, Value};

pub const NO_FILE_MESSAGE: &str = "No file provided";
pub const NOT_AN_IMAGE_MESSAGE: &str = "Only image files are supported for analysis.";
pub const NO_DOCUMENTS_MESSAGE: &str = "No documents provided";

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: Value,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

fn timeout_message(timeout_ms: u64) -> String {
    let secs = Duration::from_millis(timeout_ms).as_secs_f64();
    format!("Model service did not respond within {secs} seconds")
}

impl From<IntakeError> for ApiError {
    fn from(err: IntakeError) -> Self {
        match &err {
            IntakeError::UnsupportedFileType { media_type } => Self {
                status: StatusCode::BAD_REQUEST,
                body: json!({ "error": NOT_AN_IMAGE_MESSAGE, "fileType": media_type }),
            },
            IntakeError::MissingFile => Self::bad_request(NO_FILE_MESSAGE),
            IntakeError::GatewayTimeout { timeout_ms } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                timeout_message(*timeout_ms),
            ),
            _ if err.is_client_error() => Self::bad_request(err.to_string()),
            _ => Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::new(err.status(), err.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
