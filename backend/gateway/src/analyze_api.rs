//! `POST /api/analyze`: single-image extraction.

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    response::{IntoResponse, Response},
    Json,
};
use legallens_analysis::{detect_media_type, AnalysisRequest};
use legallens_core::{IntakeError, Outcome};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::server::GatewayState;

/// Multipart field carrying the upload.
const FILE_FIELD: &str = "file";

struct Upload {
    file_name: String,
    media_type: String,
    bytes: Vec<u8>,
}

async fn read_upload(multipart: &mut Multipart) -> Result<Upload, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let media_type = match field.content_type() {
            Some(content_type) => content_type.to_string(),
            None => detect_media_type(Path::new(&file_name)).to_string(),
        };
        let bytes = field.bytes().await?.to_vec();
        return Ok(Upload {
            file_name,
            media_type,
            bytes,
        });
    }
    Err(IntakeError::MissingFile.into())
}

/// Handler for `POST /api/analyze`.
///
/// Returns the extracted document, or the degraded `{failed, error,
/// rawResponse}` object when the model answered in free text.
pub async fn analyze(
    State(state): State<Arc<GatewayState>>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let request_id = Uuid::new_v4().to_string();
    let upload = read_upload(&mut multipart).await?;
    info!(
        request_id = %request_id,
        file = %upload.file_name,
        media_type = %upload.media_type,
        size = upload.bytes.len(),
        "Analyze request"
    );

    let request = AnalysisRequest {
        file_name: &upload.file_name,
        media_type: &upload.media_type,
        bytes: &upload.bytes,
    };
    let outcome = state
        .extraction
        .extract(request, &request_id)
        .await
        .inspect_err(|e| warn!(request_id = %request_id, error = %e, "Analyze request failed"))?;

    Ok(match outcome {
        Outcome::Success(document) => Json(document).into_response(),
        Outcome::Degraded(unparsed) => Json(unparsed).into_response(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use legallens_analysis::AnalysisConfig;
    use legallens_model::MockGateway;
    use reqwest::multipart::{Form, Part};
    use reqwest::StatusCode;
    use serde_json::{json, Value};

    use crate::error::{NOT_AN_IMAGE_MESSAGE, NO_FILE_MESSAGE};
    use crate::server::test_support::spawn_gateway;

    const LIMIT: usize = 1024 * 1024;

    fn upload(name: &str, mime: Option<&str>, bytes: &[u8]) -> Form {
        let mut part = Part::bytes(bytes.to_vec()).file_name(name.to_string());
        if let Some(mime) = mime {
            part = part.mime_str(mime).unwrap();
        }
        Form::new().part("file", part)
    }

    async fn post(base: &str, form: Form) -> (StatusCode, Value) {
        let resp = reqwest::Client::new()
            .post(format!("{base}/api/analyze"))
            .multipart(form)
            .send()
            .await
            .unwrap();
        let status = resp.status();
        (status, resp.json().await.unwrap())
    }

    #[tokio::test]
    async fn image_upload_returns_document() {
        let mock = Arc::new(MockGateway::with_response(
            "```json\n{\"documentType\":\"passport\",\"fields\":{\"name\":\"John\"}}\n```",
        ));
        let base = spawn_gateway(mock.clone(), AnalysisConfig::default(), LIMIT).await;

        let (status, body) = post(&base, upload("passport.png", Some("image/png"), b"png")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"documentType": "passport", "fields": {"name": "John"}})
        );
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn media_type_falls_back_to_extension() {
        let mock = Arc::new(MockGateway::with_response("{\"documentType\":\"visa\"}"));
        let base = spawn_gateway(mock.clone(), AnalysisConfig::default(), LIMIT).await;

        let (status, body) = post(&base, upload("visa.JPG", None, b"jpg")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["documentType"], "visa");
    }

    #[tokio::test]
    async fn non_image_is_rejected_with_file_type() {
        let mock = Arc::new(MockGateway::new());
        let base = spawn_gateway(mock.clone(), AnalysisConfig::default(), LIMIT).await;

        let (status, body) =
            post(&base, upload("contract.pdf", Some("application/pdf"), b"%PDF")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"error": NOT_AN_IMAGE_MESSAGE, "fileType": "application/pdf"})
        );
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_file_field_is_bad_request() {
        let mock = Arc::new(MockGateway::new());
        let base = spawn_gateway(mock.clone(), AnalysisConfig::default(), LIMIT).await;

        let (status, body) = post(&base, Form::new().text("note", "no file here")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": NO_FILE_MESSAGE}));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn free_text_answer_is_a_degraded_success() {
        let mock = Arc::new(MockGateway::with_response("I think this is a passport."));
        let base = spawn_gateway(mock, AnalysisConfig::default(), LIMIT).await;

        let (status, body) = post(&base, upload("p.png", Some("image/png"), b"png")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["failed"], true);
        assert_eq!(body["rawResponse"], "I think this is a passport.");
        assert!(body["error"].as_str().unwrap().contains("not valid JSON"));
    }

    #[tokio::test]
    async fn slow_model_is_a_server_error_naming_the_budget() {
        let mock = Arc::new(MockGateway::new().with_delay(Duration::from_secs(10)));
        let config = AnalysisConfig {
            extraction_timeout: Duration::from_millis(50),
            ..AnalysisConfig::default()
        };
        let base = spawn_gateway(mock, config, LIMIT).await;

        let (status, body) = post(&base, upload("p.png", Some("image/png"), b"png")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body["error"],
            "Model service did not respond within 0.05 seconds"
        );
    }

    #[tokio::test]
    async fn wrong_shape_is_a_server_error() {
        let mock = Arc::new(MockGateway::with_response("{\"fields\":{}}"));
        let base = spawn_gateway(mock, AnalysisConfig::default(), LIMIT).await;

        let (status, body) = post(&base, upload("p.png", Some("image/png"), b"png")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("documentType"));
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected() {
        let mock = Arc::new(MockGateway::new());
        let base = spawn_gateway(mock.clone(), AnalysisConfig::default(), 1024).await;

        let (status, _) = post(&base, upload("big.png", Some("image/png"), &[0u8; 8192])).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(mock.call_count(), 0);
    }
}
