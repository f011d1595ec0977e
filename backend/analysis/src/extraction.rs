use std::time::{Duration, Instant};

use base64::{engine::general_purpose::STANDARD, Engine};
use legallens_core::{
    parse_recovered, validate_document, Document, GenerateRequest, IntakeError, Outcome,
    UnparsedOutput,
};
use legallens_logging::{AnalysisEvent, EventLogger};
use legallens_model::ModelClient;
use tracing::{info, instrument, warn};

use crate::media_type::is_image;
use crate::prompts::EXTRACTION_PROMPT;
use crate::AnalysisConfig;

const FLOW: &str = "extraction";

/// One uploaded file submitted for extraction. Not retained after the call.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisRequest<'a> {
    pub file_name: &'a str,
    pub media_type: &'a str,
    pub bytes: &'a [u8],
}

/// Turns one image into a validated [`Document`] via the vision model.
#[derive(Clone)]
pub struct ExtractionService {
    client: ModelClient,
    model: String,
    timeout: Duration,
}

impl ExtractionService {
    pub fn new(client: ModelClient, config: &AnalysisConfig) -> Self {
        Self {
            client,
            model: config.vision_model.clone(),
            timeout: config.extraction_timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Analyze one file.
    ///
    /// Non-image media types fail before the model is contacted. Output that
    /// is not JSON comes back as [`Outcome::Degraded`]; JSON of the wrong
    /// shape is a hard [`IntakeError::SchemaValidation`].
    #[instrument(skip(self, request), fields(file = %request.file_name, media_type = %request.media_type))]
    pub async fn extract(
        &self,
        request: AnalysisRequest<'_>,
        request_id: &str,
    ) -> Result<Outcome<Document>, IntakeError> {
        let result = self.run(request, request_id).await;
        if let Err(e) = &result {
            EventLogger::log_event(
                request_id,
                AnalysisEvent::Failed {
                    flow: FLOW.into(),
                    kind: e.kind().into(),
                    error_msg: e.to_string(),
                },
            );
        }
        result
    }

    async fn run(
        &self,
        request: AnalysisRequest<'_>,
        request_id: &str,
    ) -> Result<Outcome<Document>, IntakeError> {
        if !is_image(request.media_type) {
            return Err(IntakeError::UnsupportedFileType {
                media_type: request.media_type.to_string(),
            });
        }
        if request.bytes.is_empty() {
            return Err(IntakeError::InvalidRequest(format!(
                "file '{}' is empty",
                request.file_name
            )));
        }

        let generate = GenerateRequest::new(&self.model, EXTRACTION_PROMPT)
            .with_images(vec![STANDARD.encode(request.bytes)]);

        let start = Instant::now();
        let raw = self.client.generate(&generate, self.timeout).await?;
        EventLogger::log_event(
            request_id,
            AnalysisEvent::ModelCall {
                flow: FLOW.into(),
                model: self.model.clone(),
                latency_ms: start.elapsed().as_millis() as u64,
            },
        );

        let value = match parse_recovered(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Extraction output was not JSON; returning degraded result");
                EventLogger::log_event(
                    request_id,
                    AnalysisEvent::Degraded {
                        flow: FLOW.into(),
                        raw_preview: raw.clone(),
                        parse_error: e.to_string(),
                    },
                );
                return Ok(Outcome::Degraded(UnparsedOutput::new(raw, e)));
            }
        };

        let document = validate_document(&value)?;
        info!(
            document_type = %document.document_type,
            fields = document.fields.len(),
            "Document extracted"
        );
        EventLogger::log_event(
            request_id,
            AnalysisEvent::Parsed {
                flow: FLOW.into(),
                summary: format!(
                    "{} with {} fields",
                    document.document_type,
                    document.fields.len()
                ),
            },
        );
        Ok(Outcome::Success(document))
    }
}
