use std::time::{Duration, Instant};

use legallens_core::{
    parse_recovered, validate_document, validate_report, DiscrepancyReport, GenerateRequest,
    IntakeError, NamedDocument, Outcome, ResponseFormat, UnparsedOutput,
};
use legallens_logging::{AnalysisEvent, EventLogger};
use legallens_model::ModelClient;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::prompts::discrepancy_prompt;
use crate::AnalysisConfig;

const FLOW: &str = "discrepancy";

/// Fewest documents a comparison makes sense for.
pub const MIN_DOCUMENTS: usize = 2;

/// A document as submitted by a client: the analysis may be missing when the
/// file was never analyzed (or its analysis failed).
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentEntry {
    pub name: String,
    #[serde(default)]
    pub analysis: Option<Value>,
}

/// Validate submitted entries into documents and enforce the minimum count.
///
/// Entries without an analysis are skipped, and so are entries whose analysis
/// is not a document (a degraded extraction result, say): one failed
/// extraction must not block comparing the rest.
pub fn prepare_documents(entries: &[DocumentEntry]) -> Result<Vec<NamedDocument>, IntakeError> {
    let mut documents = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some(analysis) = entry.analysis.as_ref().filter(|v| !v.is_null()) else {
            debug!(name = %entry.name, "Skipping document without analysis");
            continue;
        };
        let analysis = match validate_document(analysis) {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!(name = %entry.name, error = %e, "Skipping document with unusable analysis");
                continue;
            }
        };
        documents.push(NamedDocument {
            name: entry.name.clone(),
            analysis,
        });
    }

    if documents.len() < MIN_DOCUMENTS {
        return Err(IntakeError::InsufficientInput {
            provided: documents.len(),
            required: MIN_DOCUMENTS,
        });
    }
    Ok(documents)
}

/// Asks the text model whether several extracted documents agree.
#[derive(Clone)]
pub struct DiscrepancyService {
    client: ModelClient,
    model: String,
    timeout: Duration,
}

impl DiscrepancyService {
    pub fn new(client: ModelClient, config: &AnalysisConfig) -> Self {
        Self {
            client,
            model: config.text_model.clone(),
            timeout: config.discrepancy_timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Compare `documents`.
    ///
    /// Fewer than two documents fail before the model is contacted. Output
    /// that is not JSON comes back as [`Outcome::Degraded`]; use
    /// [`Outcome::into_report`] for the fallback report.
    #[instrument(skip(self, documents), fields(documents = documents.len()))]
    pub async fn check(
        &self,
        documents: &[NamedDocument],
        request_id: &str,
    ) -> Result<Outcome<DiscrepancyReport>, IntakeError> {
        let result = self.run(documents, request_id).await;
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
        documents: &[NamedDocument],
        request_id: &str,
    ) -> Result<Outcome<DiscrepancyReport>, IntakeError> {
        if documents.len() < MIN_DOCUMENTS {
            return Err(IntakeError::InsufficientInput {
                provided: documents.len(),
                required: MIN_DOCUMENTS,
            });
        }

        let generate = GenerateRequest::new(&self.model, discrepancy_prompt(documents))
            .with_format(ResponseFormat::Json);

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
                warn!(error = %e, "Discrepancy output was not JSON; falling back");
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

        let report = validate_report(&value)?;
        info!(
            has_discrepancies = report.has_discrepancies,
            discrepancies = report.discrepancy_count(),
            "Discrepancy check complete"
        );
        EventLogger::log_event(
            request_id,
            AnalysisEvent::Parsed {
                flow: FLOW.into(),
                summary: format!(
                    "has_discrepancies={} count={}",
                    report.has_discrepancies,
                    report.discrepancy_count()
                ),
            },
        );
        Ok(Outcome::Success(report))
    }
}
