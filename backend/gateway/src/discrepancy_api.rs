//! `POST /api/analyze-discrepancies`: cross-document comparison.

use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use legallens_analysis::{prepare_documents, DocumentEntry};
use legallens_core::DiscrepancyReport;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{ApiError, NO_DOCUMENTS_MESSAGE};
use crate::server::GatewayState;

#[derive(Debug, Deserialize)]
pub struct DiscrepancyRequest {
    #[serde(default)]
    pub documents: Option<Vec<DocumentEntry>>,
}

/// Handler for `POST /api/analyze-discrepancies`.
///
/// Responds with the report itself; unparseable model output becomes the
/// low-confidence fallback report.
pub async fn analyze_discrepancies(
    State(state): State<Arc<GatewayState>>,
    payload: Result<Json<DiscrepancyRequest>, JsonRejection>,
) -> Result<Json<DiscrepancyReport>, ApiError> {
    let request_id = Uuid::new_v4().to_string();
    let Json(request) = payload?;
    let entries = request
        .documents
        .filter(|docs| !docs.is_empty())
        .ok_or_else(|| ApiError::bad_request(NO_DOCUMENTS_MESSAGE))?;

    let documents = prepare_documents(&entries)?;
    info!(
        request_id = %request_id,
        submitted = entries.len(),
        analyzed = documents.len(),
        "Discrepancy request"
    );

    let outcome = state
        .discrepancy
        .check(&documents, &request_id)
        .await
        .inspect_err(|e| warn!(request_id = %request_id, error = %e, "Discrepancy request failed"))?;

    Ok(Json(outcome.into_report()))
}
