//! CLI Analyze Command
//!
//! Runs extraction on a local image, the same way `POST /api/analyze` does.

use std::path::Path;

use anyhow::{Context, Result};
use legallens_analysis::{detect_media_type, AnalysisRequest, ExtractionService};
use legallens_core::Outcome;
use uuid::Uuid;

use crate::terminal_output::{note_info, note_warn, render_document};

pub async fn run(
    service: &ExtractionService,
    file: &Path,
    media_type: Option<&str>,
    table: bool,
) -> Result<()> {
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let media_type = media_type.unwrap_or_else(|| detect_media_type(file));
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());

    note_info(&format!(
        "Analyzing {file_name} ({media_type}, {} bytes)",
        bytes.len()
    ));
    let request = AnalysisRequest {
        file_name: &file_name,
        media_type,
        bytes: &bytes,
    };
    let outcome = service
        .extract(request, &Uuid::new_v4().to_string())
        .await
        .with_context(|| format!("Analysis of {file_name} failed"))?;

    match outcome {
        Outcome::Success(document) if table => print!("{}", render_document(&document)),
        Outcome::Success(document) => println!("{}", serde_json::to_string_pretty(&document)?),
        Outcome::Degraded(unparsed) => {
            note_warn("The model did not answer in JSON; printing its raw output");
            println!("{}", serde_json::to_string_pretty(&unparsed)?);
        }
    }
    Ok(())
}

