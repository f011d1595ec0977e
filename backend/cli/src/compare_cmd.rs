//! CLI Compare Command
//!
//! Runs the discrepancy check over analyses saved from `legallens analyze`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use legallens_analysis::{prepare_documents, DiscrepancyService, DocumentEntry};
use serde_json::Value;
use uuid::Uuid;

use crate::terminal_output::{note_info, note_warn, render_report};

/// Interpret one saved file: either `{name?, analysis}` or a bare document.
/// The name defaults to the file stem.
pub fn entry_from_json(stem: &str, value: Value) -> DocumentEntry {
    match value {
        Value::Object(mut map) if map.contains_key("analysis") => {
            let name = map
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| stem.to_string());
            DocumentEntry {
                name,
                analysis: map.remove("analysis"),
            }
        }
        other => DocumentEntry {
            name: stem.to_string(),
            analysis: Some(other),
        },
    }
}

async fn read_entry(path: &Path) -> Result<DocumentEntry> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(entry_from_json(&stem, value))
}

pub async fn run(service: &DiscrepancyService, files: &[PathBuf], table: bool) -> Result<()> {
    let mut entries = Vec::with_capacity(files.len());
    for path in files {
        entries.push(read_entry(path).await?);
    }

    let documents = prepare_documents(&entries)?;
    if documents.len() < entries.len() {
        note_warn(&format!(
            "Skipped {} file(s) without a usable analysis",
            entries.len() - documents.len()
        ));
    }
    note_info(&format!("Comparing {} documents", documents.len()));

    let outcome = service
        .check(&documents, &Uuid::new_v4().to_string())
        .await
        .context("Discrepancy check failed")?;
    if outcome.is_degraded() {
        note_warn("The model did not answer in JSON; showing the fallback report");
    }

    let report = outcome.into_report();
    if table {
        print!("{}", render_report(&report));
    } else {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wrapped_entry_keeps_its_name() {
        let entry = entry_from_json(
            "a",
            json!({"name": "passport.png", "analysis": {"documentType": "passport"}}),
        );
        assert_eq!(entry.name, "passport.png");
        assert_eq!(entry.analysis, Some(json!({"documentType": "passport"})));
    }

    #[test]
    fn wrapped_entry_without_name_uses_stem() {
        let entry = entry_from_json("visa", json!({"analysis": null}));
        assert_eq!(entry.name, "visa");
        assert_eq!(entry.analysis, Some(Value::Null));
    }

    #[test]
    fn bare_document_uses_stem() {
        let entry = entry_from_json("visa", json!({"documentType": "visa", "fields": {}}));
        assert_eq!(entry.name, "visa");
        assert_eq!(entry.analysis.unwrap()["documentType"], "visa");
    }

    #[tokio::test]
    async fn reads_saved_analysis_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("passport.json");
        tokio::fs::write(&path, r#"{"documentType": "passport", "fields": {"name": "John"}}"#)
            .await
            .unwrap();
        let entry = read_entry(&path).await.unwrap();
        assert_eq!(entry.name, "passport");

        let bad = dir.path().join("bad.json");
        tokio::fs::write(&bad, "not json").await.unwrap();
        assert!(read_entry(&bad).await.is_err());
    }
}
