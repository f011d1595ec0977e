//! Prompt text sent to the model service.

use std::fmt::Write;

use legallens_core::NamedDocument;

/// Instruction for single-image extraction.
pub const EXTRACTION_PROMPT: &str = r#"Analyze the document in this image.
Classify it into a document type (for example: passport, visa, identity card, driver license, invoice, bank statement, contract) and extract every visible field as key/value pairs, including names, numbers, dates, addresses and amounts.

Respond with JSON only, in exactly this shape:
{
  "documentType": "<document type>",
  "fields": {
    "<field name>": "<field value>"
  }
}

Field values must be strings, numbers or booleans. Do not nest objects."#;

const DISCREPANCY_INTRO: &str = "Analyze the following documents and identify any discrepancies, inconsistencies, or contradictions between them.";

const DISCREPANCY_SHAPE: &str = r#"Respond with JSON only, in exactly this shape:
{
  "hasDiscrepancies": true,
  "summary": "Overall assessment of document consistency",
  "discrepancies": [
    {
      "type": "contradiction|inconsistency|missing_info|format_mismatch",
      "description": "Detailed description of the discrepancy",
      "documentsInvolved": ["<document name>", "<document name>"],
      "severity": "high|medium|low",
      "field": "specific field name if applicable"
    }
  ],
  "confidence": "high|medium|low",
  "recommendations": [
    "Specific recommendation for resolving discrepancies"
  ]
}

Set "hasDiscrepancies" to false and "discrepancies" to [] when the documents are consistent.

Focus on:
- Contradictory information between documents
- Missing information in some documents
- Inconsistent formatting or standards
- Data quality issues
- Potential fraud indicators"#;

/// Build the comparison prompt embedding every document's name, type and fields.
pub fn discrepancy_prompt(documents: &[NamedDocument]) -> String {
    let mut prompt = String::with_capacity(1024 + documents.len() * 512);
    prompt.push_str(DISCREPANCY_INTRO);
    prompt.push_str("\n\nDocuments to analyze:\n");

    for (index, doc) in documents.iter().enumerate() {
        let analysis = &doc.analysis;
        let fields = serde_json::to_string_pretty(&analysis.fields)
            .unwrap_or_else(|_| "{}".to_string());
        let _ = write!(
            prompt,
            "\nDocument {}: {} ({})\nFields: {}\n",
            index + 1,
            doc.name,
            analysis.document_type,
            fields
        );
        if !analysis.extra.is_empty() {
            let extra = serde_json::to_string_pretty(&analysis.extra)
                .unwrap_or_else(|_| "{}".to_string());
            let _ = writeln!(prompt, "Other details: {extra}");
        }
    }

    prompt.push('\n');
    prompt.push_str(DISCREPANCY_SHAPE);
    prompt
}
