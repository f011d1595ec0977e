use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// A single extracted field value. Models are asked for flat key/value pairs,
/// so only JSON primitives are accepted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(Number),
    Text(String),
}

impl FieldValue {
    /// Convert a JSON value, returning `None` for null, arrays and objects.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(FieldValue::Bool(*b)),
            Value::Number(n) => Some(FieldValue::Number(n.clone())),
            Value::String(s) => Some(FieldValue::Text(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

/// The canonical extracted record for one uploaded image.
///
/// `extra` holds every top-level key the model returned besides
/// `documentType` and `fields`; it is preserved verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub document_type: String,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document {
    pub fn new(document_type: impl Into<String>) -> Self {
        Self {
            document_type: document_type.into(),
            fields: BTreeMap::new(),
            extra: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(key.into(), value);
        self
    }
}

/// A previously analyzed document submitted for comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedDocument {
    pub name: String,
    pub analysis: Document,
}

/// Category of a detected discrepancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscrepancyKind {
    Contradiction,
    Inconsistency,
    MissingInfo,
    FormatMismatch,
}

/// Severity of a single discrepancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// The model's self-reported confidence in a discrepancy report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl DiscrepancyKind {
    pub const VARIANTS: &'static [&'static str] =
        &["contradiction", "inconsistency", "missing_info", "format_mismatch"];
}

impl Severity {
    pub const VARIANTS: &'static [&'static str] = &["high", "medium", "low"];
}

impl Confidence {
    pub const VARIANTS: &'static [&'static str] = &["high", "medium", "low"];
}

/// One issue found across the compared documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discrepancy {
    #[serde(rename = "type")]
    pub kind: DiscrepancyKind,
    pub description: String,
    #[serde(default)]
    pub documents_involved: Vec<String>,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Result of comparing two or more documents.
///
/// Only `hasDiscrepancies` and `summary` are required; the richer fields stay
/// absent on output when the model did not supply them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscrepancyReport {
    pub has_discrepancies: bool,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discrepancies: Option<Vec<Discrepancy>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

pub const FALLBACK_SUMMARY: &str = "Analysis completed but response format was unexpected";
pub const FALLBACK_RECOMMENDATION: &str = "Review the raw response for detailed analysis";

impl DiscrepancyReport {
    /// Zero-discrepancy, low-confidence report used when the model's output
    /// could not be parsed. The raw text is kept for manual inspection.
    pub fn fallback(raw_response: impl Into<String>) -> Self {
        Self {
            has_discrepancies: false,
            summary: FALLBACK_SUMMARY.to_string(),
            discrepancies: Some(Vec::new()),
            confidence: Some(Confidence::Low),
            recommendations: Some(vec![FALLBACK_RECOMMENDATION.to_string()]),
            raw_response: Some(raw_response.into()),
        }
    }

    pub fn discrepancy_count(&self) -> usize {
        self.discrepancies.as_ref().map_or(0, Vec::len)
    }
}

/// Model output that could not be parsed as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnparsedOutput {
    /// Always `true`; lets clients tell a degraded result from a document.
    pub failed: bool,
    pub error: String,
    pub raw_response: String,
}

impl UnparsedOutput {
    pub fn new(raw_response: impl Into<String>, parse_error: impl fmt::Display) -> Self {
        Self {
            failed: true,
            error: format!("Model output was not valid JSON: {parse_error}"),
            raw_response: raw_response.into(),
        }
    }
}

/// Result of one analysis invocation that did not fail outright.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The model output parsed and validated.
    Success(T),
    /// The model output was not JSON; carried as data rather than an error.
    Degraded(UnparsedOutput),
}

impl<T> Outcome<T> {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded(_))
    }

    pub fn success(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Degraded(_) => None,
        }
    }
}

impl Outcome<DiscrepancyReport> {
    /// The report, or the fallback report when the output was not JSON.
    pub fn into_report(self) -> DiscrepancyReport {
        match self {
            Outcome::Success(report) => report,
            Outcome::Degraded(unparsed) => DiscrepancyReport::fallback(unparsed.raw_response),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn document_serializes_flat_with_extras() {
        let mut doc = Document::new("passport")
            .with_field("name", FieldValue::Text("John".into()))
            .with_field("age", FieldValue::Number(Number::from(42u64)));
        doc.extra.insert("summary".into(), json!("A passport"));

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value,
            json!({
                "documentType": "passport",
                "fields": {"age": 42, "name": "John"},
                "summary": "A passport"
            })
        );
    }

    #[test]
    fn fallback_report_is_low_confidence_and_empty() {
        let report = DiscrepancyReport::fallback("not json");
        assert!(!report.has_discrepancies);
        assert_eq!(report.discrepancy_count(), 0);
        assert_eq!(report.confidence, Some(Confidence::Low));
        assert_eq!(report.raw_response.as_deref(), Some("not json"));
    }

    #[test]
    fn unparsed_output_is_flagged() {
        let out = UnparsedOutput::new("hello", "expected value at line 1 column 1");
        let value = serde_json::to_value(&out).unwrap();
        assert_eq!(value["failed"], json!(true));
        assert_eq!(value["rawResponse"], json!("hello"));
    }
}
