//! Shape enforcement for parsed model output.
//!
//! Model completions are parsed into an untyped [`Value`] first and only become
//! typed after passing through the explicit rule tables below. Each rule names
//! a field, its accepted aliases, its kind and whether it is required.
//!
//! - Documents are open: keys without a rule pass through untouched.
//! - Enum fields never fail validation. Values outside the closed set are
//!   coerced to a conservative fallback and logged.
//! - `null` on an optional field counts as absent.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::SchemaValidationError;
use crate::types::{Confidence, DiscrepancyKind, DiscrepancyReport, Document, Severity};

/// The shape a single field must have.
#[derive(Debug, Clone, Copy)]
pub enum ValueKind {
    String,
    NonEmptyString,
    Bool,
    /// Object whose values are all strings, numbers or booleans.
    PrimitiveMap,
    StringList,
    /// Array of objects, each checked against the nested rules.
    ObjectList(&'static [FieldRule]),
    /// Closed set of lower-case labels; anything else becomes `fallback`.
    Enum {
        variants: &'static [&'static str],
        fallback: &'static str,
    },
}

impl ValueKind {
    fn expected(&self) -> String {
        match self {
            ValueKind::String => "string".into(),
            ValueKind::NonEmptyString => "non-empty string".into(),
            ValueKind::Bool => "boolean".into(),
            ValueKind::PrimitiveMap => "object of strings, numbers or booleans".into(),
            ValueKind::StringList => "array of strings".into(),
            ValueKind::ObjectList(_) => "array of objects".into(),
            ValueKind::Enum { variants, .. } => format!("one of {}", variants.join("|")),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub kind: ValueKind,
    pub required: bool,
}

impl FieldRule {
    pub const fn required(name: &'static str, kind: ValueKind) -> Self {
        Self { name, aliases: &[], kind, required: true }
    }

    pub const fn optional(name: &'static str, kind: ValueKind) -> Self {
        Self { name, aliases: &[], kind, required: false }
    }

    pub const fn aliased(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }
}

pub const DOCUMENT_RULES: &[FieldRule] = &[
    FieldRule::required("documentType", ValueKind::NonEmptyString).aliased(&["document_type"]),
    FieldRule::optional("fields", ValueKind::PrimitiveMap).aliased(&["keyFields", "key_fields"]),
];

pub const DISCREPANCY_RULES: &[FieldRule] = &[
    FieldRule::optional(
        "type",
        ValueKind::Enum { variants: DiscrepancyKind::VARIANTS, fallback: "inconsistency" },
    ),
    FieldRule::required("description", ValueKind::String),
    FieldRule::optional("documentsInvolved", ValueKind::StringList)
        .aliased(&["documents_involved"]),
    FieldRule::optional(
        "severity",
        ValueKind::Enum { variants: Severity::VARIANTS, fallback: "low" },
    ),
    FieldRule::optional("field", ValueKind::String),
];

pub const REPORT_RULES: &[FieldRule] = &[
    FieldRule::required("hasDiscrepancies", ValueKind::Bool).aliased(&["has_discrepancies"]),
    FieldRule::required("summary", ValueKind::String),
    FieldRule::optional("discrepancies", ValueKind::ObjectList(DISCREPANCY_RULES)),
    FieldRule::optional(
        "confidence",
        ValueKind::Enum { variants: Confidence::VARIANTS, fallback: "low" },
    ),
    FieldRule::optional("recommendations", ValueKind::StringList),
    FieldRule::optional("rawResponse", ValueKind::String).aliased(&["raw_response"]),
];

/// Validate a parsed value as a [`Document`].
pub fn validate_document(value: &Value) -> Result<Document, SchemaValidationError> {
    let normalized = check_object(value, "", DOCUMENT_RULES)?;
    into_typed(normalized, "document")
}

/// Validate a parsed value as a [`DiscrepancyReport`].
///
/// A report listing discrepancies always has `hasDiscrepancies == true`.
pub fn validate_report(value: &Value) -> Result<DiscrepancyReport, SchemaValidationError> {
    let normalized = check_object(value, "", REPORT_RULES)?;
    let mut report: DiscrepancyReport = into_typed(normalized, "discrepancy report")?;
    if !report.has_discrepancies && report.discrepancy_count() > 0 {
        warn!(
            count = report.discrepancy_count(),
            "Report lists discrepancies but hasDiscrepancies=false; correcting"
        );
        report.has_discrepancies = true;
    }
    Ok(report)
}

fn into_typed<T: DeserializeOwned>(
    normalized: Map<String, Value>,
    what: &str,
) -> Result<T, SchemaValidationError> {
    serde_json::from_value(Value::Object(normalized))
        .map_err(|e| SchemaValidationError::new("$", what, e.to_string()))
}

fn join_path(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{parent}.{child}")
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".into(),
        Value::Bool(b) => format!("boolean {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("string {s:?}"),
        Value::Array(_) => "array".into(),
        Value::Object(_) => "object".into(),
    }
}

/// Check `value` against `rules`, returning a copy with aliases renamed to
/// their canonical names and enum values coerced. Keys without a rule are kept.
fn check_object(
    value: &Value,
    path: &str,
    rules: &[FieldRule],
) -> Result<Map<String, Value>, SchemaValidationError> {
    let Value::Object(input) = value else {
        let at = if path.is_empty() { "$" } else { path };
        return Err(SchemaValidationError::new(at, "object", describe(value)));
    };
    let mut out = input.clone();

    for rule in rules {
        if !out.contains_key(rule.name) {
            if let Some(alias) = rule.aliases.iter().find(|a| out.contains_key(**a)) {
                if let Some(v) = out.remove(*alias) {
                    out.insert(rule.name.to_string(), v);
                }
            }
        }

        let field_path = join_path(path, rule.name);
        match out.get(rule.name) {
            None | Some(Value::Null) => {
                if rule.required {
                    let actual = if out.contains_key(rule.name) { "null" } else { "missing" };
                    return Err(SchemaValidationError::new(
                        field_path,
                        rule.kind.expected(),
                        actual,
                    ));
                }
                out.remove(rule.name);
                if let ValueKind::Enum { fallback, .. } = rule.kind {
                    if path_is_nested(path) {
                        out.insert(rule.name.to_string(), Value::String(fallback.to_string()));
                    }
                }
            }
            Some(field) => {
                let checked = check_field(field, &field_path, &rule.kind)?;
                out.insert(rule.name.to_string(), checked);
            }
        }
    }

    Ok(out)
}

/// Enum fields inside list items are mandatory in the typed model, so an
/// absent label there is filled with the fallback. Top-level enums stay absent.
fn path_is_nested(path: &str) -> bool {
    path.ends_with(']')
}

fn check_field(
    value: &Value,
    path: &str,
    kind: &ValueKind,
) -> Result<Value, SchemaValidationError> {
    let mismatch = || SchemaValidationError::new(path, kind.expected(), describe(value));

    match kind {
        ValueKind::String => match value {
            Value::String(_) => Ok(value.clone()),
            _ => Err(mismatch()),
        },
        ValueKind::NonEmptyString => match value {
            Value::String(s) if !s.trim().is_empty() => Ok(value.clone()),
            _ => Err(mismatch()),
        },
        ValueKind::Bool => match value {
            Value::Bool(_) => Ok(value.clone()),
            _ => Err(mismatch()),
        },
        ValueKind::PrimitiveMap => {
            let Value::Object(map) = value else {
                return Err(mismatch());
            };
            for (key, entry) in map {
                if !matches!(entry, Value::String(_) | Value::Number(_) | Value::Bool(_)) {
                    return Err(SchemaValidationError::new(
                        join_path(path, key),
                        "string, number or boolean",
                        describe(entry),
                    ));
                }
            }
            Ok(value.clone())
        }
        ValueKind::StringList => {
            let Value::Array(items) = value else {
                return Err(mismatch());
            };
            for (i, item) in items.iter().enumerate() {
                if !item.is_string() {
                    return Err(SchemaValidationError::new(
                        format!("{path}[{i}]"),
                        "string",
                        describe(item),
                    ));
                }
            }
            Ok(value.clone())
        }
        ValueKind::ObjectList(item_rules) => {
            let Value::Array(items) = value else {
                return Err(mismatch());
            };
            let checked = items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    check_object(item, &format!("{path}[{i}]"), item_rules).map(Value::Object)
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(checked))
        }
        ValueKind::Enum { variants, fallback } => Ok(Value::String(coerce_label(
            value, path, variants, *fallback,
        ))),
    }
}

fn coerce_label(
    value: &Value,
    path: &str,
    variants: &[&'static str],
    fallback: &'static str,
) -> String {
    if let Value::String(raw) = value {
        let label: String = raw
            .trim()
            .to_ascii_lowercase()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c })
            .collect();
        if let Some(variant) = variants.iter().find(|v| **v == label) {
            return (*variant).to_string();
        }
    }
    warn!(path, value = %value, fallback, "Coercing out-of-range enum value");
    fallback.to_string()
}
