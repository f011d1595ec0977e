//! `legallens-core` — shared types for the document-analysis pipeline.
//!
//! Holds the extracted-record and discrepancy-report data model, the error
//! taxonomy, the model gateway trait, JSON recovery for free-form model
//! output, and the schema validator that turns untyped JSON into typed values.

pub mod error;
pub mod recovery;
pub mod schema;
pub mod traits;
pub mod types;

pub use error::{IntakeError, SchemaValidationError};
pub use recovery::{parse_recovered, recover_json};
pub use schema::{validate_document, validate_report};
pub use traits::{GenerateRequest, ModelGateway, ResponseFormat};
pub use types::{
    Confidence, Discrepancy, DiscrepancyKind, DiscrepancyReport, Document, FieldValue,
    NamedDocument, Outcome, Severity, UnparsedOutput, FALLBACK_RECOMMENDATION, FALLBACK_SUMMARY,
};
