//! Structured logging components for LegalLens.
//!
//! Handles subscriber setup, redaction of personal data in model output, bounded
//! log previews, and per-invocation analysis events.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{AnalysisEvent, EventLogEntry, EventLogger};
pub use logger::init_logger;
pub use redact::{preview, redact_sensitive_data};
