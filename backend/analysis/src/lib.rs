//! `legallens-analysis` — the two analysis flows.
//!
//! [`ExtractionService`] turns one image into a [`legallens_core::Document`];
//! [`DiscrepancyService`] compares two or more documents. Both share the
//! same model client and follow the same recover, validate, degrade path.

pub mod discrepancy;
pub mod extraction;
pub mod media_type;
pub mod prompts;

use std::time::Duration;

pub use discrepancy::{prepare_documents, DiscrepancyService, DocumentEntry, MIN_DOCUMENTS};
pub use extraction::{AnalysisRequest, ExtractionService};
pub use media_type::{detect_media_type, is_image};

pub const DEFAULT_VISION_MODEL: &str = "qwen2.5vl";
pub const DEFAULT_TEXT_MODEL: &str = "llama3.1";

/// Model names and per-flow deadlines.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub vision_model: String,
    pub text_model: String,
    pub extraction_timeout: Duration,
    pub discrepancy_timeout: Duration,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            extraction_timeout: Duration::from_secs(60),
            discrepancy_timeout: Duration::from_secs(30),
        }
    }
}
