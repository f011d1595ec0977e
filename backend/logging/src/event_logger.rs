//! Analysis Event Logger
//!
//! One structured event per analysis step, emitted under the `analysis_events`
//! target so it lands in the NDJSON file alongside regular logs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::redact::{preview, redact_sensitive_data};

const RAW_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalysisEvent {
    ModelCall {
        flow: String,
        model: String,
        latency_ms: u64,
    },
    Parsed {
        flow: String,
        summary: String,
    },
    Degraded {
        flow: String,
        raw_preview: String,
        parse_error: String,
    },
    Failed {
        flow: String,
        kind: String,
        error_msg: String,
    },
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: AnalysisEvent,
}

pub struct EventLogger;

impl EventLogger {
    /// Redacts string payloads and writes the event through `tracing`.
    pub fn log_event(request_id: &str, mut event: AnalysisEvent) {
        match &mut event {
            AnalysisEvent::ModelCall { .. } => {}
            AnalysisEvent::Parsed { summary, .. } => {
                *summary = redact_sensitive_data(summary);
            }
            AnalysisEvent::Degraded { raw_preview, .. } => {
                *raw_preview = preview(&redact_sensitive_data(raw_preview), RAW_PREVIEW_CHARS);
            }
            AnalysisEvent::Failed { error_msg, .. } => {
                *error_msg = redact_sensitive_data(error_msg);
            }
        }

        let entry = EventLogEntry {
            request_id: request_id.into(),
            timestamp: Utc::now(),
            event,
        };

        match serde_json::to_string(&entry) {
            Ok(json) => info!(target: "analysis_events", event = %json, "Analysis event"),
            Err(_) => info!(target: "analysis_events", event = ?entry, "Analysis event"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let event = AnalysisEvent::Degraded {
            flow: "extraction".into(),
            raw_preview: "not json".into(),
            parse_error: "expected value".into(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "degraded");
        assert_eq!(value["flow"], "extraction");
    }

    #[test]
    fn logging_without_subscriber_does_not_panic() {
        EventLogger::log_event(
            "req-1",
            AnalysisEvent::Failed {
                flow: "discrepancy".into(),
                kind: "gateway_timeout".into(),
                error_msg: "timed out".into(),
            },
        );
    }
}
