//! Gateway Health API

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::server::{GatewayState, ModelNames};

pub const SERVICE_NAME: &str = "legallens";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub models: ModelNames,
    pub timestamp: DateTime<Utc>,
}

/// Handler for `GET /api/health`. Reports the process only; the model
/// service is not probed.
pub async fn get_health(State(state): State<Arc<GatewayState>>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        models: state.models.clone(),
        timestamp: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use legallens_analysis::AnalysisConfig;
    use legallens_model::MockGateway;
    use serde_json::Value;

    use crate::server::test_support::spawn_gateway;

    #[tokio::test]
    async fn reports_service_and_models() {
        let mock = Arc::new(MockGateway::new());
        let config = AnalysisConfig {
            vision_model: "llava".into(),
            ..AnalysisConfig::default()
        };
        let base = spawn_gateway(mock.clone(), config, 1024).await;

        let body: Value = reqwest::get(format!("{base}/api/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "legallens");
        assert_eq!(body["models"]["vision"], "llava");
        assert_eq!(body["models"]["text"], AnalysisConfig::default().text_model);
        assert!(body["uptimeSeconds"].is_u64());
        assert!(body["timestamp"].is_string());
        assert_eq!(mock.call_count(), 0);
    }
}
