use std::sync::Arc;
use std::time::{Duration, Instant};

use legallens_core::{GenerateRequest, IntakeError, ModelGateway};
use legallens_logging::{preview, redact_sensitive_data};
use tracing::{error, info, warn};

/// Characters of raw model output included in logs.
const LOG_PREVIEW_CHARS: usize = 200;

/// Deadline-enforcing front for a [`ModelGateway`].
///
/// Each call races the gateway future against its budget; when the budget
/// elapses the future is dropped, which aborts the in-flight HTTP request.
/// Nothing is retried here.
#[derive(Clone)]
pub struct ModelClient {
    gateway: Arc<dyn ModelGateway>,
}

impl ModelClient {
    pub fn new(gateway: Arc<dyn ModelGateway>) -> Self {
        Self { gateway }
    }

    pub fn gateway_name(&self) -> &str {
        self.gateway.name()
    }

    pub async fn generate(
        &self,
        request: &GenerateRequest,
        timeout: Duration,
    ) -> Result<String, IntakeError> {
        let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        let start = Instant::now();
        info!(
            gateway = self.gateway.name(),
            model = %request.model,
            images = request.images.len(),
            timeout_ms,
            "Calling model gateway"
        );

        match tokio::time::timeout(timeout, self.gateway.generate(request)).await {
            Err(_elapsed) => {
                warn!(model = %request.model, timeout_ms, "Model gateway call timed out");
                Err(IntakeError::GatewayTimeout { timeout_ms })
            }
            Ok(Err(e)) => {
                if let IntakeError::GatewayUnavailable { status, body } = &e {
                    error!(
                        model = %request.model,
                        status = ?status,
                        body = %preview(&redact_sensitive_data(body), LOG_PREVIEW_CHARS),
                        "Model gateway call failed"
                    );
                } else {
                    error!(model = %request.model, error = %e, "Model gateway call failed");
                }
                Err(e)
            }
            Ok(Ok(text)) => {
                info!(
                    model = %request.model,
                    latency_ms = start.elapsed().as_millis() as u64,
                    response_len = text.len(),
                    response_preview = %preview(&redact_sensitive_data(&text), LOG_PREVIEW_CHARS),
                    "Model response received"
                );
                Ok(text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockGateway;

    #[tokio::test]
    async fn returns_gateway_text() {
        let mock = Arc::new(MockGateway::with_response("{\"ok\":true}"));
        let client = ModelClient::new(mock.clone());
        let text = client
            .generate(&GenerateRequest::new("m", "p"), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(text, "{\"ok\":true}");
        assert_eq!(mock.call_count(), 1);
        assert_eq!(client.gateway_name(), "mock");
    }

    #[tokio::test]
    async fn slow_gateway_times_out_instead_of_hanging() {
        let mock = Arc::new(MockGateway::new().with_delay(Duration::from_secs(30)));
        let client = ModelClient::new(mock);

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            client.generate(&GenerateRequest::new("m", "p"), Duration::from_millis(50)),
        )
        .await
        .expect("client must give up before the outer guard");

        assert!(matches!(result, Err(IntakeError::GatewayTimeout { timeout_ms: 50 })));
    }

    #[tokio::test]
    async fn gateway_errors_propagate_unchanged() {
        let client = ModelClient::new(Arc::new(MockGateway::failing(Some(500), "boom")));
        let err = client
            .generate(&GenerateRequest::new("m", "p"), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            IntakeError::GatewayUnavailable { status: Some(500), ref body } if body == "boom"
        ));
    }

    #[tokio::test]
    async fn identical_calls_each_reach_the_gateway() {
        let mock = Arc::new(MockGateway::with_response("same"));
        let client = ModelClient::new(mock.clone());
        let req = GenerateRequest::new("m", "p");
        let (a, b) = tokio::join!(
            client.generate(&req, Duration::from_secs(1)),
            client.generate(&req, Duration::from_secs(1)),
        );
        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(mock.call_count(), 2);
    }
}
