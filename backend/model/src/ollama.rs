use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use legallens_core::{GenerateRequest, IntakeError, ModelGateway};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:11434";

/// Ollama `/api/generate` transport.
pub struct OllamaGateway {
    client: Client,
    base_url: String,
}

impl OllamaGateway {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for OllamaGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct OllamaGenerateResponse {
    #[serde(default)]
    response: String,
}

fn transport_error(e: reqwest::Error) -> IntakeError {
    IntakeError::GatewayUnavailable {
        status: e.status().map(|s| s.as_u16()),
        body: e.to_string(),
    }
}

#[async_trait]
impl ModelGateway for OllamaGateway {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<String, IntakeError> {
        debug!(
            model = %request.model,
            images = request.images.len(),
            format = ?request.format,
            "Sending request to Ollama"
        );

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IntakeError::GatewayUnavailable {
                status: Some(status.as_u16()),
                body,
            });
        }

        let parsed: OllamaGenerateResponse = response.json().await.map_err(transport_error)?;
        Ok(parsed.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
    use legallens_core::ResponseFormat;
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    type Captured = Arc<Mutex<Option<Value>>>;

    /// Start a fake Ollama on an ephemeral port; returns its base URL.
    async fn fake_ollama(status: StatusCode, reply: Value, captured: Captured) -> String {
        let app = Router::new()
            .route(
                "/api/generate",
                post(
                    move |State(captured): State<Captured>, Json(body): Json<Value>| {
                        let reply = reply.clone();
                        async move {
                            *captured.lock().unwrap() = Some(body);
                            (status, Json(reply))
                        }
                    },
                ),
            )
            .with_state(captured);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn posts_wire_contract_and_returns_response_text() {
        let captured: Captured = Arc::default();
        let url = fake_ollama(
            StatusCode::OK,
            json!({"model": "qwen2.5vl", "response": "{\"documentType\":\"passport\"}", "done": true}),
            captured.clone(),
        )
        .await;

        let gateway = OllamaGateway::new().with_base_url(format!("{url}/"));
        let request = GenerateRequest::new("qwen2.5vl", "extract")
            .with_images(vec!["aW1n".into()])
            .with_format(ResponseFormat::Json);
        let text = gateway.generate(&request).await.unwrap();

        assert_eq!(text, "{\"documentType\":\"passport\"}");
        let body = captured.lock().unwrap().clone().unwrap();
        assert_eq!(
            body,
            json!({
                "model": "qwen2.5vl",
                "prompt": "extract",
                "images": ["aW1n"],
                "stream": false,
                "format": "json"
            })
        );
    }

    #[tokio::test]
    async fn non_success_status_carries_status_and_body() {
        let url = fake_ollama(
            StatusCode::NOT_FOUND,
            json!({"error": "model 'qwen2.5vl' not found"}),
            Arc::default(),
        )
        .await;

        let gateway = OllamaGateway::new().with_base_url(url);
        let err = gateway
            .generate(&GenerateRequest::new("qwen2.5vl", "x"))
            .await
            .unwrap_err();

        match err {
            IntakeError::GatewayUnavailable { status, body } => {
                assert_eq!(status, Some(404));
                assert!(body.contains("not found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_response_field_yields_empty_text() {
        let url = fake_ollama(StatusCode::OK, json!({"done": true}), Arc::default()).await;
        let gateway = OllamaGateway::new().with_base_url(url);
        let text = gateway.generate(&GenerateRequest::new("m", "p")).await.unwrap();
        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn unreachable_host_is_gateway_unavailable_without_status() {
        // Bind then drop to get a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let gateway = OllamaGateway::new().with_base_url(format!("http://{addr}"));
        let err = gateway.generate(&GenerateRequest::new("m", "p")).await.unwrap_err();
        assert!(matches!(err, IntakeError::GatewayUnavailable { status: None, .. }));
    }
}
