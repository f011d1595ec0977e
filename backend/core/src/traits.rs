use async_trait::async_trait;
use serde::Serialize;

use crate::error::IntakeError;

/// Output shape the model service should constrain its completion to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    Json,
}

/// A single non-streaming generation call, serialized as the
/// `/api/generate` request body: `{model, prompt, images?, stream:false, format?}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    /// Base64-encoded images; only set for vision prompts.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<ResponseFormat>,
}

impl GenerateRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            images: Vec::new(),
            stream: false,
            format: None,
        }
    }

    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }

    pub fn with_format(mut self, format: ResponseFormat) -> Self {
        self.format = Some(format);
        self
    }
}

/// Trait for model services that turn a prompt (and optional images) into text.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Gateway name (e.g., "ollama", "mock").
    fn name(&self) -> &str;

    /// Send one generation request and return the model's raw completion text.
    ///
    /// Implementations report transport failures and non-success statuses as
    /// [`IntakeError::GatewayUnavailable`]. Deadlines are enforced by the caller.
    async fn generate(&self, request: &GenerateRequest) -> Result<String, IntakeError>;
}
