use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use legallens_core::{GenerateRequest, IntakeError, ModelGateway};

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Unavailable { status: Option<u16>, body: String },
}

/// A gateway double that returns canned output, counts calls, and can be
/// made slow to exercise deadlines.
pub struct MockGateway {
    reply: Reply,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_request: Mutex<Option<GenerateRequest>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::with_response("Mock response")
    }

    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            reply: Reply::Text(response.into()),
            delay: None,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn failing(status: Option<u16>, body: impl Into<String>) -> Self {
        Self {
            reply: Reply::Unavailable { status, body: body.into() },
            ..Self::new()
        }
    }

    /// Sleep this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<GenerateRequest> {
        self.last_request.lock().ok().and_then(|guard| guard.clone())
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelGateway for MockGateway {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<String, IntakeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut guard) = self.last_request.lock() {
            *guard = Some(request.clone());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Unavailable { status, body } => Err(IntakeError::GatewayUnavailable {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}
