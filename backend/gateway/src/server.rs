//! Main HTTP gateway server and routing.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use legallens_analysis::{AnalysisConfig, DiscrepancyService, ExtractionService};
use legallens_model::ModelClient;
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, instrument};

use crate::{analyze_api, discrepancy_api, health_api};

/// Model names reported by the health endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ModelNames {
    pub vision: String,
    pub text: String,
}

/// Application state shared across routes.
pub struct GatewayState {
    pub extraction: ExtractionService,
    pub discrepancy: DiscrepancyService,
    pub models: ModelNames,
    pub started_at: Instant,
}

impl GatewayState {
    /// Build both services over one model client.
    pub fn new(client: ModelClient, config: &AnalysisConfig) -> Self {
        Self {
            extraction: ExtractionService::new(client.clone(), config),
            discrepancy: DiscrepancyService::new(client, config),
            models: ModelNames {
                vision: config.vision_model.clone(),
                text: config.text_model.clone(),
            },
            started_at: Instant::now(),
        }
    }
}

/// Build the Axum router with all API routes.
pub fn build_router(state: Arc<GatewayState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/api/analyze", post(analyze_api::analyze))
        .route(
            "/api/analyze-discrepancies",
            post(discrepancy_api::analyze_discrepancies),
        )
        .route("/api/health", get(health_api::get_health))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Starts the HTTP server and runs until Ctrl-C.
#[instrument(skip(state))]
pub async fn start_server(
    addr: SocketAddr,
    state: Arc<GatewayState>,
    max_upload_bytes: usize,
) -> Result<()> {
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(
        addr = %listener.local_addr()?,
        vision_model = %state.models.vision,
        text_model = %state.models.text,
        "Gateway HTTP server listening"
    );

    let app = build_router(state, max_upload_bytes);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Gateway HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until the process is killed.
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use legallens_model::MockGateway;

    /// Serve the real router on an ephemeral port; returns its base URL.
    pub async fn spawn_gateway(
        mock: Arc<MockGateway>,
        config: AnalysisConfig,
        max_upload_bytes: usize,
    ) -> String {
        let state = Arc::new(GatewayState::new(ModelClient::new(mock), &config));
        let app = build_router(state, max_upload_bytes);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }
}
