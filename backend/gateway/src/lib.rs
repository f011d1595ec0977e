//! LegalLens gateway HTTP API server.
//!
//! Exposes image extraction, cross-document discrepancy checks and a health
//! endpoint over the analysis services.

pub mod analyze_api;
pub mod discrepancy_api;
pub mod error;
pub mod health_api;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, start_server, GatewayState, ModelNames};
