//! `legallens-model` — the model gateway client.
//!
//! [`OllamaGateway`] speaks the `/api/generate` wire contract, [`ModelClient`]
//! enforces per-call deadlines, and [`MockGateway`] stands in for the model
//! service in tests.

pub mod client;
pub mod mock;
pub mod ollama;

pub use client::ModelClient;
pub use mock::MockGateway;
pub use ollama::OllamaGateway;
