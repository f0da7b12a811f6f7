//! AutoVid HTTP Client
//!
//! A type-safe HTTP client for the AutoVid generation service API.
//!
//! This crate provides the wire-level operations the orchestration layer
//! builds on: topic suggestion, the two-phase script workflow, full
//! pipeline runs, and library listing. Session-level concerns (state
//! machines, single-flight, progress) live in `autovid-session`.
//!
//! # Example
//!
//! ```no_run
//! use autovid_client::GeneratorClient;
//!
//! #[tokio::main]
//! async fn main() -> autovid_client::Result<()> {
//!     let client = GeneratorClient::new("http://localhost:8000");
//!
//!     let topics = client.suggest_topics(3).await?;
//!     for topic in topics {
//!         println!("suggested niche: {}", topic);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod error;
mod library;
mod pipeline;
mod script;
mod suggest;

// Re-export commonly used types
pub use api::GenerationApi;
pub use error::{ClientError, Result};
pub use pipeline::resolve_artifact_url;

use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::warn;

/// HTTP client for the AutoVid generation service API
///
/// Methods are grouped per endpoint family:
/// - Topic suggestion
/// - Interactive script workflow (prompt, script)
/// - Full pipeline runs
/// - Library listing
#[derive(Debug, Clone)]
pub struct GeneratorClient {
    /// Base URL of the service (e.g., "http://localhost:8000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

/// Response from `GET /health`
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl GeneratorClient {
    /// Create a new client for the generation service
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the service API (e.g., "http://localhost:8000")
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows configuring timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check service liveness via `GET /health`
    pub async fn health(&self) -> Result<HealthResponse> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Response Handling
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// Non-2xx responses become `ClientError::Http` with the message drawn
    /// from the body (plain text, or the `detail` field of a JSON error
    /// body); undecodable success bodies become `ClientError::Parse`.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| status.to_string());
            let message = extract_error_message(text);
            warn!(status = status.as_u16(), %message, "service request failed");
            return Err(ClientError::http(status.as_u16(), message));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(format!("failed to parse JSON response: {}", e)))
    }
}

/// Pull the human-readable message out of an error body
///
/// The service wraps failures as `{"detail": "..."}`; plain-text bodies
/// pass through unchanged.
fn extract_error_message(body: String) -> String {
    match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(json) => json
            .get("detail")
            .and_then(|d| d.as_str())
            .map(str::to_string)
            .unwrap_or(body),
        Err(_) => body,
    }
}
