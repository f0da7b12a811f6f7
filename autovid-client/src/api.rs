//! Generation service trait seam
//!
//! The session layer talks to the service through this trait rather than
//! the concrete client, enabling dependency injection and mock-backed
//! tests of the orchestration logic.

use async_trait::async_trait;

use crate::GeneratorClient;
use crate::error::Result;
use autovid_core::domain::config::VideoConfig;
use autovid_core::domain::library::LibraryVideo;
use autovid_core::domain::script::{Idea, Script};
use autovid_core::dto::pipeline::RunOutcome;
use autovid_core::dto::script::PromptResponse;

/// Operations the orchestration layer needs from the generation service
#[async_trait]
pub trait GenerationApi: Send + Sync {
    /// Request candidate topics (count must be positive)
    async fn suggest_topics(&self, count: usize) -> Result<Vec<String>>;

    /// Generate an editable script prompt for a niche
    async fn generate_prompt(&self, niche: &str) -> Result<PromptResponse>;

    /// Run the scriptwriter with a committed idea and prompt
    async fn run_script(&self, idea: &Idea, prompt: &str) -> Result<Script>;

    /// Submit a full generation run and wait for it to settle
    async fn run_pipeline(&self, config: &VideoConfig) -> Result<RunOutcome>;

    /// List previously generated videos
    async fn list_videos(&self) -> Result<Vec<LibraryVideo>>;

    /// Base URL of the service, used for artifact resolution
    fn base_url(&self) -> &str;
}

#[async_trait]
impl GenerationApi for GeneratorClient {
    async fn suggest_topics(&self, count: usize) -> Result<Vec<String>> {
        GeneratorClient::suggest_topics(self, count).await
    }

    async fn generate_prompt(&self, niche: &str) -> Result<PromptResponse> {
        GeneratorClient::generate_prompt(self, niche).await
    }

    async fn run_script(&self, idea: &Idea, prompt: &str) -> Result<Script> {
        GeneratorClient::run_script(self, idea, prompt).await
    }

    async fn run_pipeline(&self, config: &VideoConfig) -> Result<RunOutcome> {
        GeneratorClient::run_pipeline(self, config).await
    }

    async fn list_videos(&self) -> Result<Vec<LibraryVideo>> {
        GeneratorClient::list_videos(self).await
    }

    fn base_url(&self) -> &str {
        GeneratorClient::base_url(self)
    }
}
