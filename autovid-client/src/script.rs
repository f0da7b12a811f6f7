//! Interactive script workflow endpoints

use crate::GeneratorClient;
use crate::error::Result;
use autovid_core::domain::script::{Idea, Script};
use autovid_core::dto::script::{PromptRequest, PromptResponse, ScriptRequest, ScriptResponse};

impl GeneratorClient {
    /// Generate an editable script prompt for a niche
    ///
    /// `POST /api/stage2/prompt`. Returns the service's topic seed together
    /// with the prompt draft the user may edit before running the script.
    pub async fn generate_prompt(&self, niche: &str) -> Result<PromptResponse> {
        let url = format!("{}/api/stage2/prompt", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&PromptRequest {
                niche: niche.to_string(),
            })
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Run the scriptwriter with a committed idea and prompt
    ///
    /// `POST /api/stage2/run`. Yields the ordered scene list.
    pub async fn run_script(&self, idea: &Idea, prompt: &str) -> Result<Script> {
        let url = format!("{}/api/stage2/run", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&ScriptRequest {
                idea: idea.clone(),
                prompt: prompt.to_string(),
            })
            .send()
            .await?;

        let script: ScriptResponse = self.handle_response(response).await?;
        Ok(script.script)
    }
}
