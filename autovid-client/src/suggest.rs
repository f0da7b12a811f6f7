//! Topic suggestion endpoint

use crate::GeneratorClient;
use crate::error::{ClientError, Result};
use autovid_core::dto::suggest::SuggestResponse;

impl GeneratorClient {
    /// Request candidate topics from the service
    ///
    /// `POST /api/pipeline/suggest?count=N`. The response may carry a list
    /// of topics or a single topic; both normalize to an ordered sequence.
    /// No retry, no partial results: any failure surfaces as one error.
    ///
    /// # Arguments
    /// * `count` - How many topics to request; must be positive
    pub async fn suggest_topics(&self, count: usize) -> Result<Vec<String>> {
        if count == 0 {
            return Err(ClientError::Validation(
                "suggestion count must be positive".to_string(),
            ));
        }

        let url = format!("{}/api/pipeline/suggest?count={}", self.base_url, count);
        let response = self.client.post(&url).send().await?;

        let suggest: SuggestResponse = self.handle_response(response).await?;
        Ok(suggest.into_topics())
    }
}
