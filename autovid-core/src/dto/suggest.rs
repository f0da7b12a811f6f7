//! Topic suggestion DTOs

use serde::Deserialize;

/// Response from `POST /api/pipeline/suggest`
///
/// The service answers with either a list of topics or a single topic
/// depending on the requested count; both shapes normalize to a sequence.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SuggestResponse {
    Many { niches: Vec<String> },
    One { niche: String },
}

impl SuggestResponse {
    /// Normalizes the response to an ordered topic sequence
    pub fn into_topics(self) -> Vec<String> {
        match self {
            SuggestResponse::Many { niches } => niches,
            SuggestResponse::One { niche } => vec![niche],
        }
    }
}
