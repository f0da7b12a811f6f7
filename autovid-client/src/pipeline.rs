//! Full pipeline endpoint and artifact resolution

use crate::GeneratorClient;
use crate::error::Result;
use autovid_core::domain::config::VideoConfig;
use autovid_core::dto::pipeline::{RunOutcome, RunRequest};

/// Filename assumed when the service reports a path with no last segment
const DEFAULT_ARTIFACT_FILENAME: &str = "final_video.mp4";

impl GeneratorClient {
    /// Submit a full generation run
    ///
    /// `POST /api/pipeline`. This is the authoritative run; the service
    /// answers only once the pipeline settles. Callers wanting progress and
    /// cancellation should go through the session-layer runner instead of
    /// calling this directly.
    pub async fn run_pipeline(&self, config: &VideoConfig) -> Result<RunOutcome> {
        let url = format!("{}/api/pipeline", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&RunRequest::from(config))
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Resolve the playable artifact URL for a run outcome
    ///
    /// See [`resolve_artifact_url`] for the resolution policy.
    pub fn resolve_artifact(&self, outcome: &RunOutcome) -> Option<String> {
        resolve_artifact_url(&self.base_url, outcome.final_video_url.as_deref())
    }
}

/// Resolve the location of a produced artifact
///
/// Policy:
/// 1. A `final_video_url` that already begins with a scheme (`http...`) is
///    used verbatim.
/// 2. Otherwise its last path segment (or `final_video.mp4` if there is
///    none) is resolved against the service's static file route,
///    `{base}/files/{filename}`.
/// 3. Without a `final_video_url` there is no playable artifact.
pub fn resolve_artifact_url(base_url: &str, final_video_url: Option<&str>) -> Option<String> {
    let raw = final_video_url?;

    if raw.starts_with("http") {
        return Some(raw.to_string());
    }

    let filename = raw
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or(DEFAULT_ARTIFACT_FILENAME);

    Some(format!(
        "{}/files/{}",
        base_url.trim_end_matches('/'),
        filename
    ))
}
