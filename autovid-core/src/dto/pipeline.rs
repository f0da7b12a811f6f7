//! Full pipeline run DTOs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::config::VideoConfig;

/// Request body for `POST /api/pipeline`
#[derive(Debug, Clone, Serialize)]
pub struct RunRequest {
    pub niche: String,
    pub length: u32,
    pub pacing: u8,
    pub upload: bool,
    pub verbose: bool,
}

impl From<&VideoConfig> for RunRequest {
    fn from(config: &VideoConfig) -> Self {
        Self {
            niche: config.niche.clone(),
            length: config.length,
            pacing: config.pacing,
            upload: config.upload,
            verbose: config.verbose,
        }
    }
}

/// Response from `POST /api/pipeline`
///
/// Opaque beyond the recognized fields: the service may attach more, and
/// those are carried in `extra` without interpretation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunOutcome {
    /// Placeholder for future queue integration on the service side
    #[serde(default)]
    pub job_id: Option<String>,
    /// Last stage the pipeline reached, as named by the service
    #[serde(default)]
    pub stage: Option<String>,
    /// Location of the produced artifact, if any
    #[serde(default)]
    pub final_video_url: Option<String>,
    #[serde(default)]
    pub uploaded: bool,
    /// Service-reported failure, if the run ended early
    #[serde(default)]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}
