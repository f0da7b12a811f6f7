//! Interactive script workflow DTOs

use serde::{Deserialize, Serialize};

use crate::domain::script::{Idea, Script};

/// Request body for `POST /api/stage2/prompt`
#[derive(Debug, Clone, Serialize)]
pub struct PromptRequest {
    pub niche: String,
}

/// Response from `POST /api/stage2/prompt`
#[derive(Debug, Clone, Deserialize)]
pub struct PromptResponse {
    /// Opaque topic seed to feed back into the script request
    pub idea: Idea,
    /// Editable instruction text seeded by the service
    pub prompt: String,
}

/// Request body for `POST /api/stage2/run`
#[derive(Debug, Clone, Serialize)]
pub struct ScriptRequest {
    pub idea: Idea,
    pub prompt: String,
}

/// Response from `POST /api/stage2/run`
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptResponse {
    pub script: Script,
}
