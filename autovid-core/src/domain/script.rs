//! Script domain types
//!
//! The interactive script workflow produces an `Idea` (an opaque topic
//! seed owned by the service), an editable prompt draft, and finally a
//! `Script` made of ordered scenes.

use serde::{Deserialize, Serialize};

/// Service-produced topic seed
///
/// The payload shape is owned by the service; the client carries it
/// verbatim between the prompt and script phases.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Idea(pub serde_json::Value);

/// A generated video script
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Script {
    pub scenes: Vec<Scene>,
}

/// One narration/visual unit within a script
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scene {
    /// What the viewer sees
    pub visual: String,
    /// The voiceover line for the scene
    pub narration: String,
}
