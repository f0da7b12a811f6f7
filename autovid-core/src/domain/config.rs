//! Run configuration
//!
//! Defines the configuration for a full pipeline run including the topic
//! niche, target length, pacing, and delivery flags. A configuration is
//! validated locally before any request is issued and is immutable once
//! submitted.

use serde::{Deserialize, Serialize};

/// Minimum target video length in seconds
pub const MIN_LENGTH_SECONDS: u32 = 30;
/// Maximum target video length in seconds
pub const MAX_LENGTH_SECONDS: u32 = 180;
/// Maximum pacing value (0 = slowest, 100 = fastest)
pub const MAX_PACING: u8 = 100;

/// Configuration for a full pipeline run
///
/// Created per run request; the runner validates it before issuing any
/// network call and never mutates it afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConfig {
    /// User-chosen topic driving generation (must be non-empty)
    pub niche: String,
    /// Target video length in seconds (30..=180)
    pub length: u32,
    /// Narration pacing (0..=100)
    pub pacing: u8,
    /// Upload the rendered video after the pipeline completes
    pub upload: bool,
    /// Ask the service for verbose logging
    pub verbose: bool,
}

impl VideoConfig {
    /// Creates a configuration with defaults for everything but the niche
    pub fn new(niche: impl Into<String>) -> Self {
        Self {
            niche: niche.into(),
            length: 60,
            pacing: 50,
            upload: false,
            verbose: false,
        }
    }

    /// Validates the configuration
    ///
    /// Checks the caller-side preconditions that must hold before any
    /// request is issued: non-empty niche, length and pacing in range.
    pub fn validate(&self) -> Result<(), String> {
        if self.niche.trim().is_empty() {
            return Err("niche must not be empty".to_string());
        }

        if !(MIN_LENGTH_SECONDS..=MAX_LENGTH_SECONDS).contains(&self.length) {
            return Err(format!(
                "length must be between {} and {} seconds (got {})",
                MIN_LENGTH_SECONDS, MAX_LENGTH_SECONDS, self.length
            ));
        }

        if self.pacing > MAX_PACING {
            return Err(format!(
                "pacing must be between 0 and {} (got {})",
                MAX_PACING, self.pacing
            ));
        }

        Ok(())
    }
}
