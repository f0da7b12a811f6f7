//! Configuration module
//!
//! Handles CLI configuration including the generation service URL.

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the generation service
    pub service_url: String,
}
