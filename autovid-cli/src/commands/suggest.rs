//! Suggest command handler

use anyhow::{Context, Result};
use colored::*;

use crate::config::Config;
use autovid_client::GeneratorClient;

/// Fetch and print candidate niches
pub async fn handle_suggest(config: &Config, count: usize) -> Result<()> {
    let client = GeneratorClient::new(&config.service_url);

    let topics = client
        .suggest_topics(count)
        .await
        .context("Failed to fetch topic suggestions")?;

    println!("{}", "Suggested niches:".bold());
    for (idx, topic) in topics.iter().enumerate() {
        println!("  {}. {}", idx + 1, topic.cyan());
    }

    Ok(())
}
