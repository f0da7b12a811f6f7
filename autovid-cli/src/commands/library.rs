//! Library command handler

use anyhow::{Context, Result};
use colored::*;
use std::sync::Arc;

use crate::config::Config;
use autovid_client::{GeneratorClient, api::GenerationApi};
use autovid_session::LibrarySync;

/// Refresh and print the generated video library
pub async fn handle_library(config: &Config) -> Result<()> {
    let api: Arc<dyn GenerationApi> = Arc::new(GeneratorClient::new(&config.service_url));
    let sync = LibrarySync::new(api);

    let count = sync.refresh().await.context("Failed to fetch library")?;
    if count == 0 {
        println!("{}", "Library is empty".yellow());
        return Ok(());
    }

    println!("{} ({} videos)", "Library".bold(), count);
    for video in sync.videos() {
        let size_mib = video.size as f64 / (1024.0 * 1024.0);
        println!(
            "  {:<32} {:>8.1} MiB  {}",
            video.filename.cyan(),
            size_mib,
            video.url.dimmed()
        );
    }

    Ok(())
}
