//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod library;
mod run;
mod script;
mod suggest;

use anyhow::Result;
use clap::Subcommand;
use colored::*;

use crate::config::Config;
use autovid_client::GeneratorClient;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Suggest candidate niches
    Suggest {
        /// How many topics to request
        #[arg(short, long, default_value = "3")]
        count: usize,
    },
    /// Interactive script workflow: generate a prompt, optionally edit it,
    /// then run the scriptwriter
    Script {
        /// Topic niche
        niche: String,

        /// Replace the generated prompt draft with this file's contents
        #[arg(long)]
        prompt_file: Option<String>,

        /// Stop after printing the prompt draft
        #[arg(long)]
        prompt_only: bool,
    },
    /// Run the full generation pipeline
    Run {
        /// Topic niche
        niche: String,

        /// Target video length in seconds (30-180)
        #[arg(long, default_value = "60")]
        length: u32,

        /// Narration pacing (0-100)
        #[arg(long, default_value = "50")]
        pacing: u8,

        /// Upload the rendered video after the pipeline completes
        #[arg(long)]
        upload: bool,

        /// Ask the service for verbose logging
        #[arg(short, long)]
        verbose: bool,
    },
    /// List generated videos in the library
    Library,
    /// Check service liveness
    Health,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Suggest { count } => suggest::handle_suggest(config, count).await,
        Commands::Script {
            niche,
            prompt_file,
            prompt_only,
        } => script::handle_script(config, &niche, prompt_file.as_deref(), prompt_only).await,
        Commands::Run {
            niche,
            length,
            pacing,
            upload,
            verbose,
        } => run::handle_run(config, niche, length, pacing, upload, verbose).await,
        Commands::Library => library::handle_library(config).await,
        Commands::Health => handle_health(config).await,
    }
}

/// Check service liveness
async fn handle_health(config: &Config) -> Result<()> {
    let client = GeneratorClient::new(&config.service_url);
    let health = client.health().await?;
    println!("{} {}", "service:".bold(), health.status.green());
    Ok(())
}
