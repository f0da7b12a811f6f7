//! Script command handler
//!
//! Drives the two-phase interactive script workflow from the terminal:
//! generate the prompt draft, optionally replace it with an edited file,
//! then run the scriptwriter and print the scenes.

use anyhow::{Context, Result};
use colored::*;
use std::sync::Arc;

use crate::config::Config;
use autovid_client::{GeneratorClient, api::GenerationApi};
use autovid_session::ScriptOrchestrator;

pub async fn handle_script(
    config: &Config,
    niche: &str,
    prompt_file: Option<&str>,
    prompt_only: bool,
) -> Result<()> {
    let api: Arc<dyn GenerationApi> = Arc::new(GeneratorClient::new(&config.service_url));
    let orchestrator = ScriptOrchestrator::new(api);

    let draft = orchestrator
        .generate_prompt(niche)
        .await
        .context("Failed to generate prompt")?;

    println!("{}", "Prompt draft:".bold());
    println!("{}", draft);

    if prompt_only {
        return Ok(());
    }

    if let Some(path) = prompt_file {
        let edited = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read prompt file: {}", path))?;
        orchestrator.set_prompt(edited.trim_end().to_string())?;
        println!("{}", "Prompt draft replaced from file".yellow());
    }

    let script = orchestrator
        .run_script()
        .await
        .context("Failed to run scriptwriter")?;

    println!("\n{} ({} scenes)", "Script".bold(), script.scenes.len());
    for (idx, scene) in script.scenes.iter().enumerate() {
        println!("\n{}", format!("Scene {}", idx + 1).bold());
        println!("  {} {}", "visual:".dimmed(), scene.visual);
        println!("  {} {}", "narration:".dimmed(), scene.narration);
    }

    Ok(())
}
