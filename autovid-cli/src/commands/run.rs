//! Run command handler
//!
//! Submits a full pipeline run and follows its lifecycle events until it
//! settles, then prints the per-stage breakdown.

use anyhow::{Context, Result};
use colored::*;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::Config;
use autovid_client::{GeneratorClient, api::GenerationApi};
use autovid_core::domain::config::VideoConfig;
use autovid_core::domain::stage::StageStatus;
use autovid_session::{PipelineRunner, RunEvent};

pub async fn handle_run(
    config: &Config,
    niche: String,
    length: u32,
    pacing: u8,
    upload: bool,
    verbose: bool,
) -> Result<()> {
    let api: Arc<dyn GenerationApi> = Arc::new(GeneratorClient::new(&config.service_url));
    let runner = PipelineRunner::new(api);

    let video = VideoConfig {
        niche,
        length,
        pacing,
        upload,
        verbose,
    };

    let mut handle = runner.run(video).context("Invalid run configuration")?;
    println!("{} {}", "Job".bold(), handle.job_id);

    let mut failed = false;
    while let Some(event) = handle.next_event().await {
        match event {
            RunEvent::Progress(percent) => {
                println!("  {:>3}%", percent);
            }
            RunEvent::Finished { outcome, artifact } => {
                println!("{}", "Pipeline finished".green().bold());
                if outcome.uploaded {
                    println!("  uploaded to channel");
                }
                match artifact {
                    Some(url) => println!("  {} {}", "artifact:".bold(), url.cyan()),
                    None => println!("  {}", "no playable artifact reported".yellow()),
                }
            }
            RunEvent::Failed { reason } => {
                println!("{} {}", "Pipeline failed:".red().bold(), reason);
                failed = true;
            }
        }
    }

    print_stages(&runner, handle.job_id);

    if failed {
        anyhow::bail!("pipeline run failed");
    }
    Ok(())
}

fn print_stages(runner: &PipelineRunner, job_id: Uuid) {
    let Some(stages) = runner.job_stages(job_id) else {
        return;
    };

    println!("{}", "Stages:".bold());
    for (idx, stage) in stages.iter().enumerate() {
        let status = match &stage.status {
            StageStatus::Pending => "pending".dimmed().to_string(),
            StageStatus::Running { percent: Some(p) } => {
                format!("running ({}%)", p).cyan().to_string()
            }
            StageStatus::Running { percent: None } => "running".cyan().to_string(),
            StageStatus::Success { .. } => "success".green().to_string(),
            StageStatus::Error { reason } => format!("error: {}", reason).red().to_string(),
        };
        println!("  {}. {:<7} {}", idx + 1, stage.name, status);
    }
}
