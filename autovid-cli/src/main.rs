//! AutoVid CLI
//!
//! Command-line interface for the AutoVid content-generation service.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "autovid")]
#[command(about = "AutoVid content pipeline CLI", long_about = None)]
struct Cli {
    /// Generation service URL
    #[arg(
        long,
        env = "AUTOVID_SERVICE_URL",
        default_value = "http://localhost:8000"
    )]
    service_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "autovid_cli=info,autovid_session=info,autovid_client=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config {
        service_url: cli.service_url,
    };

    handle_command(cli.command, &config).await
}
