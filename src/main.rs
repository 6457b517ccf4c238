use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

use redfin_etl::app::run_use_case::RunUseCase;
use redfin_etl::config::Config;
use redfin_etl::types::HandoffRecord;
use redfin_etl::{infra, logging, metrics, metrics_push};

#[derive(Parser)]
#[command(name = "redfin_etl")]
#[command(about = "Extract, normalize and publish the Redfin city market tracker")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stream the source dataset into a local artifact and write the handoff file
    Extract {
        /// Override the configured source URL (http(s) or local path)
        #[arg(long)]
        url: Option<String>,
        /// Where to write the handoff JSON (default: <artifact_dir>/handoff.json)
        #[arg(long)]
        handoff: Option<PathBuf>,
    },
    /// Normalize the artifact named in the handoff file and publish it
    Transform {
        #[arg(long)]
        handoff: Option<PathBuf>,
    },
    /// Move the raw artifact named in the handoff file to the raw bucket
    Load {
        #[arg(long)]
        handoff: Option<PathBuf>,
    },
    /// Run extract, transform and load in sequence
    Run {
        #[arg(long)]
        url: Option<String>,
    },
}

fn handoff_path(config: &Config, explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| config.artifact_dir.join("handoff.json"))
}

fn read_handoff(path: &Path) -> anyhow::Result<HandoffRecord> {
    HandoffRecord::read_from(path)
        .with_context(|| format!("reading handoff file {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;
    if let Commands::Extract { url: Some(url), .. } | Commands::Run { url: Some(url) } = &cli.command {
        config.source_url = url.clone();
    }

    // Held to the end of main so the final error line reaches the log file
    let _log_guard = logging::init_logging(&config.log_dir);
    metrics::init_metrics();

    let source = infra::source_for(&config.source_url);
    let store = infra::object_store_for(&config.storage)?;
    let use_case = RunUseCase::new(config.clone(), Arc::from(source), store);
    let run_id = use_case.run_id().to_string();

    let outcome = execute(&use_case, &config, cli.command).await;
    metrics_push::push_to_pushgateway(&run_id).await;

    if let Err(e) = &outcome {
        error!("Run {} failed: {:#}", run_id, e);
    }
    outcome
}

async fn execute(use_case: &RunUseCase, config: &Config, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Extract { handoff, .. } => {
            let record = use_case.extract().await.context("extract step failed")?;
            let path = handoff_path(config, handoff);
            record.write_to(&path)?;
            info!("Handoff written to {}", path.display());
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Commands::Transform { handoff } => {
            let record = read_handoff(&handoff_path(config, handoff))?;
            let report = use_case
                .transform(&record)
                .await
                .context("transform step failed")?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Load { handoff } => {
            let record = read_handoff(&handoff_path(config, handoff))?;
            let receipt = use_case.load(&record).await.context("load step failed")?;
            println!("{}", serde_json::to_string_pretty(&receipt)?);
        }
        Commands::Run { .. } => {
            let report = use_case.run().await.context("pipeline run failed")?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
