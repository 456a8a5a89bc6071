//! Novel Wizard - inspect and manage the persisted wizard draft
//!
//! Usage: `novel-wizard [status|blueprint|reset]`
//!
//! Reads the configured slice storage, so with the file backend it shows the
//! draft left behind by earlier sessions.

use anyhow::{bail, Context};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use novel_wizard_core::infrastructure::config::AppConfig;
use novel_wizard_core::infrastructure::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "novel_wizard_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let command = std::env::args().nth(1).unwrap_or_else(|| "status".to_string());

    let config = AppConfig::load()?;
    tracing::info!("Configuration loaded");
    tracing::info!("  Storage: {:?} ({})", config.storage_backend, config.storage_dir.display());
    tracing::info!("  Auto-save interval: {:?}", config.autosave_interval());

    let state = AppState::new(config)?;

    match command.as_str() {
        "status" => {
            let (step, incomplete) = state
                .workflow
                .read(|wf| (wf.current_step(), wf.incomplete_steps()))
                .await?;
            println!("Current step: {} ({}%)", step, step.progress_percent());
            if incomplete.is_empty() {
                println!("Every step is complete");
            } else {
                let names: Vec<&str> = incomplete.iter().map(|s| s.slug()).collect();
                println!("Incomplete: {}", names.join(", "));
            }
        }
        "blueprint" => {
            let blueprint = state.workflow.read(|wf| wf.blueprint()).await?;
            let json = serde_json::to_string_pretty(&blueprint)
                .context("Failed to serialize blueprint")?;
            println!("{json}");
        }
        "reset" => {
            let report = state.workflow.with(|wf| wf.reset_all()).await?;
            for (key, error) in &report.failures {
                tracing::error!("Reset of {} was not saved: {}", key, error);
            }
            println!("Reset {} slices", report.reset.len());
        }
        other => bail!("Unknown command {other:?}, expected status, blueprint or reset"),
    }

    // Nothing is left unsaved on exit: mutations were written through already
    let workflow = state.workflow.shutdown().await?;
    tracing::debug!(?workflow, "Shut down");
    Ok(())
}
