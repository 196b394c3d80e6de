//! `confessions post`: one publishing run.

use anyhow::{Context as _, Result};
use confessions_business::{
    BotConfig, ConfessionStore, InstagramPublisher, RunReport, process_one_confession,
};
use tracing::{info, instrument};

use crate::output::Output;

#[instrument(skip_all, name = "post")]
pub async fn run_post() -> Result<()> {
    let out = Output::new();

    let config = BotConfig::init().context("Failed to load configuration from environment")?;
    let store = ConfessionStore::new(config.supabase.clone());
    let publisher = InstagramPublisher::new(&config);

    let report = process_one_confession(&store, &publisher)
        .await
        .context("Publishing run failed")?;
    info!(?report, "Run finished");

    match &report {
        RunReport::Idle => out.info(summary(&report)),
        RunReport::Posted { .. } => out.success(summary(&report)),
        RunReport::Failed { .. } => out.error(summary(&report)),
    }

    Ok(())
}

/// One-line description of a finished run.
pub fn summary(report: &RunReport) -> String {
    match report {
        RunReport::Idle => "No queued confessions found.".to_owned(),
        RunReport::Posted { id, post_id } => {
            format!("Posted confession #{id} (Instagram post {post_id}).")
        }
        RunReport::Failed { id, reason } => {
            format!("Confession #{id} marked as failed: {reason}")
        }
    }
}
